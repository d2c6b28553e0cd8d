//! Persistence subsystem for the `product` table.
//!
//! # Data Flow
//! ```text
//! handler
//!     → ProductRepository (repository.rs, object-safe port)
//!         → PgProductRepository (postgres.rs, sqlx pool)
//!         → InMemoryProductRepository (memory.rs, tests / local runs)
//! ```
//!
//! # Design Decisions
//! - Handlers receive the repository as `Arc<dyn ProductRepository>`; no globals
//! - Every call is one round trip; no caching, no locking across calls
//! - `save` is insert-or-update by id, last write wins

pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::InMemoryProductRepository;
pub use postgres::PgProductRepository;
pub use repository::{ProductRepository, RepositoryError};
