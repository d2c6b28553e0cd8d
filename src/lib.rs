//! Product service library.
//!
//! HTTP surface, validators and persistence for the `product` resource.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod products;
pub mod storage;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
