//! Product resource: model, validators, handlers and routes.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → handlers.rs (one function per route)
//!     → validation.rs (fail fast, no persistence access on 400)
//!     → storage::ProductRepository
//!     → http::response (status + body)
//! ```

pub mod handlers;
pub mod model;
pub mod patch;
pub mod validation;

use axum::{routing::get, Router};

use crate::http::server::AppState;
use self::handlers::*;

pub use model::{NewProduct, Product};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/products", get(list_products))
        .route(
            "/products/{id}",
            get(get_product).delete(delete_product).patch(patch_product),
        )
}
