//! Repository port consumed by the request handlers.

use async_trait::async_trait;

use crate::products::model::Product;

/// Failure raised by any persistence operation.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A value cannot be written to its column.
    #[error("cannot store {field}: {reason}")]
    Unrepresentable { field: &'static str, reason: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Row-level operations over the product table.
///
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every stored product, in storage order.
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Load a product by id. Absence is `Ok(None)`, not an error.
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, RepositoryError>;

    /// Products with `price < limit` (strict).
    async fn find_where_price_less_than(&self, limit: f64)
        -> Result<Vec<Product>, RepositoryError>;

    /// Insert or update the row identified by `product.id`.
    ///
    /// `createdAt` and `updatedAt` are never rewritten for an existing row.
    async fn save(&self, product: Product) -> Result<Product, RepositoryError>;

    /// Remove the row for `product.id`. Removing a missing row is not an error.
    async fn delete(&self, product: &Product) -> Result<(), RepositoryError>;
}
