//! Postgres-backed product repository.
//!
//! Column names match what the original ORM created. Its table stores `id`
//! and `price` as `integer`; a table created here uses `BIGSERIAL` and
//! `DOUBLE PRECISION`. Reads cast both columns, so either layout decodes, and
//! writes rely on Postgres' assignment casts (a price written to an
//! `integer` column is rounded).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::products::model::{NewProduct, Product};
use crate::storage::repository::{ProductRepository, RepositoryError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS product (
    id          BIGSERIAL PRIMARY KEY,
    name        VARCHAR NOT NULL,
    price       DOUBLE PRECISION NOT NULL,
    "createdAt" TIMESTAMPTZ NOT NULL DEFAULT now(),
    "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const COLUMNS: &str =
    r#"id::BIGINT AS id, name, price::DOUBLE PRECISION AS price, "createdAt", "updatedAt""#;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: f64,
    #[sqlx(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A [`ProductRepository`] over a sqlx Postgres pool.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool that opens connections on first use.
    ///
    /// Only a malformed URL fails here; an unreachable server surfaces later,
    /// per request.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy(&config.url)?;
        Ok(Self::new(pool))
    }

    /// Create the `product` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Create a row; the database assigns the id and both timestamps.
    pub async fn insert(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!("INSERT INTO product (name, price) VALUES ($1, $2) RETURNING {COLUMNS}");
        let row: ProductRow = sqlx::query_as(&sql)
            .bind(new.name)
            .bind(new.price)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM product ORDER BY id");
        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM product WHERE id = $1");
        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::from))
    }

    async fn find_where_price_less_than(
        &self,
        limit: f64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM product WHERE price < $1 ORDER BY id");
        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn save(&self, product: Product) -> Result<Product, RepositoryError> {
        // Timestamps are written only when the row has to be (re)created.
        let sql = format!(
            r#"INSERT INTO product (id, name, price, "createdAt", "updatedAt")
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, price = EXCLUDED.price
               RETURNING {COLUMNS}"#
        );
        let row: ProductRow = sqlx::query_as(&sql)
            .bind(product.id)
            .bind(product.name)
            .bind(product.price)
            .bind(product.created_at)
            .bind(product.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn delete(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(product.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
