//! In-process product store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::products::model::{NewProduct, Product};
use crate::storage::repository::{ProductRepository, RepositoryError};

#[derive(Default)]
struct Table {
    rows: BTreeMap<i64, Product>,
    last_id: i64,
}

/// A [`ProductRepository`] kept in memory, ordered by id.
///
/// Selected with `database.url = "memory"`; also the store behind the HTTP tests.
#[derive(Default)]
pub struct InMemoryProductRepository {
    table: RwLock<Table>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row, assigning the next id and both timestamps.
    pub async fn insert(&self, new: NewProduct) -> Product {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let now = Utc::now();
        let product = Product {
            id: table.last_id,
            name: new.name,
            price: new.price,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(product.id, product.clone());
        product
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_where_price_less_than(
        &self,
        limit: f64,
    ) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .filter(|p| p.price < limit)
            .cloned()
            .collect())
    }

    async fn save(&self, product: Product) -> Result<Product, RepositoryError> {
        let mut table = self.table.write().await;
        table.last_id = table.last_id.max(product.id);
        let stored = match table.rows.get(&product.id) {
            Some(existing) => Product {
                created_at: existing.created_at,
                updated_at: existing.updated_at,
                ..product
            },
            None => product,
        };
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, product: &Product) -> Result<(), RepositoryError> {
        self.table.write().await.rows.remove(&product.id);
        Ok(())
    }
}
