//! The Product entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored product, as returned to clients.
///
/// `updated_at` is set when the row is created and is not refreshed by
/// later saves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for a row that does not exist yet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
}
