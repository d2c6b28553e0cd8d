//! Shallow, unchecked merge of a PATCH body into a stored product.
//!
//! Every key of the body object is assigned onto the product. Only `name`
//! and `price` reach the table; `id`, `createdAt` and `updatedAt` are
//! immutable columns and assignments to them are dropped. Any other key is
//! carried along and echoed in the response without being stored.
//!
//! Bodies that are not objects behave like assigning them onto an object:
//! array elements and string characters become index keys (`"0"`, `"1"`, ..)
//! that are echoed only; numbers, booleans and `null` merge nothing.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::products::model::Product;
use crate::products::validation::parse_number;
use crate::storage::RepositoryError;

const IMMUTABLE_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// A product with the body merged in, plus the keys no column holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Assign `body` onto `stored`.
///
/// A `name` given as a number or boolean is stored as its text, as the
/// database driver would send it. A `name` of any other non-string type, or a
/// `price` that is neither a number nor a numeric string, cannot be written
/// to its column and fails the way a rejected save would.
pub fn merge_patch(stored: Product, body: &Value) -> Result<MergedProduct, RepositoryError> {
    let mut product = stored;

    let fields = match body {
        Value::Object(fields) => fields,
        Value::Array(items) => {
            let extra = items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect();
            return Ok(MergedProduct { product, extra });
        }
        Value::String(text) => {
            let extra = text
                .chars()
                .enumerate()
                .map(|(i, c)| (i.to_string(), Value::String(c.to_string())))
                .collect();
            return Ok(MergedProduct { product, extra });
        }
        _ => {
            return Ok(MergedProduct {
                product,
                extra: Map::new(),
            })
        }
    };

    let mut extra = Map::new();

    for (key, value) in fields {
        match key.as_str() {
            "name" => {
                product.name = column_text(value).ok_or_else(|| unrepresentable("name", value))?;
            }
            "price" => {
                product.price = column_number(value).ok_or_else(|| unrepresentable("price", value))?;
            }
            k if IMMUTABLE_FIELDS.contains(&k) => {}
            _ => {
                extra.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(MergedProduct { product, extra })
}

fn column_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn column_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn unrepresentable(field: &'static str, value: &Value) -> RepositoryError {
    RepositoryError::Unrepresentable {
        field,
        reason: format!("invalid value {value}"),
    }
}
