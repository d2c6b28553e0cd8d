//! Request handlers for the product resource.
//!
//! Each handler runs validate → repository → map result, and returns its own
//! `Result`; [`ApiError`] decides the status code.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::http::response::{ApiError, Message};
use crate::http::server::AppState;
use crate::products::model::Product;
use crate::products::patch::{merge_patch, MergedProduct};
use crate::products::validation::{
    IdentifierValidator, ParamValidator, PriceLimitValidator, ProductId, RawParams,
};

pub async fn ping() -> Json<Message> {
    Json(Message::new("hello world"))
}

/// `GET /products[?priceLimit=N]`
///
/// The filter applies only when `priceLimit` is present and non-empty.
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<RawParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let filtered = params.get("priceLimit").is_some_and(|v| !v.is_empty());

    let products = if filtered {
        let limit = PriceLimitValidator.validate(&params)?;
        state
            .products
            .find_where_price_less_than(limit.price_limit)
            .await?
    } else {
        state.products.find_all().await?
    };

    tracing::debug!(count = products.len(), filtered, "Listed products");
    Ok(Json(products))
}

/// `GET /products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(params): Path<RawParams>,
) -> Result<Json<Product>, ApiError> {
    let product = load(&state, &params).await?;
    Ok(Json(product))
}

/// `DELETE /products/{id}`
pub async fn delete_product(
    State(state): State<AppState>,
    Path(params): Path<RawParams>,
) -> Result<String, ApiError> {
    let product = load(&state, &params).await?;
    state.products.delete(&product).await?;

    tracing::info!(product_id = product.id, "Product deleted");
    Ok(format!(
        "Resource with id {} was deleted successfully",
        product.id
    ))
}

/// `PATCH /products/{id}`
///
/// Concurrent patches of one row are not serialized; the last save wins.
pub async fn patch_product(
    State(state): State<AppState>,
    Path(params): Path<RawParams>,
    body: Bytes,
) -> Result<Json<MergedProduct>, ApiError> {
    let id = IdentifierValidator.validate(&params)?;
    let patch: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(&body)?
    };

    let stored = find(&state, id).await?;
    let merged = merge_patch(stored, &patch)?;
    let saved = state.products.save(merged.product).await?;

    tracing::info!(product_id = saved.id, "Product updated");
    Ok(Json(MergedProduct {
        product: saved,
        extra: merged.extra,
    }))
}

async fn load(state: &AppState, params: &RawParams) -> Result<Product, ApiError> {
    let id = IdentifierValidator.validate(params)?;
    find(state, id).await
}

async fn find(state: &AppState, id: ProductId) -> Result<Product, ApiError> {
    let found = match id.key() {
        Some(key) => state.products.find_by_id(key).await?,
        None => None,
    };
    found.ok_or_else(|| {
        tracing::debug!(product_id = id.id, "Product not found");
        ApiError::NotFound
    })
}
