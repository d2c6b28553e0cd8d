//! Response bodies and error-to-status mapping.
//!
//! # Status Mapping
//! - Validation failure → 400, body is the detail array
//! - Malformed JSON body → 400 `{"message": "invalid JSON body"}`
//! - Missing row → 404 `{"message": "resource not found"}`
//! - Anything else → 500 `{"message": "internal error"}`; the cause is
//!   logged and never sent to the client

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::products::validation::ValidationErrors;
use crate::storage::RepositoryError;

pub const NOT_FOUND_MESSAGE: &str = "resource not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

/// `{"message": "..."}` body used by every non-validation reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure of a single request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid JSON body: {0}")]
    BadRequestBody(#[from] serde_json::Error),

    #[error("resource not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] RepositoryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                tracing::debug!(error = %errors, "Rejected request parameters");
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            ApiError::BadRequestBody(e) => {
                tracing::debug!(error = %e, "Rejected request body");
                (StatusCode::BAD_REQUEST, Json(Message::new("invalid JSON body"))).into_response()
            }
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(Message::new(NOT_FOUND_MESSAGE))).into_response()
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(Message::new(INTERNAL_ERROR_MESSAGE)),
                )
                    .into_response()
            }
        }
    }
}

/// Fallback for paths no route matches.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
