//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use smilebooth_media::MediaError;
use smilebooth_storage::StorageError;

use crate::config::ApiConfig;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Render as a `{detail}` JSON response.
    ///
    /// Internal detail is replaced by a generic message in production.
    pub fn into_response_for(self, config: &ApiConfig) -> Response {
        let detail = if config.is_production() {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::internal(format!("worker task failed: {}", e))
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}
