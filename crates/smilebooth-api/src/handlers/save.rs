//! Capture handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::{error, warn};

use smilebooth_media::decode_data_url;
use smilebooth_models::{ImagePayload, SaveResponse};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Decode a posted frame and store it as a timestamped capture.
pub async fn save(
    State(state): State<AppState>,
    payload: Result<Json<ImagePayload>, JsonRejection>,
) -> (StatusCode, Json<SaveResponse>) {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            warn!("Rejected capture payload: {}", rejection.body_text());
            metrics::record_capture(false);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveResponse::failed(rejection.body_text())),
            );
        }
    };

    match store_capture(&state, payload).await {
        Ok(response) => {
            metrics::record_capture(true);
            (StatusCode::OK, Json(response))
        }
        Err(e) => {
            error!("Error saving image: {}", e);
            metrics::record_capture(false);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(SaveResponse::failed(failure_message(e))))
        }
    }
}

async fn store_capture(state: &AppState, payload: ImagePayload) -> ApiResult<SaveResponse> {
    let frame = tokio::task::spawn_blocking(move || decode_data_url(&payload.image)).await??;
    let record = state.store.save(&frame).await?;
    Ok(SaveResponse::saved(record))
}

// Report the underlying cause without the API-level prefix.
fn failure_message(e: ApiError) -> String {
    match e {
        ApiError::Media(inner) => inner.to_string(),
        ApiError::Storage(inner) => inner.to_string(),
        other => other.to_string(),
    }
}
