//! Smile detection handler.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::{debug, error, warn};

use smilebooth_media::MediaError;
use smilebooth_models::{DetectResponse, ImagePayload};

use crate::metrics::{self, DetectionLabel};
use crate::state::AppState;

/// Message returned while either classifier is unavailable.
pub const CLASSIFIERS_UNAVAILABLE: &str =
    "Cascade classifiers not loaded properly. Please check the console for errors.";

/// Run face and smile detection on a posted frame.
///
/// Classifier health is checked before the body is looked at. Payload and
/// detection failures answer 500 with `smile_detected: false`.
pub async fn detect(
    State(state): State<AppState>,
    payload: Result<Json<ImagePayload>, JsonRejection>,
) -> (StatusCode, Json<DetectResponse>) {
    let start = Instant::now();

    if !state.health().is_ready() {
        metrics::record_detection(DetectionLabel::Unavailable, start.elapsed().as_secs_f64());
        return (StatusCode::OK, Json(DetectResponse::failed(CLASSIFIERS_UNAVAILABLE)));
    }

    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            warn!("Rejected detection payload: {}", rejection.body_text());
            metrics::record_detection(DetectionLabel::Error, start.elapsed().as_secs_f64());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DetectResponse::failed(rejection.body_text())),
            );
        }
    };

    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.detect_data_url(&payload.image)).await;
    let elapsed = start.elapsed().as_secs_f64();

    match result {
        Ok(Ok(outcome)) => {
            metrics::record_faces_found(outcome.faces_found);
            let label = if outcome.smile_detected {
                DetectionLabel::Smile
            } else {
                DetectionLabel::NoSmile
            };
            metrics::record_detection(label, elapsed);
            debug!(
                smile = outcome.smile_detected,
                faces = outcome.faces_found,
                examined = outcome.faces_examined,
                "Detection finished"
            );
            (StatusCode::OK, Json(DetectResponse::verdict(outcome.smile_detected)))
        }
        Ok(Err(e @ MediaError::ClassifierUnavailable(_))) => {
            metrics::record_detection(DetectionLabel::Unavailable, elapsed);
            (StatusCode::OK, Json(DetectResponse::failed(e.to_string())))
        }
        Ok(Err(e)) => {
            error!("Error in smile detection: {}", e);
            metrics::record_detection(DetectionLabel::Error, elapsed);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(DetectResponse::failed(e.to_string())))
        }
        Err(e) => {
            error!("Detection task failed: {}", e);
            metrics::record_detection(DetectionLabel::Error, elapsed);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DetectResponse::failed("detection task failed")),
            )
        }
    }
}
