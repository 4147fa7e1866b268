//! Booth page handler.

use axum::extract::State;
use axum::response::{Html, Response};

use smilebooth_storage::list_gallery;

use crate::error::ApiError;
use crate::page::render_index;
use crate::state::AppState;

/// Render the booth page with the gallery, newest capture first.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, Response> {
    let entries = list_gallery(&state.config.image_dir)
        .await
        .map_err(|e| ApiError::from(e).into_response_for(&state.config))?;
    Ok(Html(render_index(&entries, state.health())))
}
