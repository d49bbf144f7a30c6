//! Recording lifecycle and session reset endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::{ApiError, ApiState};
use crate::Error;

/// Build the session router
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/start", get(start))
        .route("/stop", get(stop))
        .route("/close", get(close))
        .with_state(state)
}

/// Success body for the recording endpoints
#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

/// Begin audio capture
async fn start(State(state): State<ApiState>) -> Result<Json<MessageResponse>, ApiError> {
    state.session.recorder().start()?;
    Ok(Json(MessageResponse {
        message: "Recording started",
    }))
}

/// End audio capture; blocks until the capture file is flushed and closed
async fn stop(State(state): State<ApiState>) -> Result<Json<MessageResponse>, ApiError> {
    let recorder = Arc::clone(state.session.recorder());
    tokio::task::spawn_blocking(move || recorder.stop())
        .await
        .map_err(|e| ApiError(Error::Audio(format!("stop task failed: {e}"))))??;

    Ok(Json(MessageResponse {
        message: "Recording stopped",
    }))
}

/// Delete session files; idempotent, never fails
async fn close(State(state): State<ApiState>) -> &'static str {
    state.session.close().await;
    "Files deleted\n"
}
