//! Chat turn and model listing endpoints

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::{ApiError, ApiState};
use crate::pipeline::Utterance;

/// Build the chat router
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/ai", get(list_models))
        .route("/chat", get(chat_recorded).post(chat))
        .with_state(state)
}

/// List available models, passed through from the provider untouched
async fn list_models(State(state): State<ApiState>) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(state.llm.list_models().await?))
}

/// Optional request body for a text-driven turn
#[derive(Debug, Deserialize)]
struct ChatRequest {
    input: Option<String>,
}

/// Run one turn against the most recent recording
async fn chat_recorded(State(state): State<ApiState>) -> Result<String, ApiError> {
    run_turn(&state, Utterance::Recorded).await
}

/// Run one turn; text from the body when present, the recording otherwise
async fn chat(State(state): State<ApiState>, body: Bytes) -> Result<String, ApiError> {
    let utterance = serde_json::from_slice::<ChatRequest>(&body)
        .ok()
        .and_then(|request| request.input)
        .map_or(Utterance::Recorded, Utterance::Text);
    run_turn(&state, utterance).await
}

/// The reply body is the assistant text with a trailing newline
async fn run_turn(state: &ApiState, utterance: Utterance) -> Result<String, ApiError> {
    let reply = state.pipeline.run(utterance).await?;
    Ok(format!("{reply}\n"))
}
