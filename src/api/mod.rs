//! HTTP API server for the lingua gateway

pub mod chat;
pub mod health;
pub mod session;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::llm::ChatClient;
use crate::pipeline::TurnPipeline;
use crate::session::SessionState;
use crate::{Error, Result};

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub session: SessionState,
    pub pipeline: TurnPipeline,
    pub llm: ChatClient,
}

/// API error: a gateway error mapped onto an HTTP response
///
/// Recorder misuse maps to 400 with the compat bodies existing clients
/// expect; remote-collaborator failures to 502; everything else to 500.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(serde::Serialize)]
        struct ErrorBody {
            error: String,
        }

        let (status, error) = match &self.0 {
            Error::AlreadyRecording => (
                StatusCode::BAD_REQUEST,
                "Recording is already in progress".to_string(),
            ),
            Error::NotRecording => (
                StatusCode::BAD_REQUEST,
                "No recording in progress".to_string(),
            ),
            e if e.is_remote() => (StatusCode::BAD_GATEWAY, e.to_string()),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        tracing::debug!(status = %status, error = %error, "request failed");
        (status, Json(ErrorBody { error })).into_response()
    }
}

/// Build the router with all routes
#[must_use]
pub fn router(state: &ApiState) -> Router {
    // CORS is wide open: the browser client calls from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(chat::router(state.clone()))
        .merge(session::router(state.clone()))
        .merge(health::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    state: ApiState,
    port: u16,
}

impl ApiServer {
    /// Create a server over the given state and port
    #[must_use]
    pub const fn new(state: ApiState, port: u16) -> Self {
        Self { state, port }
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, router(&self.state))
            .await
            .map_err(|e| Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
