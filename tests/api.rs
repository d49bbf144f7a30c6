//! API endpoint integration tests
//!
//! Drive the router directly with no network or audio hardware. The remote
//! store points at an unreachable address, so pipeline-touching routes
//! exercise the error mapping.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use secrecy::SecretString;
use tower::ServiceExt;

use lingua_gateway::api::{router, ApiState};
use lingua_gateway::config::{LlmConfig, SessionPaths, StoreConfig};
use lingua_gateway::llm::ChatClient;
use lingua_gateway::pipeline::TurnPipeline;
use lingua_gateway::session::SessionState;
use lingua_gateway::store::StoreClient;

mod common;
use common::FakeMic;

/// Build a test router over a temp session dir and unreachable collaborators
fn build_test_router(dir: &tempfile::TempDir) -> axum::Router {
    let paths = SessionPaths::new(dir.path());
    let session = SessionState::with_backend(paths, Arc::new(FakeMic));

    let store_config = StoreConfig {
        url: "http://127.0.0.1:9/data/v1".to_string(),
        api_key: None,
        priming_record: "000000000000000000000000".to_string(),
    };
    let llm_config = LlmConfig {
        api_key: SecretString::from("test-key".to_string()),
        model: "gpt-4o".to_string(),
        max_tokens: 3000,
        timeout: Duration::from_secs(2),
    };

    let store = StoreClient::new(&store_config, llm_config.timeout).unwrap();
    let llm = ChatClient::new(&llm_config).unwrap();
    let pipeline = TurnPipeline::new(session.clone(), store, llm.clone(), None, None);

    router(&ApiState {
        session,
        pipeline,
        llm,
    })
}

async fn get(router: &axum::Router, path: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let router = build_test_router(&dir);

    let (status, body) = get(&router, "/health").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn start_and_stop_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let router = build_test_router(&dir);

    let (status, body) = get(&router, "/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"message":"Recording started"}"#);

    let (status, body) = get(&router, "/stop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"message":"Recording stopped"}"#);

    assert!(dir.path().join("question.wav").exists());
}

#[tokio::test]
async fn double_start_is_a_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let router = build_test_router(&dir);

    let (status, _) = get(&router, "/start").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&router, "/start").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Recording is already in progress"}"#);

    // Clean up the worker
    let (status, _) = get(&router, "/stop").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn stop_while_idle_is_a_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let router = build_test_router(&dir);

    let (status, body) = get(&router, "/stop").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"No recording in progress"}"#);
}

#[tokio::test]
async fn close_deletes_files_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let router = build_test_router(&dir);

    // Session files from a previous run
    std::fs::write(dir.path().join("logs.json"), "[]").unwrap();
    std::fs::write(dir.path().join("ad.jpg"), b"\xff\xd8\xff").unwrap();

    let (status, body) = get(&router, "/close").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Files deleted\n");
    assert!(!dir.path().join("logs.json").exists());
    assert!(!dir.path().join("ad.jpg").exists());

    // A second close with nothing left still succeeds
    let (status, body) = get(&router, "/close").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Files deleted\n");
}

#[tokio::test]
async fn chat_surfaces_store_failure_as_bad_gateway() {
    let dir = tempfile::tempdir().unwrap();
    let router = build_test_router(&dir);

    let (status, body) = get(&router, "/chat").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].is_string());
}
