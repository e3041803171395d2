//! Test helpers: build AppState and router for integration tests.
//!
//! Every test app gets its own temp directory holding both the record store and the
//! session root, so tests run in parallel without sharing state.

#![allow(dead_code)]

use axum_test::TestServer;
use securepaste_api::setup::{routes, services};
use securepaste_api::AppState;
use securepaste_core::Config;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server, state, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn data_dir(&self) -> PathBuf {
        self._temp_dir.path().join("pastes")
    }

    pub fn session_dir(&self) -> PathBuf {
        self._temp_dir.path().join("sessions")
    }

    /// Names of the files in the record directory.
    pub fn record_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.data_dir())
            .expect("Failed to read record directory")
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    pub fn session_count(&self) -> usize {
        std::fs::read_dir(self.session_dir())
            .expect("Failed to read session directory")
            .count()
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Build a test app after letting the caller adjust the configuration.
pub async fn setup_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let mut config = Config::with_dirs(
        temp_dir.path().join("pastes"),
        temp_dir.path().join("sessions"),
    );
    configure(&mut config);

    let state = services::initialize_services(&config)
        .await
        .expect("Failed to initialize services");
    let app = routes::setup_routes(&config, state.clone())
        .await
        .expect("Failed to setup routes");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

/// Open an upload session and return its id.
pub async fn open_session(client: &TestServer) -> String {
    let response = client.post("/api/upload/sessions").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    body["session_id"]
        .as_str()
        .expect("session_id missing")
        .to_string()
}

pub async fn push_fragment(client: &TestServer, session_id: &str, seq: u32, payload: &str) {
    let response = client
        .post("/api/upload/fragments")
        .json(&json!({
            "session_id": session_id,
            "sequence_number": seq,
            "payload": payload,
        }))
        .await;
    assert_eq!(response.status_code(), 200, "push fragment {}", seq);
}

/// Upload `document` split into `parts` fragments and commit it; returns the record id.
pub async fn upload_document(client: &TestServer, document: &str, parts: usize) -> String {
    let session_id = open_session(client).await;
    let chunk_len = document.len().div_ceil(parts).max(1);
    let bytes = document.as_bytes();
    let chunks: Vec<&[u8]> = bytes.chunks(chunk_len).collect();

    for (seq, chunk) in chunks.iter().enumerate().rev() {
        let payload = std::str::from_utf8(chunk).expect("test documents are ASCII");
        push_fragment(client, &session_id, seq as u32, payload).await;
    }

    let response = client
        .post("/api/upload/commit")
        .json(&json!({"session_id": session_id, "expected_count": chunks.len()}))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "success");
    body["id"].as_str().expect("id missing").to_string()
}
