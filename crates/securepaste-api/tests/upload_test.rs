//! Chunked upload API integration tests.
//!
//! Run with: `cargo test -p securepaste-api --test upload_test`

mod helpers;

use helpers::{open_session, push_fragment, setup_test_app, setup_test_app_with, upload_document};
use serde_json::{json, Value};

#[tokio::test]
async fn test_two_fragment_upload_appears_in_listing() {
    let app = setup_test_app().await;
    let client = app.client();

    let document = r#"{"content":"hi"}"#;
    let session_id = open_session(client).await;
    push_fragment(client, &session_id, 0, &document[..5]).await;
    push_fragment(client, &session_id, 1, &document[5..]).await;

    let response = client
        .post("/api/upload/commit")
        .json(&json!({"session_id": session_id, "expected_count": 2}))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 32);

    let listing: Vec<Value> = client.get("/api/pastes").await.json();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["id"], json!(id));
    assert_eq!(listing[0]["content"], json!("hi"));
    assert_eq!(app.session_count(), 0);
}

#[tokio::test]
async fn test_encrypted_upload_keeps_envelope() {
    let app = setup_test_app().await;
    let client = app.client();

    let document = json!({
        "content": {"ct": "Y2lwaGVydGV4dA==", "iv": "aXY=", "ek": "ZWs="},
        "is_encrypted": true,
        "remark": "notes from tuesday",
    })
    .to_string();
    let id = upload_document(client, &document, 4).await;

    let listing: Vec<Value> = client.get("/api/pastes").await.json();
    assert_eq!(listing[0]["id"], json!(id));
    assert_eq!(listing[0]["is_encrypted"], json!(true));
    assert_eq!(listing[0]["remark"], json!("notes from tuesday"));
    assert_eq!(listing[0]["content"]["ct"], json!("Y2lwaGVydGV4dA=="));

    let files = app.record_files();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with(&format!("_{}.json", id)));
}

#[tokio::test]
async fn test_missing_fragment_is_rejected() {
    let app = setup_test_app().await;
    let client = app.client();

    let session_id = open_session(client).await;
    push_fragment(client, &session_id, 0, "{\"content\":").await;
    push_fragment(client, &session_id, 2, "}").await;

    let response = client
        .post("/api/upload/commit")
        .json(&json!({"session_id": session_id, "expected_count": 3}))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INCOMPLETE_UPLOAD");
    assert!(body["error"].as_str().unwrap().contains('1'));

    assert!(app.record_files().is_empty());
    assert_eq!(app.session_count(), 0);
}

#[tokio::test]
async fn test_non_json_document_is_rejected() {
    let app = setup_test_app().await;
    let client = app.client();

    let session_id = open_session(client).await;
    push_fragment(client, &session_id, 0, "definitely not json").await;

    let response = client
        .post("/api/upload/commit")
        .json(&json!({"session_id": session_id, "expected_count": 1}))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "FORMAT_ERROR");

    assert!(app.record_files().is_empty());
    assert_eq!(app.session_count(), 0);
}

#[tokio::test]
async fn test_commit_unknown_session_is_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload/commit")
        .json(&json!({"session_id": "0123456789abcdef0123456789abcdef", "expected_count": 1}))
        .await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn test_traversal_identifiers_are_rejected() {
    let app = setup_test_app().await;
    let client = app.client();

    let push = client
        .post("/api/upload/fragments")
        .json(&json!({"session_id": "../../etc", "sequence_number": 0, "payload": "x"}))
        .await;
    assert_eq!(push.status_code(), 400);
    let body: Value = push.json();
    assert_eq!(body["error"], "Invalid ID format");

    let commit = client
        .post("/api/upload/commit")
        .json(&json!({"session_id": "..\\..", "expected_count": 1}))
        .await;
    assert_eq!(commit.status_code(), 400);

    let progress = client.get("/api/upload/sessions/..%2F..").await;
    assert_eq!(progress.status_code(), 400);

    assert_eq!(app.session_count(), 0);
}

#[tokio::test]
async fn test_progress_and_abort() {
    let app = setup_test_app().await;
    let client = app.client();

    let session_id = open_session(client).await;
    push_fragment(client, &session_id, 4, "abc").await;
    push_fragment(client, &session_id, 1, "de").await;

    let response = client
        .get(&format!("/api/upload/sessions/{}", session_id))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["session_id"], json!(session_id));
    assert_eq!(body["received"], json!([1, 4]));
    assert_eq!(body["received_bytes"], json!(5));

    let abort = client
        .delete(&format!("/api/upload/sessions/{}", session_id))
        .await;
    assert_eq!(abort.status_code(), 204);
    assert_eq!(app.session_count(), 0);

    // Aborting twice is fine, asking for progress is not
    let again = client
        .delete(&format!("/api/upload/sessions/{}", session_id))
        .await;
    assert_eq!(again.status_code(), 204);
    let gone = client
        .get(&format!("/api/upload/sessions/{}", session_id))
        .await;
    assert_eq!(gone.status_code(), 404);
}

#[tokio::test]
async fn test_fragment_limits() {
    let app = setup_test_app_with(|config| {
        config.upload.max_fragment_bytes = 8;
        config.upload.max_session_bytes = 12;
        config.upload.max_fragments = 4;
    })
    .await;
    let client = app.client();
    let session_id = open_session(client).await;

    let too_big = client
        .post("/api/upload/fragments")
        .json(&json!({"session_id": session_id, "sequence_number": 0, "payload": "123456789"}))
        .await;
    assert_eq!(too_big.status_code(), 413);

    let out_of_range = client
        .post("/api/upload/fragments")
        .json(&json!({"session_id": session_id, "sequence_number": 4, "payload": "x"}))
        .await;
    assert_eq!(out_of_range.status_code(), 400);

    push_fragment(client, &session_id, 0, "12345678").await;
    let over_session = client
        .post("/api/upload/fragments")
        .json(&json!({"session_id": session_id, "sequence_number": 1, "payload": "12345"}))
        .await;
    assert_eq!(over_session.status_code(), 413);
    let body: Value = over_session.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_malformed_fragment_body_is_bad_request() {
    let app = setup_test_app().await;
    let session_id = open_session(app.client()).await;

    let response = app
        .client()
        .post("/api/upload/fragments")
        .json(&json!({"session_id": session_id, "sequence_number": -1, "payload": "x"}))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}
