//! Chunked upload handlers for documents too large for one request.
//!
//! Flow: open a session, push numbered fragments in any order, then commit with the total
//! fragment count. Commit reassembles the fragments, stores the record and discards the
//! session whatever the outcome.

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response for opening an upload session
#[derive(Debug, Serialize)]
pub struct OpenSessionResponse {
    pub session_id: String,
}

/// Request to store one fragment
#[derive(Debug, Deserialize)]
pub struct PushFragmentRequest {
    pub session_id: String,
    /// 0-based position of this fragment in the document
    pub sequence_number: u32,
    /// Raw text; fragments are concatenated verbatim
    pub payload: String,
}

/// Request to finish an upload
#[derive(Debug, Deserialize)]
pub struct CommitUploadRequest {
    pub session_id: String,
    /// Number of fragments; slots `0..expected_count` must all be present
    pub expected_count: u32,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CommitUploadResponse {
    pub status: &'static str,
    pub id: String,
}

pub async fn open_session(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let session_id = state.sessions.open().await?;
    Ok((StatusCode::OK, Json(OpenSessionResponse { session_id })))
}

pub async fn push_fragment(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<PushFragmentRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    state
        .fragments
        .push(
            &request.session_id,
            request.sequence_number,
            request.payload,
        )
        .await?;

    Ok(Json(StatusResponse { status: "success" }))
}

pub async fn commit_upload(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CommitUploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = state
        .commits
        .commit(&request.session_id, request.expected_count)
        .await?;

    Ok(Json(CommitUploadResponse {
        status: "success",
        id,
    }))
}

pub async fn get_upload_progress(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let progress = state.sessions.received(&session_id).await?;

    tracing::debug!(
        session_id = %session_id,
        received = progress.received.len(),
        received_bytes = progress.received_bytes,
        "Upload progress requested"
    );

    Ok(Json(progress))
}

pub async fn abort_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.sessions.close(&session_id).await?;
    tracing::info!(session_id = %session_id, "Upload session aborted");
    Ok(StatusCode::NO_CONTENT)
}
