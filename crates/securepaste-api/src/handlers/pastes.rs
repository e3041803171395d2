//! Paste handlers: single-request create, listing and deletion.

use crate::error::{HttpAppError, ModelJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use securepaste_core::models::NewPaste;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct CreatePasteResponse {
    pub status: &'static str,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct DeletePasteResponse {
    pub status: &'static str,
    pub deleted_count: usize,
}

pub async fn create_paste(
    State(state): State<Arc<AppState>>,
    ModelJson(paste): ModelJson<NewPaste>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = state.pastes.create(paste).await?;
    Ok(Json(CreatePasteResponse {
        status: "success",
        id,
    }))
}

/// Newest records first, at most 200.
pub async fn list_pastes(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let records = state.index.list().await?;
    Ok(Json(records))
}

pub async fn delete_paste(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted_count = state.deletion.delete(&id).await?;
    Ok(Json(DeletePasteResponse {
        status: "success",
        deleted_count,
    }))
}
