//! Axum route handlers for the session flow API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::flow::controller::FlowSnapshot;
use crate::presenter::paywall::Plan;
use crate::presenter::view::{DocumentTab, ViewMode};
use crate::state::AppState;

/// Multipart field carrying the imported résumé file.
const FILE_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub flow: FlowSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct TextInputRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    pub mode: Option<ViewMode>,
    pub tab: Option<DocumentTab>,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub plan: Plan,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let session = state.sessions.create();
    let flow = session.snapshot().await;
    (
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id: session.id(),
            created_at: session.created_at(),
            flow,
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowSnapshot>, AppError> {
    let session = state.sessions.get(id)?;
    Ok(Json(session.snapshot().await))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id) {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/start
pub async fn handle_start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowSnapshot>, AppError> {
    let session = state.sessions.get(id)?;
    Ok(Json(session.start().await))
}

/// PUT /api/v1/sessions/:id/input
pub async fn handle_set_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TextInputRequest>,
) -> Result<Json<FlowSnapshot>, AppError> {
    let session = state.sessions.get(id)?;
    Ok(Json(session.set_text(request.text).await?))
}

/// POST /api/v1/sessions/:id/input/file
///
/// Multipart upload with a single `file` field. Only `.txt` / `.md` are read.
pub async fn handle_import_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<FlowSnapshot>, AppError> {
    let session = state.sessions.get(id)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;

        let snapshot = session
            .import_file(&file_name, content_type.as_deref(), &bytes)
            .await?;
        return Ok(Json(snapshot));
    }

    Err(AppError::Validation(format!(
        "Multipart field '{FILE_FIELD}' is missing"
    )))
}

/// POST /api/v1/sessions/:id/submit
///
/// Runs the analysis. 502 with a retry-later message when the provider fails;
/// the session is then back in Input with its text intact.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowSnapshot>, AppError> {
    let session = state.sessions.get(id)?;
    Ok(Json(session.submit(state.analyzer.clone()).await?))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowSnapshot>, AppError> {
    let session = state.sessions.get(id)?;
    Ok(Json(session.reset().await?))
}

/// POST /api/v1/sessions/:id/notice/dismiss
pub async fn handle_dismiss_notice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowSnapshot>, AppError> {
    let session = state.sessions.get(id)?;
    Ok(Json(session.dismiss_notice().await))
}

/// PUT /api/v1/sessions/:id/view
pub async fn handle_set_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ViewRequest>,
) -> Result<Json<FlowSnapshot>, AppError> {
    let session = state.sessions.get(id)?;
    Ok(Json(session.set_view(request.mode, request.tab).await?))
}

/// POST /api/v1/sessions/:id/paywall/open
pub async fn handle_open_paywall(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowSnapshot>, AppError> {
    let session = state.sessions.get(id)?;
    Ok(Json(session.open_paywall().await?))
}

/// POST /api/v1/sessions/:id/paywall/close
pub async fn handle_close_paywall(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowSnapshot>, AppError> {
    let session = state.sessions.get(id)?;
    Ok(Json(session.close_paywall().await?))
}

/// POST /api/v1/sessions/:id/paywall/purchase
pub async fn handle_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PurchaseRequest>,
) -> Result<Json<FlowSnapshot>, AppError> {
    let session = state.sessions.get(id)?;
    Ok(Json(session.purchase(request.plan).await?))
}
