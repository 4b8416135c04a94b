//! Axum route handler for one-shot analysis outside any session.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::flow::input::MIN_RESUME_CHARS;
use crate::models::analysis::AnalysisResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
}

/// POST /api/v1/analyze
///
/// Same length gate as the session flow, then a single analyzer call.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let chars = request.resume_text.chars().count();
    if chars < MIN_RESUME_CHARS {
        return Err(AppError::Validation(format!(
            "resume_text needs at least {MIN_RESUME_CHARS} characters, got {chars}"
        )));
    }

    let result = state.analyzer.analyze(&request.resume_text).await?;
    Ok(Json(result))
}
