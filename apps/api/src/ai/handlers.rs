//! Axum route handlers for the AI API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::CurrentUser;
use crate::models::draft::ResumeDraft;
use crate::models::feedback::AiFeedback;
use crate::models::resume::Resume;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateResumeRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateFromJobsRequest {
    #[serde(alias = "resume_content")]
    pub content: ResumeDraft,
    #[serde(default)]
    pub job_descriptions: Vec<String>,
    #[serde(default)]
    pub use_current_resume_info: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateSectionRequest {
    pub section_title: String,
    #[serde(default)]
    pub resume_content: ResumeDraft,
}

#[derive(Debug, Deserialize)]
pub struct CalculateScoreRequest {
    #[serde(alias = "resume_content")]
    pub content: ResumeDraft,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub score: u8,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ai/generate-resume
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(request): Json<GenerateResumeRequest>,
) -> Result<Json<ResumeDraft>, AppError> {
    let draft = state.ai.generate_resume(&request.prompt).await?;
    Ok(Json(draft))
}

/// POST /api/v1/ai/generate-resume-from-jobs
pub async fn handle_generate_from_jobs(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(request): Json<GenerateFromJobsRequest>,
) -> Result<Json<ResumeDraft>, AppError> {
    let draft = state
        .ai
        .generate_from_jobs(
            &request.content,
            &request.job_descriptions,
            request.use_current_resume_info,
        )
        .await?;
    Ok(Json(draft))
}

/// POST /api/v1/ai/generate-resume-section
pub async fn handle_generate_section(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(request): Json<GenerateSectionRequest>,
) -> Result<Json<ResumeDraft>, AppError> {
    let draft = state
        .ai
        .generate_section(&request.section_title, &request.resume_content)
        .await?;
    Ok(Json(draft))
}

/// POST /api/v1/ai/calculate-score
pub async fn handle_calculate_score(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(request): Json<CalculateScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let score = state.ai.calculate_score(&request.content).await?;
    Ok(Json(ScoreResponse { score }))
}

/// POST /api/v1/ai/generate-feedback/:resume_id
///
/// Reviews the stored resume; any earlier feedback for it is replaced.
pub async fn handle_generate_feedback(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<AiFeedback>, AppError> {
    let feedback = state.ai.generate_feedback(user, resume_id).await?;
    Ok(Json(feedback))
}

/// POST /api/v1/ai/score/:resume_id
pub async fn handle_score_resume(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    let resume = state.ai.score_resume(user, resume_id).await?;
    Ok(Json(resume))
}
