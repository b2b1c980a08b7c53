//! Axum route handlers for the Resume API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::CurrentUser;
use crate::layout::{analyze_page_fill, paginate, Page, PageConfig, PageFillAnalysis};
use crate::models::draft::ResumeDraft;
use crate::models::feedback::AiFeedback;
use crate::models::resume::{Resume, ResumeSummary};
use crate::render::{render_document, render_preview, Preview};
use crate::resume::service::{
    AddSectionRequest, CreateResumeRequest, ReorderRequest, UpdateResumeRequest,
    UpdateSectionRequest,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PageReport {
    #[serde(flatten)]
    pub page: Page,
    pub fill: PageFillAnalysis,
}

#[derive(Debug, Serialize)]
pub struct PagesResponse {
    pub resume_id: Uuid,
    pub page_count: usize,
    pub page_config: PageConfig,
    pub pages: Vec<PageReport>,
}

// ────────────────────────────────────────────────────────────────────────────
// CRUD
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let resume = state.resumes.create(user, request).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    let resumes = state.resumes.list(user).await?;
    Ok(Json(resumes.iter().map(ResumeSummary::from).collect()))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.get(user, id).await?))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateResumeRequest>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.update(user, id, request).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.resumes.delete(user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/:id/sections
pub async fn handle_add_section(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AddSectionRequest>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let resume = state.resumes.add_section(user, id, request).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// PUT /api/v1/resumes/:id/sections/:section_id
pub async fn handle_update_section(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, section_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateSectionRequest>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(
        state
            .resumes
            .update_section(user, id, section_id, request)
            .await?,
    ))
}

/// DELETE /api/v1/resumes/:id/sections/:section_id
pub async fn handle_delete_section(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, section_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.delete_section(user, id, section_id).await?))
}

/// POST /api/v1/resumes/:id/sections/reorder
pub async fn handle_reorder_sections(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.reorder_sections(user, id, request).await?))
}

/// POST /api/v1/resumes/:id/apply-draft
///
/// Merges AI-generated content into the resume's sections.
pub async fn handle_apply_draft(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(draft): Json<ResumeDraft>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.apply_draft(user, id, &draft).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Layout and preview
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resumes/:id/pages
pub async fn handle_pages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PagesResponse>, AppError> {
    let resume = state.resumes.get(user, id).await?;
    let config = state.config.page;
    let pages: Vec<PageReport> = paginate(&resume.sections, &config)
        .into_iter()
        .map(|page| PageReport {
            fill: analyze_page_fill(&page, &config),
            page,
        })
        .collect();

    Ok(Json(PagesResponse {
        resume_id: resume.id,
        page_count: pages.len(),
        page_config: config,
        pages,
    }))
}

/// GET /api/v1/resumes/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Preview>, AppError> {
    let resume = state.resumes.get(user, id).await?;
    Ok(Json(render_preview(&resume, &state.config.page)))
}

/// GET /api/v1/resumes/:id/preview.html
pub async fn handle_preview_html(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let resume = state.resumes.get(user, id).await?;
    Ok(Html(render_document(&resume, &state.config.page)))
}

/// GET /api/v1/resumes/:id/feedback
pub async fn handle_resume_feedback(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AiFeedback>, AppError> {
    Ok(Json(state.feedback.get_for_resume(user, id).await?))
}
