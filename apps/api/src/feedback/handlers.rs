//! Axum route handlers for stored AI feedback.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::service::{CreateFeedbackRequest, UpdateFeedbackRequest};
use crate::identity::CurrentUser;
use crate::models::feedback::AiFeedback;
use crate::state::AppState;

/// POST /api/v1/feedback
pub async fn handle_create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<AiFeedback>), AppError> {
    let feedback = state.feedback.create(user, request).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// GET /api/v1/feedback
pub async fn handle_list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<AiFeedback>>, AppError> {
    Ok(Json(state.feedback.list(user).await?))
}

/// GET /api/v1/feedback/:id
pub async fn handle_get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AiFeedback>, AppError> {
    Ok(Json(state.feedback.get(user, id).await?))
}

/// PUT /api/v1/feedback/:id
pub async fn handle_update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFeedbackRequest>,
) -> Result<Json<AiFeedback>, AppError> {
    Ok(Json(state.feedback.update(user, id, request).await?))
}

/// DELETE /api/v1/feedback/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.feedback.delete(user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
