pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::ai::handlers as ai;
use crate::feedback::handlers as feedback;
use crate::resume::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            post(resumes::handle_create).get(resumes::handle_list),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get)
                .put(resumes::handle_update)
                .delete(resumes::handle_delete),
        )
        .route(
            "/api/v1/resumes/:id/sections",
            post(resumes::handle_add_section),
        )
        .route(
            "/api/v1/resumes/:id/sections/reorder",
            post(resumes::handle_reorder_sections),
        )
        .route(
            "/api/v1/resumes/:id/sections/:section_id",
            put(resumes::handle_update_section).delete(resumes::handle_delete_section),
        )
        .route(
            "/api/v1/resumes/:id/apply-draft",
            post(resumes::handle_apply_draft),
        )
        .route("/api/v1/resumes/:id/pages", get(resumes::handle_pages))
        .route("/api/v1/resumes/:id/preview", get(resumes::handle_preview))
        .route(
            "/api/v1/resumes/:id/preview.html",
            get(resumes::handle_preview_html),
        )
        .route(
            "/api/v1/resumes/:id/feedback",
            get(resumes::handle_resume_feedback),
        )
        // AI API
        .route("/api/v1/ai/generate-resume", post(ai::handle_generate_resume))
        .route(
            "/api/v1/ai/generate-resume-from-jobs",
            post(ai::handle_generate_from_jobs),
        )
        .route(
            "/api/v1/ai/generate-resume-section",
            post(ai::handle_generate_section),
        )
        .route("/api/v1/ai/calculate-score", post(ai::handle_calculate_score))
        .route(
            "/api/v1/ai/generate-feedback/:resume_id",
            post(ai::handle_generate_feedback),
        )
        .route("/api/v1/ai/score/:resume_id", post(ai::handle_score_resume))
        // Feedback API
        .route(
            "/api/v1/feedback",
            post(feedback::handle_create).get(feedback::handle_list),
        )
        .route(
            "/api/v1/feedback/:id",
            get(feedback::handle_get)
                .put(feedback::handle_update)
                .delete(feedback::handle_delete),
        )
        .with_state(state)
}
