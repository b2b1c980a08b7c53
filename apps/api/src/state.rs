use crate::ai::AiService;
use crate::config::Config;
use crate::feedback::FeedbackService;
use crate::resume::ResumeService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub resumes: ResumeService,
    pub feedback: FeedbackService,
    pub ai: AiService,
    /// Page geometry for pagination and preview lives in `config.page`.
    pub config: Config,
}
