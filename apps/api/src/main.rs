mod ai;
mod config;
mod db;
mod errors;
mod feedback;
mod identity;
mod layout;
mod llm_client;
mod models;
mod render;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai::AiService;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::feedback::repository::{
    FeedbackRepository, InMemoryFeedbackRepository, PgFeedbackRepository,
};
use crate::feedback::FeedbackService;
use crate::llm_client::GeminiClient;
use crate::resume::repository::{InMemoryResumeRepository, PgResumeRepository, ResumeRepository};
use crate::resume::ResumeService;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Storage: PostgreSQL when configured, otherwise process memory
    let (resume_repo, feedback_repo): (Arc<dyn ResumeRepository>, Arc<dyn FeedbackRepository>) =
        match config.database_url.as_deref() {
            Some(url) => {
                let pool = create_pool(url).await?;
                run_migrations(&pool).await?;
                (
                    Arc::new(PgResumeRepository::new(pool.clone())),
                    Arc::new(PgFeedbackRepository::new(pool)),
                )
            }
            None => {
                warn!("DATABASE_URL is not set; resumes are kept in memory and lost on restart");
                (
                    Arc::new(InMemoryResumeRepository::new()),
                    Arc::new(InMemoryFeedbackRepository::new()),
                )
            }
        };

    // Initialize LLM client
    let llm = GeminiClient::new(
        &config.gemini_base_url,
        &config.gemini_model,
        &config.gemini_api_key,
    )
    .context("Failed to build the Gemini HTTP client")?;
    info!("LLM client initialized (model: {})", llm.model());

    info!(
        "Page layout: {} lines per page, {} chars per line",
        config.page.lines_per_page, config.page.chars_per_line
    );

    let resumes = ResumeService::new(
        resume_repo,
        feedback_repo.clone(),
        config.one_resume_per_user,
    );
    let feedback = FeedbackService::new(feedback_repo, resumes.clone());
    let ai = AiService::new(Arc::new(llm), resumes.clone(), feedback.clone());

    let state = AppState {
        resumes,
        feedback,
        ai,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
