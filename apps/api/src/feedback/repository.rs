//! AI feedback persistence. One record per resume.
//!
//! Carried in `AppState` as `Arc<dyn FeedbackRepository>`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::feedback::AiFeedback;

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<AiFeedback>, AppError>;

    async fn get_for_resume(&self, resume_id: Uuid) -> Result<Option<AiFeedback>, AppError>;

    /// Feedback belonging to any of the given resumes, newest first.
    async fn list_for_resumes(&self, resume_ids: &[Uuid]) -> Result<Vec<AiFeedback>, AppError>;

    /// Fails with `Conflict` when the resume already has feedback.
    async fn insert(&self, feedback: &AiFeedback) -> Result<(), AppError>;

    /// Stores `feedback` as the resume's only record in one step. An existing record
    /// keeps its id and `created_at` and takes the new content.
    async fn upsert_for_resume(&self, feedback: &AiFeedback) -> Result<AiFeedback, AppError>;

    async fn update(&self, feedback: &AiFeedback) -> Result<(), AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn delete_for_resume(&self, resume_id: Uuid) -> Result<bool, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
struct FeedbackRow {
    id: Uuid,
    resume_id: Uuid,
    improvements: Json<Value>,
    missing_keywords: Vec<String>,
    insights: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FeedbackRow> for AiFeedback {
    fn from(row: FeedbackRow) -> Self {
        AiFeedback {
            id: row.id,
            resume_id: row.resume_id,
            improvements: row.improvements.0,
            missing_keywords: row.missing_keywords,
            insights: row.insights,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_FEEDBACK: &str = "SELECT id, resume_id, improvements, missing_keywords, insights, \
                               created_at, updated_at FROM ai_feedbacks";

pub struct PgFeedbackRepository {
    pool: PgPool,
}

impl PgFeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        PgFeedbackRepository { pool }
    }
}

#[async_trait]
impl FeedbackRepository for PgFeedbackRepository {
    async fn get(&self, id: Uuid) -> Result<Option<AiFeedback>, AppError> {
        let row: Option<FeedbackRow> = sqlx::query_as(&format!("{SELECT_FEEDBACK} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(AiFeedback::from))
    }

    async fn get_for_resume(&self, resume_id: Uuid) -> Result<Option<AiFeedback>, AppError> {
        let row: Option<FeedbackRow> =
            sqlx::query_as(&format!("{SELECT_FEEDBACK} WHERE resume_id = $1"))
                .bind(resume_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(AiFeedback::from))
    }

    async fn list_for_resumes(&self, resume_ids: &[Uuid]) -> Result<Vec<AiFeedback>, AppError> {
        let rows: Vec<FeedbackRow> = sqlx::query_as(&format!(
            "{SELECT_FEEDBACK} WHERE resume_id = ANY($1) ORDER BY updated_at DESC"
        ))
        .bind(resume_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(AiFeedback::from).collect())
    }

    async fn insert(&self, feedback: &AiFeedback) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO ai_feedbacks
                (id, resume_id, improvements, missing_keywords, insights, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(feedback.id)
        .bind(feedback.resume_id)
        .bind(Json(&feedback.improvements))
        .bind(&feedback.missing_keywords)
        .bind(&feedback.insights)
        .bind(feedback.created_at)
        .bind(feedback.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::conflict_on_unique(e, || {
                format!("Feedback for resume {} already exists", feedback.resume_id)
            })
        })?;
        Ok(())
    }

    async fn upsert_for_resume(&self, feedback: &AiFeedback) -> Result<AiFeedback, AppError> {
        let row: FeedbackRow = sqlx::query_as(
            r#"
            INSERT INTO ai_feedbacks
                (id, resume_id, improvements, missing_keywords, insights, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (resume_id) DO UPDATE
            SET improvements = EXCLUDED.improvements,
                missing_keywords = EXCLUDED.missing_keywords,
                insights = EXCLUDED.insights,
                updated_at = EXCLUDED.updated_at
            RETURNING id, resume_id, improvements, missing_keywords, insights,
                      created_at, updated_at
            "#,
        )
        .bind(feedback.id)
        .bind(feedback.resume_id)
        .bind(Json(&feedback.improvements))
        .bind(&feedback.missing_keywords)
        .bind(&feedback.insights)
        .bind(feedback.created_at)
        .bind(feedback.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update(&self, feedback: &AiFeedback) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE ai_feedbacks
            SET improvements = $2, missing_keywords = $3, insights = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(feedback.id)
        .bind(Json(&feedback.improvements))
        .bind(&feedback.missing_keywords)
        .bind(&feedback.insights)
        .bind(feedback.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Feedback {} not found", feedback.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM ai_feedbacks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_resume(&self, resume_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM ai_feedbacks WHERE resume_id = $1")
            .bind(resume_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryFeedbackRepository {
    feedback: RwLock<HashMap<Uuid, AiFeedback>>,
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn get(&self, id: Uuid) -> Result<Option<AiFeedback>, AppError> {
        Ok(self.feedback.read().await.get(&id).cloned())
    }

    async fn get_for_resume(&self, resume_id: Uuid) -> Result<Option<AiFeedback>, AppError> {
        Ok(self
            .feedback
            .read()
            .await
            .values()
            .find(|f| f.resume_id == resume_id)
            .cloned())
    }

    async fn list_for_resumes(&self, resume_ids: &[Uuid]) -> Result<Vec<AiFeedback>, AppError> {
        let mut list: Vec<AiFeedback> = self
            .feedback
            .read()
            .await
            .values()
            .filter(|f| resume_ids.contains(&f.resume_id))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(list)
    }

    async fn insert(&self, feedback: &AiFeedback) -> Result<(), AppError> {
        let mut map = self.feedback.write().await;
        if map.values().any(|f| f.resume_id == feedback.resume_id) {
            return Err(AppError::Conflict(format!(
                "Feedback for resume {} already exists",
                feedback.resume_id
            )));
        }
        map.insert(feedback.id, feedback.clone());
        Ok(())
    }

    async fn upsert_for_resume(&self, feedback: &AiFeedback) -> Result<AiFeedback, AppError> {
        let mut map = self.feedback.write().await;
        if let Some(stored) = map.values_mut().find(|f| f.resume_id == feedback.resume_id) {
            stored.improvements = feedback.improvements.clone();
            stored.missing_keywords = feedback.missing_keywords.clone();
            stored.insights = feedback.insights.clone();
            stored.updated_at = feedback.updated_at;
            return Ok(stored.clone());
        }
        map.insert(feedback.id, feedback.clone());
        Ok(feedback.clone())
    }

    async fn update(&self, feedback: &AiFeedback) -> Result<(), AppError> {
        match self.feedback.write().await.get_mut(&feedback.id) {
            Some(stored) => {
                *stored = feedback.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Feedback {} not found", feedback.id))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.feedback.write().await.remove(&id).is_some())
    }

    async fn delete_for_resume(&self, resume_id: Uuid) -> Result<bool, AppError> {
        let mut map = self.feedback.write().await;
        let before = map.len();
        map.retain(|_, f| f.resume_id != resume_id);
        Ok(map.len() != before)
    }
}
