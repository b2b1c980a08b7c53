//! Resume persistence: pluggable, trait-based storage.
//!
//! `PgResumeRepository` stores one row per resume with the section list as a JSONB
//! document. `InMemoryResumeRepository` keeps everything in a map and backs the
//! service when no database is configured, and in tests.
//!
//! Carried in `AppState` as `Arc<dyn ResumeRepository>`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{Resume, Section};

#[async_trait]
pub trait ResumeRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Resume>, AppError>;

    /// The user's resumes, most recently updated first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError>;

    async fn insert(&self, resume: &Resume) -> Result<(), AppError>;

    /// Inserts the resume only when its owner has none yet. The check and the
    /// insert are atomic; returns `false` and stores nothing otherwise.
    async fn insert_if_first(&self, resume: &Resume) -> Result<bool, AppError>;

    /// Overwrites the stored row. Fails with `NotFound` when it does not exist.
    async fn update(&self, resume: &Resume) -> Result<(), AppError>;

    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
struct ResumeRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    score: Option<f32>,
    keywords: Vec<String>,
    target_job_descriptions: Vec<String>,
    sections: Json<Vec<Section>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        Resume {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            score: row.score,
            keywords: row.keywords,
            target_job_descriptions: row.target_job_descriptions,
            sections: row.sections.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_RESUME: &str = "SELECT id, user_id, title, score, keywords, target_job_descriptions, \
                             sections, created_at, updated_at FROM resumes";

pub struct PgResumeRepository {
    pool: PgPool,
}

impl PgResumeRepository {
    pub fn new(pool: PgPool) -> Self {
        PgResumeRepository { pool }
    }
}

#[async_trait]
impl ResumeRepository for PgResumeRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        let row: Option<ResumeRow> = sqlx::query_as(&format!("{SELECT_RESUME} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Resume::from))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let rows: Vec<ResumeRow> = sqlx::query_as(&format!(
            "{SELECT_RESUME} WHERE user_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    async fn insert(&self, resume: &Resume) -> Result<(), AppError> {
        insert_row(&self.pool, resume).await?;
        Ok(())
    }

    async fn insert_if_first(&self, resume: &Resume) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent creates for the same user until commit
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text))")
            .bind(resume.user_id)
            .execute(&mut *tx)
            .await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE user_id = $1")
            .bind(resume.user_id)
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(false);
        }

        insert_row(&mut *tx, resume).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn update(&self, resume: &Resume) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE resumes
            SET title = $2, score = $3, keywords = $4, target_job_descriptions = $5,
                sections = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(resume.id)
        .bind(&resume.title)
        .bind(resume.score)
        .bind(&resume.keywords)
        .bind(&resume.target_job_descriptions)
        .bind(Json(&resume.sections))
        .bind(resume.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Resume {} not found", resume.id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

async fn insert_row<'e, E>(executor: E, resume: &Resume) -> Result<(), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO resumes
            (id, user_id, title, score, keywords, target_job_descriptions,
             sections, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(resume.id)
    .bind(resume.user_id)
    .bind(&resume.title)
    .bind(resume.score)
    .bind(&resume.keywords)
    .bind(&resume.target_job_descriptions)
    .bind(Json(&resume.sections))
    .bind(resume.created_at)
    .bind(resume.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryResumeRepository {
    resumes: RwLock<HashMap<Uuid, Resume>>,
}

impl InMemoryResumeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeRepository for InMemoryResumeRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self.resumes.read().await.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let mut list: Vec<Resume> = self
            .resumes
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(list)
    }

    async fn insert(&self, resume: &Resume) -> Result<(), AppError> {
        let mut resumes = self.resumes.write().await;
        if resumes.contains_key(&resume.id) {
            return Err(AppError::Conflict(format!("Resume {} already exists", resume.id)));
        }
        resumes.insert(resume.id, resume.clone());
        Ok(())
    }

    async fn insert_if_first(&self, resume: &Resume) -> Result<bool, AppError> {
        let mut resumes = self.resumes.write().await;
        if resumes.values().any(|r| r.user_id == resume.user_id) {
            return Ok(false);
        }
        resumes.insert(resume.id, resume.clone());
        Ok(true)
    }

    async fn update(&self, resume: &Resume) -> Result<(), AppError> {
        match self.resumes.write().await.get_mut(&resume.id) {
            Some(stored) => {
                *stored = resume.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Resume {} not found", resume.id))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.resumes.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::sections::default_sections;

    fn resume(user_id: Uuid, title: &str) -> Resume {
        Resume {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            score: None,
            keywords: vec![],
            target_job_descriptions: vec![],
            sections: default_sections(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_memory_crud_roundtrip() {
        let repo = InMemoryResumeRepository::new();
        let user = Uuid::new_v4();
        let mut r = resume(user, "First");
        repo.insert(&r).await.unwrap();
        assert_eq!(repo.get(r.id).await.unwrap().unwrap().title, "First");

        r.title = "Renamed".to_string();
        repo.update(&r).await.unwrap();
        assert_eq!(repo.get(r.id).await.unwrap().unwrap().title, "Renamed");

        assert!(repo.delete(r.id).await.unwrap());
        assert!(!repo.delete(r.id).await.unwrap());
        assert!(repo.get(r.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_update_missing_is_not_found() {
        let repo = InMemoryResumeRepository::new();
        let r = resume(Uuid::new_v4(), "Ghost");
        assert!(matches!(repo.update(&r).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_memory_list_scoped_to_user_newest_first() {
        let repo = InMemoryResumeRepository::new();
        let user = Uuid::new_v4();
        let mut older = resume(user, "Older");
        older.updated_at = Utc::now() - chrono::Duration::hours(1);
        let newer = resume(user, "Newer");
        repo.insert(&older).await.unwrap();
        repo.insert(&newer).await.unwrap();
        repo.insert(&resume(Uuid::new_v4(), "Someone else")).await.unwrap();

        let titles: Vec<String> = repo
            .list_by_user(user)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_memory_insert_if_first_only_once_per_user() {
        let repo = InMemoryResumeRepository::new();
        let user = Uuid::new_v4();
        assert!(repo.insert_if_first(&resume(user, "First")).await.unwrap());
        assert!(!repo.insert_if_first(&resume(user, "Second")).await.unwrap());
        assert!(repo.insert_if_first(&resume(Uuid::new_v4(), "Other")).await.unwrap());

        let titles: Vec<String> = repo
            .list_by_user(user)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["First"]);
    }
}
