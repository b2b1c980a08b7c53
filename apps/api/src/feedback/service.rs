use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, FieldError};
use crate::feedback::repository::FeedbackRepository;
use crate::models::feedback::{AiFeedback, FeedbackContent};
use crate::resume::service::ResumeService;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeedbackRequest {
    pub resume_id: Uuid,
    #[serde(default)]
    pub improvements: Option<Value>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    pub insights: String,
}

/// Partial update: only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFeedbackRequest {
    #[serde(default)]
    pub improvements: Option<Value>,
    #[serde(default)]
    pub missing_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub insights: Option<String>,
}

#[derive(Clone)]
pub struct FeedbackService {
    feedback: Arc<dyn FeedbackRepository>,
    resumes: ResumeService,
}

impl FeedbackService {
    pub fn new(feedback: Arc<dyn FeedbackRepository>, resumes: ResumeService) -> Self {
        FeedbackService { feedback, resumes }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        req: CreateFeedbackRequest,
    ) -> Result<AiFeedback, AppError> {
        check_content(Some(&req.insights), Some(&req.missing_keywords))?;
        self.resumes.get(user_id, req.resume_id).await?;
        if self.feedback.get_for_resume(req.resume_id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Feedback for resume {} already exists",
                req.resume_id
            )));
        }

        let now = Utc::now();
        let feedback = AiFeedback {
            id: Uuid::new_v4(),
            resume_id: req.resume_id,
            improvements: req.improvements.unwrap_or_else(|| json!({})),
            missing_keywords: clean_keywords(req.missing_keywords),
            insights: req.insights.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.feedback.insert(&feedback).await?;
        Ok(feedback)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<AiFeedback, AppError> {
        let feedback = self
            .feedback
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Feedback {id} not found")))?;
        // Feedback on someone else's resume is reported as missing.
        match self.resumes.get(user_id, feedback.resume_id).await {
            Ok(_) => Ok(feedback),
            Err(AppError::NotFound(_)) => Err(AppError::NotFound(format!("Feedback {id} not found"))),
            Err(e) => Err(e),
        }
    }

    pub async fn get_for_resume(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
    ) -> Result<AiFeedback, AppError> {
        self.resumes.get(user_id, resume_id).await?;
        self.feedback
            .get_for_resume(resume_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No feedback for resume {resume_id}")))
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<AiFeedback>, AppError> {
        let resume_ids: Vec<Uuid> = self
            .resumes
            .list(user_id)
            .await?
            .iter()
            .map(|r| r.id)
            .collect();
        if resume_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.feedback.list_for_resumes(&resume_ids).await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: UpdateFeedbackRequest,
    ) -> Result<AiFeedback, AppError> {
        check_content(req.insights.as_deref(), req.missing_keywords.as_deref())?;
        let mut feedback = self.get(user_id, id).await?;
        if let Some(improvements) = req.improvements {
            feedback.improvements = improvements;
        }
        if let Some(keywords) = req.missing_keywords {
            feedback.missing_keywords = clean_keywords(keywords);
        }
        if let Some(insights) = req.insights {
            feedback.insights = insights.trim().to_string();
        }
        feedback.updated_at = Utc::now();
        self.feedback.update(&feedback).await?;
        Ok(feedback)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.get(user_id, id).await?;
        self.feedback.delete(id).await?;
        Ok(())
    }

    /// Stores freshly generated feedback for a resume, replacing any previous record.
    /// The caller has already checked ownership.
    pub async fn replace_for_resume(
        &self,
        resume_id: Uuid,
        content: FeedbackContent,
    ) -> Result<AiFeedback, AppError> {
        let now = Utc::now();
        let feedback = self
            .feedback
            .upsert_for_resume(&AiFeedback {
                id: Uuid::new_v4(),
                resume_id,
                improvements: content.improvements,
                missing_keywords: clean_keywords(content.missing_keywords),
                insights: content.insights,
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(resume_id = %resume_id, feedback_id = %feedback.id, "Feedback stored");
        Ok(feedback)
    }
}

fn check_content(insights: Option<&str>, keywords: Option<&[String]>) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if insights.is_some_and(|i| i.trim().is_empty()) {
        errors.push(FieldError::new("insights", "must not be blank"));
    }
    for (i, keyword) in keywords.unwrap_or_default().iter().enumerate() {
        if keyword.trim().is_empty() {
            errors.push(FieldError::new(format!("missing_keywords[{i}]"), "must not be blank"));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Trimmed, blank entries dropped, case-insensitive duplicates removed.
fn clean_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.trim();
        if !keyword.is_empty() && !out.iter().any(|k| k.eq_ignore_ascii_case(keyword)) {
            out.push(keyword.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::repository::InMemoryFeedbackRepository;
    use crate::models::resume::Resume;
    use crate::resume::repository::{InMemoryResumeRepository, ResumeRepository};
    use crate::resume::service::CreateResumeRequest;

    /// Resume storage whose every call fails.
    struct BrokenResumes;

    #[async_trait::async_trait]
    impl ResumeRepository for BrokenResumes {
        async fn get(&self, _id: Uuid) -> Result<Option<Resume>, AppError> {
            Err(AppError::Internal(anyhow::anyhow!("connection reset")))
        }
        async fn list_by_user(&self, _user_id: Uuid) -> Result<Vec<Resume>, AppError> {
            Err(AppError::Internal(anyhow::anyhow!("connection reset")))
        }
        async fn insert(&self, _resume: &Resume) -> Result<(), AppError> {
            Err(AppError::Internal(anyhow::anyhow!("connection reset")))
        }
        async fn insert_if_first(&self, _resume: &Resume) -> Result<bool, AppError> {
            Err(AppError::Internal(anyhow::anyhow!("connection reset")))
        }
        async fn update(&self, _resume: &Resume) -> Result<(), AppError> {
            Err(AppError::Internal(anyhow::anyhow!("connection reset")))
        }
        async fn delete(&self, _id: Uuid) -> Result<bool, AppError> {
            Err(AppError::Internal(anyhow::anyhow!("connection reset")))
        }
    }

    fn services() -> (FeedbackService, ResumeService) {
        let feedback: Arc<dyn FeedbackRepository> = Arc::new(InMemoryFeedbackRepository::new());
        let resumes = ResumeService::new(
            Arc::new(InMemoryResumeRepository::new()),
            feedback.clone(),
            true,
        );
        (FeedbackService::new(feedback, resumes.clone()), resumes)
    }

    async fn new_resume(resumes: &ResumeService, user: Uuid) -> Uuid {
        resumes
            .create(
                user,
                CreateResumeRequest {
                    title: "Resume".to_string(),
                    score: None,
                    keywords: vec![],
                    target_job_descriptions: vec![],
                    sections: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn create_req(resume_id: Uuid) -> CreateFeedbackRequest {
        CreateFeedbackRequest {
            resume_id,
            improvements: None,
            missing_keywords: vec!["Go".to_string(), " go ".to_string(), "SQL".to_string()],
            insights: "Good start".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_conflict() {
        let (svc, resumes) = services();
        let user = Uuid::new_v4();
        let resume_id = new_resume(&resumes, user).await;

        let created = svc.create(user, create_req(resume_id)).await.unwrap();
        assert_eq!(created.missing_keywords, vec!["Go", "SQL"]);
        assert_eq!(created.improvements, json!({}));

        let again = svc.create(user, create_req(resume_id)).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_for_foreign_resume_is_not_found() {
        let (svc, resumes) = services();
        let resume_id = new_resume(&resumes, Uuid::new_v4()).await;
        let err = svc.create(Uuid::new_v4(), create_req(resume_id)).await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let (svc, resumes) = services();
        let user = Uuid::new_v4();
        let resume_id = new_resume(&resumes, user).await;
        let created = svc.create(user, create_req(resume_id)).await.unwrap();

        let updated = svc
            .update(
                user,
                created.id,
                UpdateFeedbackRequest {
                    insights: Some("Much better".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.insights, "Much better");
        assert_eq!(updated.missing_keywords, created.missing_keywords);

        let blank = svc
            .update(
                user,
                created.id,
                UpdateFeedbackRequest {
                    insights: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(blank, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_get_delete_scoped_to_user() {
        let (svc, resumes) = services();
        let user = Uuid::new_v4();
        let resume_id = new_resume(&resumes, user).await;
        let created = svc.create(user, create_req(resume_id)).await.unwrap();

        assert_eq!(svc.list(user).await.unwrap().len(), 1);
        assert!(svc.list(Uuid::new_v4()).await.unwrap().is_empty());
        assert!(matches!(
            svc.get(Uuid::new_v4(), created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(svc.get_for_resume(user, resume_id).await.unwrap().id, created.id);

        svc.delete(user, created.id).await.unwrap();
        assert!(matches!(
            svc.get_for_resume(user, resume_id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_replace_for_resume_keeps_identity() {
        let (svc, resumes) = services();
        let user = Uuid::new_v4();
        let resume_id = new_resume(&resumes, user).await;

        let first = svc
            .replace_for_resume(
                resume_id,
                FeedbackContent {
                    improvements: json!({"summary": ["Shorter"]}),
                    missing_keywords: vec!["Rust".to_string()],
                    insights: "v1".to_string(),
                },
            )
            .await
            .unwrap();
        let second = svc
            .replace_for_resume(
                resume_id,
                FeedbackContent {
                    improvements: json!({}),
                    missing_keywords: vec![],
                    insights: "v2".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(svc.get(user, first.id).await.unwrap().insights, "v2");
    }

    #[tokio::test]
    async fn test_get_propagates_storage_errors() {
        let repo = Arc::new(InMemoryFeedbackRepository::new());
        let stored = AiFeedback {
            id: Uuid::new_v4(),
            resume_id: Uuid::new_v4(),
            improvements: json!({}),
            missing_keywords: vec![],
            insights: "Fine".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repo.insert(&stored).await.unwrap();
        let resumes = ResumeService::new(Arc::new(BrokenResumes), repo.clone(), true);
        let svc = FeedbackService::new(repo, resumes);

        let err = svc.get(Uuid::new_v4(), stored.id).await;
        assert!(matches!(err, Err(AppError::Internal(_))));
    }
}
