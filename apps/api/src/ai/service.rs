use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};
use uuid::Uuid;

use crate::ai::feedback::parse_feedback;
use crate::ai::prompts;
use crate::ai::reshape::parse_draft;
use crate::ai::score::parse_score;
use crate::errors::{AppError, FieldError};
use crate::feedback::service::FeedbackService;
use crate::llm_client::TextGenerator;
use crate::models::draft::ResumeDraft;
use crate::models::feedback::AiFeedback;
use crate::models::resume::Resume;
use crate::resume::service::ResumeService;

/// Model-backed resume operations.
#[derive(Clone)]
pub struct AiService {
    llm: Arc<dyn TextGenerator>,
    resumes: ResumeService,
    feedback: FeedbackService,
}

impl AiService {
    pub fn new(llm: Arc<dyn TextGenerator>, resumes: ResumeService, feedback: FeedbackService) -> Self {
        AiService {
            llm,
            resumes,
            feedback,
        }
    }

    /// Writes a complete resume draft from a free-text description.
    pub async fn generate_resume(&self, prompt: &str) -> Result<ResumeDraft, AppError> {
        require_text("prompt", prompt)?;
        let reply = self
            .ask("generate_resume", &prompts::build_resume_instruction(), prompt.trim())
            .await?;
        Ok(parse_draft(&reply, None)?)
    }

    /// Tailors `content` to a set of job descriptions.
    pub async fn generate_from_jobs(
        &self,
        content: &ResumeDraft,
        job_descriptions: &[String],
        use_current_info: bool,
    ) -> Result<ResumeDraft, AppError> {
        let descriptions: Vec<String> = job_descriptions
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        if descriptions.is_empty() {
            return Err(AppError::Validation(vec![FieldError::new(
                "job_descriptions",
                "at least one job description is required",
            )]));
        }

        let prompt = prompts::from_jobs_prompt(&to_json(content)?, &descriptions, use_current_info);
        let reply = self
            .ask("generate_from_jobs", &prompts::build_from_jobs_instruction(), &prompt)
            .await?;
        let mut draft = parse_draft(&reply, Some(&content.title))?;
        if draft.target_job_descriptions.is_empty() {
            draft.target_job_descriptions = descriptions;
        }
        Ok(draft)
    }

    /// Writes one section of `content`. The reply carries only that section;
    /// the title falls back to the one in `content`.
    pub async fn generate_section(
        &self,
        section_title: &str,
        content: &ResumeDraft,
    ) -> Result<ResumeDraft, AppError> {
        require_text("section_title", section_title)?;
        let prompt = prompts::section_prompt(section_title.trim(), &to_json(content)?);
        let reply = self
            .ask("generate_section", &prompts::build_section_instruction(), &prompt)
            .await?;
        Ok(parse_draft(&reply, Some(&content.title))?)
    }

    /// Scores a draft from 0 to 100.
    pub async fn calculate_score(&self, content: &ResumeDraft) -> Result<u8, AppError> {
        let prompt = prompts::review_prompt(&to_json(content)?);
        let reply = self
            .ask("calculate_score", &prompts::score_instruction(), &prompt)
            .await?;
        Ok(parse_score(&reply))
    }

    /// Reviews a stored resume and stores the result as its feedback,
    /// replacing any earlier review.
    pub async fn generate_feedback(
        &self,
        user_id: Uuid,
        resume_id: Uuid,
    ) -> Result<AiFeedback, AppError> {
        let resume = self.resumes.get(user_id, resume_id).await?;
        let prompt = prompts::review_prompt(&to_json(&ResumeDraft::from(&resume))?);
        let reply = self
            .ask("generate_feedback", &prompts::feedback_instruction(), &prompt)
            .await?;
        let content = parse_feedback(&reply)?;
        self.feedback.replace_for_resume(resume.id, content).await
    }

    /// Scores a stored resume and saves the score on it.
    pub async fn score_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<Resume, AppError> {
        let resume = self.resumes.get(user_id, resume_id).await?;
        let score = self.calculate_score(&ResumeDraft::from(&resume)).await?;
        info!(resume_id = %resume_id, score, "Resume scored");
        self.resumes
            .set_score(user_id, resume_id, f32::from(score))
            .await
    }

    async fn ask(&self, operation: &str, instruction: &str, prompt: &str) -> Result<String, AppError> {
        let reply = self.llm.generate(instruction, prompt).await?;
        debug!(operation, reply = %reply, "Model reply");
        Ok(reply)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(vec![FieldError::new(
            field,
            "must not be empty",
        )]));
    }
    Ok(())
}

fn to_json(draft: &ResumeDraft) -> Result<String, AppError> {
    Ok(serde_json::to_string(draft).context("Failed to serialize resume content")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::feedback::repository::{FeedbackRepository, InMemoryFeedbackRepository};
    use crate::llm_client::LlmError;
    use crate::resume::repository::InMemoryResumeRepository;
    use crate::resume::service::CreateResumeRequest;

    /// Replies with a fixed text and records the prompts it was given.
    struct StubGenerator {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(StubGenerator {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(StubGenerator {
                reply: Err(()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _system_instruction: &str, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().await.push(prompt.to_string());
            self.reply.clone().map_err(|_| LlmError::EmptyContent)
        }
    }

    fn service(llm: Arc<StubGenerator>) -> (AiService, ResumeService) {
        let feedback_repo: Arc<dyn FeedbackRepository> = Arc::new(InMemoryFeedbackRepository::new());
        let resumes = ResumeService::new(
            Arc::new(InMemoryResumeRepository::new()),
            feedback_repo.clone(),
            true,
        );
        let feedback = FeedbackService::new(feedback_repo, resumes.clone());
        (AiService::new(llm, resumes.clone(), feedback), resumes)
    }

    async fn stored_resume(resumes: &ResumeService, user: Uuid) -> Resume {
        resumes
            .create(
                user,
                CreateResumeRequest {
                    title: "Backend Resume".to_string(),
                    score: None,
                    keywords: vec![],
                    target_job_descriptions: vec![],
                    sections: None,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_generate_resume_parses_reply() {
        let llm = StubGenerator::replying(r#"{"title": "Chef", "summary": "Cooks well"}"#);
        let (ai, _) = service(llm.clone());
        let draft = ai.generate_resume("  a chef with 10 years  ").await.unwrap();
        assert_eq!(draft.title, "Chef");
        assert_eq!(llm.prompts.lock().await[0], "a chef with 10 years");
    }

    #[tokio::test]
    async fn test_generate_resume_rejects_blank_prompt() {
        let (ai, _) = service(StubGenerator::replying("{}"));
        assert!(matches!(ai.generate_resume("  ").await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unparseable_draft_is_bad_request() {
        let (ai, _) = service(StubGenerator::replying("Sorry, I can't."));
        assert!(matches!(ai.generate_resume("x").await, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_provider_failure_is_llm_error() {
        let (ai, _) = service(StubGenerator::failing());
        assert!(matches!(ai.generate_resume("x").await, Err(AppError::Llm(_))));
    }

    #[tokio::test]
    async fn test_generate_from_jobs_requires_descriptions() {
        let (ai, _) = service(StubGenerator::replying("{}"));
        let err = ai
            .generate_from_jobs(&ResumeDraft::default(), &[" ".to_string()], true)
            .await;
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_generate_from_jobs_keeps_descriptions() {
        let llm = StubGenerator::replying(r#"[{"type": "summary", "content": "Tailored"}]"#);
        let (ai, _) = service(llm.clone());
        let current = ResumeDraft {
            title: "Mine".to_string(),
            ..Default::default()
        };
        let draft = ai
            .generate_from_jobs(&current, &["Rust backend role".to_string()], false)
            .await
            .unwrap();
        assert_eq!(draft.summary.as_deref(), Some("Tailored"));
        assert_eq!(draft.target_job_descriptions, vec!["Rust backend role"]);
        assert!(llm.prompts.lock().await[0].contains("Use current resume info: false"));
    }

    #[tokio::test]
    async fn test_generate_section_uses_current_title() {
        let llm = StubGenerator::replying(r#"{"skills": [{"name": "Rust", "category": "Languages"}]}"#);
        let (ai, _) = service(llm);
        let current = ResumeDraft {
            title: "Mine".to_string(),
            ..Default::default()
        };
        let draft = ai.generate_section("Skills", &current).await.unwrap();
        assert_eq!(draft.title, "Mine");
        assert_eq!(draft.skills[0].name, "Rust");

        assert!(matches!(
            ai.generate_section("", &current).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_calculate_score() {
        let (ai, _) = service(StubGenerator::replying("Score: 120"));
        assert_eq!(ai.calculate_score(&ResumeDraft::default()).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_score_resume_saves_score() {
        let (ai, resumes) = service(StubGenerator::replying("73"));
        let user = Uuid::new_v4();
        let resume = stored_resume(&resumes, user).await;

        let scored = ai.score_resume(user, resume.id).await.unwrap();
        assert_eq!(scored.score, Some(73.0));
        assert_eq!(resumes.get(user, resume.id).await.unwrap().score, Some(73.0));
    }

    #[tokio::test]
    async fn test_generate_feedback_replaces_previous() {
        let llm = StubGenerator::replying(
            r#"{"improvements": {"summary": ["Add numbers"]}, "missing_keywords": "Docker, AWS", "insights": "Good"}"#,
        );
        let (ai, resumes) = service(llm.clone());
        let user = Uuid::new_v4();
        let resume = stored_resume(&resumes, user).await;

        let first = ai.generate_feedback(user, resume.id).await.unwrap();
        let second = ai.generate_feedback(user, resume.id).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.missing_keywords, vec!["Docker", "AWS"]);
        assert!(llm.prompts.lock().await[0].contains("Backend Resume"));
    }

    #[tokio::test]
    async fn test_generate_feedback_on_foreign_resume_is_not_found() {
        let (ai, resumes) = service(StubGenerator::replying("{}"));
        let resume = stored_resume(&resumes, Uuid::new_v4()).await;
        assert!(matches!(
            ai.generate_feedback(Uuid::new_v4(), resume.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
