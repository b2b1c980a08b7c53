use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::repository::FeedbackRepository;
use crate::models::draft::ResumeDraft;
use crate::models::resume::{Resume, Section, SectionContent, SectionKind};
use crate::resume::repository::ResumeRepository;
use crate::resume::sections::{self, default_sections, normalize_order};
use crate::resume::validation::{validate_resume, validate_section};

/// A section as sent by a client. A missing or unknown id creates a new section.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub header: Option<String>,
    pub content: SectionContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateResumeRequest {
    pub title: String,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub target_job_descriptions: Vec<String>,
    /// Omitted or empty: the resume starts with the default sections.
    #[serde(default)]
    pub sections: Option<Vec<SectionInput>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateResumeRequest {
    pub title: String,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub target_job_descriptions: Vec<String>,
    /// Omitted: sections are left as they are.
    #[serde(default)]
    pub sections: Option<Vec<SectionInput>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSectionRequest {
    pub kind: SectionKind,
    #[serde(default)]
    pub header: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSectionRequest {
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub content: Option<SectionContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderRequest {
    pub old_index: usize,
    pub new_index: usize,
}

/// Resume CRUD scoped to the calling user.
#[derive(Clone)]
pub struct ResumeService {
    resumes: Arc<dyn ResumeRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    one_resume_per_user: bool,
}

impl ResumeService {
    pub fn new(
        resumes: Arc<dyn ResumeRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        one_resume_per_user: bool,
    ) -> Self {
        ResumeService {
            resumes,
            feedback,
            one_resume_per_user,
        }
    }

    pub async fn create(&self, user_id: Uuid, req: CreateResumeRequest) -> Result<Resume, AppError> {
        let sections = match req.sections {
            Some(inputs) if !inputs.is_empty() => build_sections(inputs, &[]),
            _ => default_sections(),
        };
        let errors = validate_resume(&req.title, req.score, &req.keywords, &sections);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let now = Utc::now();
        let resume = Resume {
            id: Uuid::new_v4(),
            user_id,
            title: req.title.trim().to_string(),
            score: req.score,
            keywords: trim_all(req.keywords),
            target_job_descriptions: req.target_job_descriptions,
            sections,
            created_at: now,
            updated_at: now,
        };
        if self.one_resume_per_user {
            if !self.resumes.insert_if_first(&resume).await? {
                return Err(AppError::Conflict("User already has a resume".to_string()));
            }
        } else {
            self.resumes.insert(&resume).await?;
        }

        info!(resume_id = %resume.id, user_id = %user_id, "Resume created");
        Ok(resume)
    }

    /// Loads a resume owned by `user_id`. Foreign resumes are reported as missing.
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Resume, AppError> {
        match self.resumes.get(id).await? {
            Some(resume) if resume.user_id == user_id => Ok(resume),
            _ => Err(AppError::NotFound(format!("Resume {id} not found"))),
        }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        self.resumes.list_by_user(user_id).await
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: UpdateResumeRequest,
    ) -> Result<Resume, AppError> {
        let mut resume = self.get(user_id, id).await?;
        let sections = match req.sections {
            Some(inputs) => build_sections(inputs, &resume.sections),
            None => resume.sections.clone(),
        };
        let errors = validate_resume(&req.title, req.score, &req.keywords, &sections);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        resume.title = req.title.trim().to_string();
        resume.score = req.score;
        resume.keywords = trim_all(req.keywords);
        resume.target_job_descriptions = req.target_job_descriptions;
        resume.sections = sections;
        self.save(resume).await
    }

    /// Deletes the resume and its feedback.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.get(user_id, id).await?;
        self.feedback.delete_for_resume(id).await?;
        self.resumes.delete(id).await?;
        info!(resume_id = %id, "Resume deleted");
        Ok(())
    }

    /// Stores a new score computed for the resume.
    pub async fn set_score(&self, user_id: Uuid, id: Uuid, score: f32) -> Result<Resume, AppError> {
        let mut resume = self.get(user_id, id).await?;
        resume.score = Some(score.clamp(0.0, 100.0));
        self.save(resume).await
    }

    // ── section operations ──────────────────────────────────────────────────

    pub async fn add_section(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: AddSectionRequest,
    ) -> Result<Resume, AppError> {
        let mut resume = self.get(user_id, id).await?;
        sections::add_section(&mut resume.sections, req.kind, req.header.as_deref());
        self.save(resume).await
    }

    pub async fn update_section(
        &self,
        user_id: Uuid,
        id: Uuid,
        section_id: Uuid,
        req: UpdateSectionRequest,
    ) -> Result<Resume, AppError> {
        let mut resume = self.get(user_id, id).await?;
        if let Some(header) = req.header.as_deref() {
            sections::update_section_header(&mut resume.sections, section_id, header)?;
        }
        if let Some(content) = req.content {
            sections::update_section_content(&mut resume.sections, section_id, content)?;
        }

        let (index, section) = resume
            .sections
            .iter()
            .enumerate()
            .find(|(_, s)| s.id == section_id)
            .ok_or_else(|| AppError::NotFound(format!("Section {section_id} not found")))?;
        let errors = validate_section(section, &format!("sections[{index}]"));
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        self.save(resume).await
    }

    pub async fn delete_section(
        &self,
        user_id: Uuid,
        id: Uuid,
        section_id: Uuid,
    ) -> Result<Resume, AppError> {
        let mut resume = self.get(user_id, id).await?;
        sections::remove_section(&mut resume.sections, section_id)?;
        self.save(resume).await
    }

    pub async fn reorder_sections(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: ReorderRequest,
    ) -> Result<Resume, AppError> {
        let mut resume = self.get(user_id, id).await?;
        sections::reorder_sections(&mut resume.sections, req.old_index, req.new_index)?;
        self.save(resume).await
    }

    /// Merges AI-generated content into the stored sections.
    pub async fn apply_draft(
        &self,
        user_id: Uuid,
        id: Uuid,
        draft: &ResumeDraft,
    ) -> Result<Resume, AppError> {
        if draft.is_empty() {
            return Err(AppError::BadRequest("Draft has no section content".to_string()));
        }
        let mut resume = self.get(user_id, id).await?;
        let written = sections::apply_draft(&mut resume.sections, draft);
        info!(resume_id = %id, sections = written, "Applied AI draft");
        self.save(resume).await
    }

    async fn save(&self, mut resume: Resume) -> Result<Resume, AppError> {
        normalize_order(&mut resume.sections);
        resume.updated_at = Utc::now();
        self.resumes.update(&resume).await?;
        Ok(resume)
    }
}

/// Turns client input into sections. Ids of sections already in `existing` are kept.
fn build_sections(inputs: Vec<SectionInput>, existing: &[Section]) -> Vec<Section> {
    let mut sections: Vec<Section> = inputs
        .into_iter()
        .map(|input| {
            let header = input
                .header
                .map(|h| h.trim().to_string())
                .unwrap_or_else(|| input.content.kind().default_header().to_string());
            let mut section = Section::new(header, input.content);
            if let Some(id) = input.id.filter(|id| existing.iter().any(|s| s.id == *id)) {
                section.id = id;
            }
            section
        })
        .collect();
    normalize_order(&mut sections);
    sections
}

fn trim_all(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|v| v.trim().to_string()).collect()
}
