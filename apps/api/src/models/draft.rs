//! `ResumeDraft`: the flat resume shape exchanged with the AI endpoints.
//!
//! Sections are grouped by kind rather than ordered, which is the shape the model
//! is prompted to produce and the shape clients send back as "current content".

use serde::{Deserialize, Serialize};

use crate::models::lenient;
use crate::models::resume::{Resume, Section, SectionContent};
use crate::models::sections::{
    AwardItem, CertificationItem, EducationItem, ExperienceItem, LanguageItem, PersonalInfo,
    ProjectItem, PublicationItem, ReferenceItem, SkillItem,
};

pub const DEFAULT_DRAFT_TITLE: &str = "Generated Resume";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDraft {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    pub score: Option<f32>,
    pub keywords: Vec<String>,
    #[serde(alias = "targetJobDescriptions")]
    pub target_job_descriptions: Vec<String>,
    #[serde(alias = "personalInfo", alias = "personal_info")]
    pub personal: Option<PersonalInfo>,
    #[serde(deserialize_with = "summary_text")]
    pub summary: Option<String>,
    #[serde(alias = "experience")]
    pub experiences: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub skills: Vec<SkillItem>,
    pub projects: Vec<ProjectItem>,
    pub certifications: Vec<CertificationItem>,
    pub languages: Vec<LanguageItem>,
    pub awards: Vec<AwardItem>,
    pub publications: Vec<PublicationItem>,
    pub references: Vec<ReferenceItem>,
}

/// The summary arrives either as a bare string or as `{ "content": "..." }`.
fn summary_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde_json::Value;
    let text = match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Object(map) => map
            .get("content")
            .or_else(|| map.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };
    Ok(text.filter(|s| !s.trim().is_empty()))
}

impl ResumeDraft {
    /// True when the draft carries no section content at all.
    pub fn is_empty(&self) -> bool {
        self.to_contents().is_empty()
    }

    /// Non-empty section bodies in canonical order.
    pub fn to_contents(&self) -> Vec<SectionContent> {
        let mut out = Vec::new();
        if let Some(p) = self.personal.as_ref().filter(|p| !p.is_blank()) {
            out.push(SectionContent::Personal(p.clone()));
        }
        if let Some(s) = self.summary.as_ref().filter(|s| !s.trim().is_empty()) {
            out.push(SectionContent::Summary(s.clone()));
        }
        macro_rules! push_list {
            ($field:ident, $variant:ident) => {
                if !self.$field.is_empty() {
                    out.push(SectionContent::$variant(self.$field.clone()));
                }
            };
        }
        push_list!(experiences, Experience);
        push_list!(education, Education);
        push_list!(skills, Skills);
        push_list!(projects, Projects);
        push_list!(certifications, Certifications);
        push_list!(languages, Languages);
        push_list!(awards, Awards);
        push_list!(publications, Publications);
        push_list!(references, References);
        out
    }

    /// Writes a section body into the matching draft slot. List sections append so
    /// that two sections of the same kind are both kept.
    pub fn absorb(&mut self, content: &SectionContent) {
        match content {
            SectionContent::Personal(p) => self.personal = Some(p.clone()),
            SectionContent::Summary(s) => self.summary = Some(s.clone()),
            SectionContent::Experience(v) => self.experiences.extend(v.iter().cloned()),
            SectionContent::Education(v) => self.education.extend(v.iter().cloned()),
            SectionContent::Skills(v) => self.skills.extend(v.iter().cloned()),
            SectionContent::Projects(v) => self.projects.extend(v.iter().cloned()),
            SectionContent::Certifications(v) => self.certifications.extend(v.iter().cloned()),
            SectionContent::Languages(v) => self.languages.extend(v.iter().cloned()),
            SectionContent::Awards(v) => self.awards.extend(v.iter().cloned()),
            SectionContent::References(v) => self.references.extend(v.iter().cloned()),
            SectionContent::Publications(v) => self.publications.extend(v.iter().cloned()),
        }
    }

    pub fn from_sections(title: &str, sections: &[Section]) -> Self {
        let mut draft = ResumeDraft {
            title: title.to_string(),
            ..Default::default()
        };
        for section in sections {
            draft.absorb(&section.content);
        }
        draft
    }
}

impl From<&Resume> for ResumeDraft {
    fn from(resume: &Resume) -> Self {
        let mut draft = ResumeDraft::from_sections(&resume.title, &resume.sections);
        draft.score = resume.score;
        draft.keywords = resume.keywords.clone();
        draft.target_job_descriptions = resume.target_job_descriptions.clone();
        draft
    }
}
