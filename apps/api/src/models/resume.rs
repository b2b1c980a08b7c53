use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::sections::{
    AwardItem, CertificationItem, EducationItem, ExperienceItem, LanguageItem, PersonalInfo,
    ProjectItem, PublicationItem, ReferenceItem, SkillItem,
};

/// The eleven section types a resume can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Personal,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    Awards,
    References,
    Publications,
}

impl SectionKind {
    /// Canonical order used for new resumes.
    pub const ALL: [SectionKind; 11] = [
        SectionKind::Personal,
        SectionKind::Summary,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Certifications,
        SectionKind::Languages,
        SectionKind::Awards,
        SectionKind::References,
        SectionKind::Publications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Personal => "personal",
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
            SectionKind::Languages => "languages",
            SectionKind::Awards => "awards",
            SectionKind::References => "references",
            SectionKind::Publications => "publications",
        }
    }

    /// Parses the loose names clients and models use ("Experience", "work experience", "skill").
    pub fn parse_loose(raw: &str) -> Option<SectionKind> {
        let key = raw.trim().to_lowercase();
        let kind = match key.as_str() {
            "personal" | "personal info" | "personal information" | "contact" => {
                SectionKind::Personal
            }
            "summary" | "professional summary" | "profile" | "objective" => SectionKind::Summary,
            "experience" | "experiences" | "work experience" | "employment" => {
                SectionKind::Experience
            }
            "education" => SectionKind::Education,
            "skills" | "skill" | "technical skills" => SectionKind::Skills,
            "projects" | "project" => SectionKind::Projects,
            "certifications" | "certification" | "certificates" => SectionKind::Certifications,
            "languages" | "language" => SectionKind::Languages,
            "awards" | "award" | "awards & achievements" | "achievements" => SectionKind::Awards,
            "references" | "reference" => SectionKind::References,
            "publications" | "publication" => SectionKind::Publications,
            _ => return None,
        };
        Some(kind)
    }

    pub fn default_header(&self) -> &'static str {
        match self {
            SectionKind::Personal => "Personal Information",
            SectionKind::Summary => "Professional Summary",
            SectionKind::Experience => "Work Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Technical Skills",
            SectionKind::Projects => "Projects",
            SectionKind::Certifications => "Certifications",
            SectionKind::Languages => "Languages",
            SectionKind::Awards => "Awards & Achievements",
            SectionKind::References => "References",
            SectionKind::Publications => "Publications",
        }
    }
}

/// Section body: rich text for the summary, structured payloads for everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SectionContent {
    Personal(PersonalInfo),
    Summary(String),
    Experience(Vec<ExperienceItem>),
    Education(Vec<EducationItem>),
    Skills(Vec<SkillItem>),
    Projects(Vec<ProjectItem>),
    Certifications(Vec<CertificationItem>),
    Languages(Vec<LanguageItem>),
    Awards(Vec<AwardItem>),
    References(Vec<ReferenceItem>),
    Publications(Vec<PublicationItem>),
}

impl SectionContent {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionContent::Personal(_) => SectionKind::Personal,
            SectionContent::Summary(_) => SectionKind::Summary,
            SectionContent::Experience(_) => SectionKind::Experience,
            SectionContent::Education(_) => SectionKind::Education,
            SectionContent::Skills(_) => SectionKind::Skills,
            SectionContent::Projects(_) => SectionKind::Projects,
            SectionContent::Certifications(_) => SectionKind::Certifications,
            SectionContent::Languages(_) => SectionKind::Languages,
            SectionContent::Awards(_) => SectionKind::Awards,
            SectionContent::References(_) => SectionKind::References,
            SectionContent::Publications(_) => SectionKind::Publications,
        }
    }

    /// An empty body of the given kind.
    pub fn empty(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Personal => SectionContent::Personal(PersonalInfo::default()),
            SectionKind::Summary => SectionContent::Summary(String::new()),
            SectionKind::Experience => SectionContent::Experience(Vec::new()),
            SectionKind::Education => SectionContent::Education(Vec::new()),
            SectionKind::Skills => SectionContent::Skills(Vec::new()),
            SectionKind::Projects => SectionContent::Projects(Vec::new()),
            SectionKind::Certifications => SectionContent::Certifications(Vec::new()),
            SectionKind::Languages => SectionContent::Languages(Vec::new()),
            SectionKind::Awards => SectionContent::Awards(Vec::new()),
            SectionKind::References => SectionContent::References(Vec::new()),
            SectionKind::Publications => SectionContent::Publications(Vec::new()),
        }
    }

    /// Number of entries in a list section; 1 or 0 for personal and summary.
    pub fn item_count(&self) -> usize {
        match self {
            SectionContent::Personal(p) => usize::from(!p.is_blank()),
            SectionContent::Summary(s) => usize::from(!s.trim().is_empty()),
            SectionContent::Experience(v) => v.len(),
            SectionContent::Education(v) => v.len(),
            SectionContent::Skills(v) => v.len(),
            SectionContent::Projects(v) => v.len(),
            SectionContent::Certifications(v) => v.len(),
            SectionContent::Languages(v) => v.len(),
            SectionContent::Awards(v) => v.len(),
            SectionContent::References(v) => v.len(),
            SectionContent::Publications(v) => v.len(),
        }
    }
}

/// A named, typed block of resume content with an ordinal position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub header: String,
    #[serde(default)]
    pub order_index: u32,
    pub content: SectionContent,
}

impl Section {
    pub fn new(header: impl Into<String>, content: SectionContent) -> Self {
        Section {
            id: Uuid::new_v4(),
            header: header.into(),
            order_index: 0,
            content,
        }
    }

    /// An empty section of `kind` with its default header.
    pub fn empty(kind: SectionKind) -> Self {
        Section::new(kind.default_header(), SectionContent::empty(kind))
    }

    pub fn kind(&self) -> SectionKind {
        self.content.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub score: Option<f32>,
    pub keywords: Vec<String>,
    pub target_job_descriptions: Vec<String>,
    pub sections: Vec<Section>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resume {
    pub fn section(&self, id: Uuid) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
}

/// Lightweight listing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub title: String,
    pub score: Option<f32>,
    pub section_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl From<&Resume> for ResumeSummary {
    fn from(resume: &Resume) -> Self {
        ResumeSummary {
            id: resume.id,
            title: resume.title.clone(),
            score: resume.score,
            section_count: resume.sections.len(),
            updated_at: resume.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_content_wire_shape() {
        let section = Section::new(
            "Professional Summary",
            SectionContent::Summary("<p>Hello</p>".to_string()),
        );
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["content"]["type"], "summary");
        assert_eq!(json["content"]["data"], "<p>Hello</p>");
        assert_eq!(json["order_index"], 0);
    }

    #[test]
    fn test_section_deserializes_without_order_index() {
        let json = r#"{
            "id": "6f1c2f8e-2f55-4c59-9d0e-5d4f3f1b2a10",
            "header": "Skills",
            "content": {"type": "skills", "data": [{"name": "Rust", "category": "Languages"}]}
        }"#;
        let section: Section = serde_json::from_str(json).unwrap();
        assert_eq!(section.kind(), SectionKind::Skills);
        assert_eq!(section.content.item_count(), 1);
    }

    #[test]
    fn test_parse_loose_kind_names() {
        assert_eq!(SectionKind::parse_loose("Experience"), Some(SectionKind::Experience));
        assert_eq!(SectionKind::parse_loose(" work experience "), Some(SectionKind::Experience));
        assert_eq!(SectionKind::parse_loose("skill"), Some(SectionKind::Skills));
        assert_eq!(SectionKind::parse_loose("hobbies"), None);
    }

    #[test]
    fn test_empty_content_matches_kind() {
        for kind in SectionKind::ALL {
            let content = SectionContent::empty(kind);
            assert_eq!(content.kind(), kind);
            assert_eq!(content.item_count(), 0);
        }
    }
}
