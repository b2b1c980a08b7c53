//! Structured payloads for the typed resume sections.
//!
//! Every item struct is `#[serde(default)]` and accepts the camelCase spellings
//! used by browser clients and model output as aliases, so the same types serve
//! form submissions, stored documents, and reshaped AI drafts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    #[serde(alias = "fullName", alias = "name", deserialize_with = "lenient::string")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub website: Option<String>,
}

impl PersonalInfo {
    pub fn is_blank(&self) -> bool {
        [&self.full_name, &self.email, &self.phone, &self.location]
            .iter()
            .all(|s| s.trim().is_empty())
            && self.website.as_deref().map_or(true, |w| w.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceItem {
    #[serde(alias = "companyName", deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(alias = "jobTitle", alias = "title", deserialize_with = "lenient::string")]
    pub position: String,
    #[serde(alias = "startDate", deserialize_with = "lenient::date")]
    pub start_date: Option<NaiveDate>,
    #[serde(alias = "endDate", deserialize_with = "lenient::date")]
    pub end_date: Option<NaiveDate>,
    #[serde(alias = "isCurrentJob", alias = "isCurrent", deserialize_with = "lenient::bool_or_false")]
    pub is_current: bool,
    /// Rich text (HTML from the editor, or plain text).
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub technologies: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub achievements: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationItem {
    #[serde(alias = "schoolName", alias = "school", deserialize_with = "lenient::string")]
    pub institution: String,
    #[serde(deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(alias = "fieldOfStudy", alias = "major", deserialize_with = "lenient::string")]
    pub field_of_study: String,
    #[serde(alias = "startDate", deserialize_with = "lenient::date")]
    pub start_date: Option<NaiveDate>,
    #[serde(alias = "endDate", deserialize_with = "lenient::date")]
    pub end_date: Option<NaiveDate>,
    #[serde(alias = "isCurrentStudent", alias = "isCurrent", deserialize_with = "lenient::bool_or_false")]
    pub is_current: bool,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(alias = "GPA", deserialize_with = "lenient::opt_f64")]
    pub gpa: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub achievements: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillItem {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub category: String,
    /// 1 (basic) to 5 (expert).
    #[serde(alias = "proficiencyLevel", deserialize_with = "lenient::opt_u8")]
    pub proficiency_level: Option<u8>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(alias = "yearsOfExperience", deserialize_with = "lenient::u32_or_zero")]
    pub years_of_experience: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectItem {
    #[serde(alias = "projectName", alias = "title", deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub technologies: Option<String>,
    #[serde(alias = "url", deserialize_with = "lenient::opt_string")]
    pub link: Option<String>,
    #[serde(alias = "startDate", deserialize_with = "lenient::date")]
    pub start_date: Option<NaiveDate>,
    #[serde(alias = "endDate", deserialize_with = "lenient::date")]
    pub end_date: Option<NaiveDate>,
    #[serde(alias = "isOngoing", deserialize_with = "lenient::bool_or_false")]
    pub is_ongoing: bool,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub achievements: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationItem {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(alias = "issuingOrganization", alias = "issuer", deserialize_with = "lenient::string")]
    pub issuing_organization: String,
    #[serde(alias = "issueDate", alias = "date", deserialize_with = "lenient::date")]
    pub issue_date: Option<NaiveDate>,
    #[serde(alias = "expiryDate", deserialize_with = "lenient::date")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(alias = "credentialId", deserialize_with = "lenient::opt_string")]
    pub credential_id: Option<String>,
    #[serde(alias = "credentialUrl", alias = "link", deserialize_with = "lenient::opt_string")]
    pub credential_url: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageItem {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    /// Free text: "Native", "Fluent", "Intermediate", "Basic", or a CEFR level.
    #[serde(alias = "proficiencyLevel", alias = "proficiency", deserialize_with = "lenient::string")]
    pub proficiency_level: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub certification: Option<String>,
    #[serde(alias = "additionalInfo", deserialize_with = "lenient::opt_string")]
    pub additional_info: Option<String>,
    #[serde(deserialize_with = "lenient::opt_u8")]
    pub speaking: Option<u8>,
    #[serde(deserialize_with = "lenient::opt_u8")]
    pub writing: Option<u8>,
    #[serde(deserialize_with = "lenient::opt_u8")]
    pub reading: Option<u8>,
    #[serde(deserialize_with = "lenient::opt_u8")]
    pub listening: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwardItem {
    #[serde(alias = "name", deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(alias = "issuingOrganization", alias = "issuer", deserialize_with = "lenient::string")]
    pub issuing_organization: String,
    #[serde(alias = "dateReceived", alias = "date", deserialize_with = "lenient::date")]
    pub date_received: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub level: Option<String>,
    #[serde(alias = "link", deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceItem {
    #[serde(alias = "fullName", deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(alias = "jobTitle", deserialize_with = "lenient::string")]
    pub position: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub relationship: Option<String>,
    #[serde(alias = "additionalInfo", deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationItem {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(alias = "venue", deserialize_with = "lenient::opt_string")]
    pub publisher: Option<String>,
    #[serde(alias = "publicationDate", alias = "date", deserialize_with = "lenient::date")]
    pub publication_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub authors: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(alias = "DOI", deserialize_with = "lenient::opt_string")]
    pub doi: Option<String>,
    #[serde(alias = "URL", deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,
    /// "Journal Article", "Conference Paper", "Book Chapter", ...
    #[serde(rename = "type", alias = "kind", deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub citation: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub impact: Option<String>,
}
