//! Reshaping of model replies into `ResumeDraft`s.
//!
//! The model answers in one of two shapes:
//! - an object in the sample format (`{ "title": ..., "experience": [...] }`),
//!   deserialized directly through the lenient item types;
//! - an array of `{ "type", "header", "content" }` sections, where `content` is a
//!   list of items, a rich-text string, or free text ("Available upon request").
//!
//! Array sections are reshaped one at a time. A section that cannot be read is
//! logged and skipped so the rest of the reply is still usable.
//!
//! Items that carry the same field under several accepted spellings keep only
//! the first one present, in the order listed by `field_spellings`.

use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::extract_json;
use crate::models::draft::{ResumeDraft, DEFAULT_DRAFT_TITLE};
use crate::models::resume::{SectionContent, SectionKind};
use crate::models::sections::{AwardItem, PersonalInfo, SkillItem};
use crate::render::html::{html_to_text, looks_like_html};

/// Issuer recorded for awards when the model leaves it out.
pub const UNKNOWN_ISSUER: &str = "Not Specified";

#[derive(Debug, Error)]
pub enum ReshapeError {
    #[error("no JSON found in the model reply")]
    NoJson,

    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object or array")]
    Shape,

    #[error("no resume sections found in the JSON array")]
    NoSections,

    #[error("title is required but was not provided in the JSON")]
    MissingTitle,
}

impl From<ReshapeError> for AppError {
    fn from(err: ReshapeError) -> Self {
        AppError::BadRequest(format!("Invalid resume format: {err}"))
    }
}

#[derive(Debug, Deserialize)]
struct AiSection {
    #[serde(rename = "type", alias = "Type", alias = "section")]
    kind: String,
    #[serde(default)]
    content: Value,
}

/// Parses a model reply into a draft.
///
/// `fallback_title` is used when an object-form reply has no title (section
/// generation echoes only the requested section); without one, a missing title is an error.
pub fn parse_draft(text: &str, fallback_title: Option<&str>) -> Result<ResumeDraft, ReshapeError> {
    let json = extract_json(text).ok_or(ReshapeError::NoJson)?;
    debug!(chars = json.len(), "Reshaping model reply");

    let mut draft = match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => from_sections(items)?,
        value @ Value::Object(_) => from_object(value, fallback_title)?,
        _ => return Err(ReshapeError::Shape),
    };
    to_plain_text(&mut draft);
    Ok(draft)
}

fn from_object(mut value: Value, fallback_title: Option<&str>) -> Result<ResumeDraft, ReshapeError> {
    if let Value::Object(map) = &mut value {
        for (key, kind) in DRAFT_SECTION_KEYS {
            if let Some(content) = map.get_mut(*key) {
                collapse_spellings(*kind, content);
            }
        }
    }
    let mut draft: ResumeDraft = serde_json::from_value(value)?;
    if draft.title.trim().is_empty() {
        draft.title = fallback_title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ReshapeError::MissingTitle)?
            .to_string();
    }
    Ok(draft)
}

fn from_sections(items: Vec<Value>) -> Result<ResumeDraft, ReshapeError> {
    let mut draft = ResumeDraft {
        title: DEFAULT_DRAFT_TITLE.to_string(),
        ..Default::default()
    };
    let mut recognised = 0usize;

    for (index, item) in items.into_iter().enumerate() {
        let section: AiSection = match serde_json::from_value(item) {
            Ok(s) => s,
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed AI section");
                continue;
            }
        };
        let Some(kind) = SectionKind::parse_loose(&section.kind) else {
            warn!(index, kind = %section.kind, "Skipping AI section of unknown type");
            continue;
        };
        recognised += 1;

        match reshape_section(kind, section.content) {
            Ok(content) => draft.absorb(&content),
            Err(e) => warn!(index, kind = kind.as_str(), error = %e, "Skipping AI section that failed to reshape"),
        }
    }

    if recognised == 0 {
        return Err(ReshapeError::NoSections);
    }
    Ok(draft)
}

fn reshape_section(kind: SectionKind, mut content: Value) -> Result<SectionContent, serde_json::Error> {
    use serde_json::from_value;

    collapse_spellings(kind, &mut content);

    Ok(match kind {
        SectionKind::Personal => SectionContent::Personal(from_value::<PersonalInfo>(content)?),
        SectionKind::Summary => SectionContent::Summary(text_content(&content)?),
        SectionKind::Skills => match content {
            Value::String(text) => SectionContent::Skills(parse_skill_lines(&text)),
            other => SectionContent::Skills(from_value(other)?),
        },
        // "Available upon request" and similar carry no entries.
        SectionKind::References => match content {
            Value::String(_) | Value::Null => SectionContent::References(Vec::new()),
            other => SectionContent::References(from_value(other)?),
        },
        SectionKind::Publications => match content {
            Value::Array(_) => SectionContent::Publications(from_value(content)?),
            _ => SectionContent::Publications(Vec::new()),
        },
        SectionKind::Experience => SectionContent::Experience(from_value(content)?),
        SectionKind::Education => SectionContent::Education(from_value(content)?),
        SectionKind::Projects => SectionContent::Projects(from_value(content)?),
        SectionKind::Certifications => SectionContent::Certifications(from_value(content)?),
        SectionKind::Languages => SectionContent::Languages(from_value(content)?),
        SectionKind::Awards => SectionContent::Awards(from_value::<Vec<AwardItem>>(content)?),
    })
}

/// Object-form keys holding section content.
const DRAFT_SECTION_KEYS: &[(&str, SectionKind)] = &[
    ("personal", SectionKind::Personal),
    ("personalInfo", SectionKind::Personal),
    ("personal_info", SectionKind::Personal),
    ("experiences", SectionKind::Experience),
    ("experience", SectionKind::Experience),
    ("education", SectionKind::Education),
    ("skills", SectionKind::Skills),
    ("projects", SectionKind::Projects),
    ("certifications", SectionKind::Certifications),
    ("languages", SectionKind::Languages),
    ("awards", SectionKind::Awards),
    ("publications", SectionKind::Publications),
    ("references", SectionKind::References),
];

/// Spellings accepted for one field, preferred first.
fn field_spellings(kind: SectionKind) -> &'static [&'static [&'static str]] {
    match kind {
        SectionKind::Personal => &[&["full_name", "fullName", "name"]],
        SectionKind::Summary => &[],
        SectionKind::Experience => &[
            &["company", "companyName"],
            &["position", "jobTitle", "title"],
            &["start_date", "startDate"],
            &["end_date", "endDate"],
            &["is_current", "isCurrentJob", "isCurrent"],
        ],
        SectionKind::Education => &[
            &["institution", "schoolName", "school"],
            &["field_of_study", "fieldOfStudy", "major"],
            &["start_date", "startDate"],
            &["end_date", "endDate"],
            &["is_current", "isCurrentStudent", "isCurrent"],
            &["gpa", "GPA"],
        ],
        SectionKind::Skills => &[
            &["proficiency_level", "proficiencyLevel"],
            &["years_of_experience", "yearsOfExperience"],
        ],
        SectionKind::Projects => &[
            &["name", "projectName", "title"],
            &["link", "url"],
            &["start_date", "startDate"],
            &["end_date", "endDate"],
            &["is_ongoing", "isOngoing"],
        ],
        SectionKind::Certifications => &[
            &["issuing_organization", "issuingOrganization", "issuer"],
            &["issue_date", "issueDate", "date"],
            &["expiry_date", "expiryDate"],
            &["credential_id", "credentialId"],
            &["credential_url", "credentialUrl", "link"],
        ],
        SectionKind::Languages => &[
            &["proficiency_level", "proficiencyLevel", "proficiency"],
            &["additional_info", "additionalInfo"],
        ],
        SectionKind::Awards => &[
            &["title", "name"],
            &["issuing_organization", "issuingOrganization", "issuer"],
            &["date_received", "dateReceived", "date"],
            &["url", "link"],
        ],
        SectionKind::References => &[
            &["name", "fullName"],
            &["position", "jobTitle"],
            &["description", "additionalInfo"],
        ],
        SectionKind::Publications => &[
            &["publisher", "venue"],
            &["publication_date", "publicationDate", "date"],
            &["doi", "DOI"],
            &["url", "URL"],
            &["type", "kind"],
        ],
    }
}

/// Drops every spelling of a field after the first one present, so serde does
/// not reject the item as having a duplicate field.
fn collapse_spellings(kind: SectionKind, content: &mut Value) {
    fn collapse(groups: &[&[&str]], item: &mut Value) {
        let Value::Object(map) = item else { return };
        for group in groups {
            let mut present = false;
            for key in group.iter() {
                if present {
                    map.remove(*key);
                } else {
                    present = map.contains_key(*key);
                }
            }
        }
    }

    let groups = field_spellings(kind);
    match content {
        Value::Array(items) => items.iter_mut().for_each(|item| collapse(groups, item)),
        other => collapse(groups, other),
    }
}

/// A summary is a string or `{ "content": "..." }`.
fn text_content(content: &Value) -> Result<String, serde_json::Error> {
    match content {
        Value::String(s) => Ok(s.clone()),
        Value::Object(map) => map
            .get("content")
            .or_else(|| map.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| serde_json::Error::custom("summary object has no text content")),
        other => Err(serde_json::Error::custom(format!(
            "expected summary text, found {other}"
        ))),
    }
}

/// Splits rich-text skills ("<p><b>Languages:</b> Rust, Go; C</p>") into items.
/// Lines without a `Category:` prefix are ignored.
pub fn parse_skill_lines(text: &str) -> Vec<SkillItem> {
    html_to_text(text)
        .lines()
        .filter_map(|line| {
            let line = line.trim().trim_start_matches('•').trim();
            let (category, names) = line.split_once(':')?;
            let category = category.trim();
            (!category.is_empty()).then_some((category, names))
        })
        .flat_map(|(category, names)| {
            names
                .split([',', ';'])
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(move |name| SkillItem {
                    name: name.to_string(),
                    category: category.to_string(),
                    ..Default::default()
                })
        })
        .collect()
}

/// Converts markup in free-text fields to plain text and fills defaults the
/// form requires.
fn to_plain_text(draft: &mut ResumeDraft) {
    fn clean(text: &mut String) {
        if looks_like_html(text) {
            *text = html_to_text(text);
        } else {
            *text = text.trim().to_string();
        }
    }
    fn clean_opt(text: &mut Option<String>) {
        if let Some(t) = text.as_mut() {
            clean(t);
        }
        if text.as_deref().is_some_and(str::is_empty) {
            *text = None;
        }
    }

    if let Some(summary) = draft.summary.as_mut() {
        clean(summary);
    }
    for e in &mut draft.experiences {
        clean(&mut e.description);
        clean_opt(&mut e.achievements);
    }
    for e in &mut draft.education {
        clean_opt(&mut e.description);
        clean_opt(&mut e.achievements);
    }
    for p in &mut draft.projects {
        clean(&mut p.description);
        clean_opt(&mut p.achievements);
    }
    for c in &mut draft.certifications {
        clean_opt(&mut c.description);
    }
    for a in &mut draft.awards {
        clean_opt(&mut a.description);
        if a.issuing_organization.trim().is_empty() {
            a.issuing_organization = UNKNOWN_ISSUER.to_string();
        }
    }
    for r in &mut draft.references {
        clean_opt(&mut r.description);
    }
    for p in &mut draft.publications {
        clean_opt(&mut p.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_object_form_with_fences() {
        let reply = "```json\n{\"title\": \"Data Engineer\", \"summary\": {\"content\": \"Builds pipelines\"}, \
                     \"experience\": [{\"company\": \"Acme\", \"position\": \"Engineer\", \"startDate\": \"2020-01\"}]}\n```";
        let draft = parse_draft(reply, None).unwrap();
        assert_eq!(draft.title, "Data Engineer");
        assert_eq!(draft.summary.as_deref(), Some("Builds pipelines"));
        assert_eq!(draft.experiences[0].start_date, NaiveDate::from_ymd_opt(2020, 1, 1));
    }

    #[test]
    fn test_object_form_missing_title() {
        let reply = r#"{"skills": [{"name": "Rust", "category": "Languages"}]}"#;
        assert!(matches!(parse_draft(reply, None), Err(ReshapeError::MissingTitle)));
        let draft = parse_draft(reply, Some("My Resume")).unwrap();
        assert_eq!(draft.title, "My Resume");
        assert_eq!(draft.skills.len(), 1);
    }

    #[test]
    fn test_array_form_alternate_field_names() {
        let reply = r#"[
            {"type": "Summary", "header": "About", "content": "<p>Seasoned engineer.</p>"},
            {"type": "experience", "header": "Work", "content": [
                {"companyName": "Acme", "jobTitle": "Lead", "startDate": "2019-04-01", "endDate": "",
                 "description": "<ul><li>Led team</li><li>Shipped v2</li></ul>"}
            ]},
            {"type": "education", "content": [
                {"schoolName": "MIT", "degree": "BSc", "major": "CS", "gpa": "3.9", "startDate": "2010"}
            ]},
            {"type": "projects", "content": [{"projectName": "Tool", "technologies": "Rust"}]},
            {"type": "certifications", "content": [{"name": "CKA", "issuer": "CNCF", "date": "2022-05-01", "link": "https://x"}]},
            {"type": "languages", "content": [{"name": "French", "proficiency": "Fluent"}]},
            {"type": "awards", "content": [{"name": "Hackathon", "date": "2021"}]},
            {"type": "references", "content": [{"fullName": "Sam", "jobTitle": "CTO", "company": "Acme"}]}
        ]"#;
        let draft = parse_draft(reply, None).unwrap();

        assert_eq!(draft.title, DEFAULT_DRAFT_TITLE);
        assert_eq!(draft.summary.as_deref(), Some("Seasoned engineer."));
        let exp = &draft.experiences[0];
        assert_eq!((exp.company.as_str(), exp.position.as_str()), ("Acme", "Lead"));
        assert_eq!(exp.end_date, None);
        assert_eq!(exp.description, "• Led team\n• Shipped v2");
        assert_eq!(draft.education[0].institution, "MIT");
        assert_eq!(draft.education[0].field_of_study, "CS");
        assert_eq!(draft.education[0].gpa, Some(3.9));
        assert_eq!(draft.projects[0].name, "Tool");
        assert_eq!(draft.certifications[0].issuing_organization, "CNCF");
        assert_eq!(draft.certifications[0].credential_url.as_deref(), Some("https://x"));
        assert_eq!(draft.languages[0].proficiency_level, "Fluent");
        assert_eq!(draft.awards[0].title, "Hackathon");
        assert_eq!(draft.awards[0].issuing_organization, UNKNOWN_ISSUER);
        assert_eq!(draft.references[0].name, "Sam");
        assert_eq!(draft.references[0].position, "CTO");
    }

    #[test]
    fn test_repeated_spellings_keep_the_first() {
        let reply = r#"[
            {"type": "experience", "content": [
                {"company": "Acme", "position": "Lead", "title": "Lead Engineer", "companyName": "Acme Inc"}
            ]},
            {"type": "projects", "content": [{"projectName": "Tool", "name": "Tool", "title": "Tool v2"}]},
            {"type": "awards", "content": [{"title": "Best Paper", "name": "Best Paper", "issuer": "ACM"}]},
            {"type": "personal", "content": {"fullName": "Ada", "name": "Ada L."}}
        ]"#;
        let draft = parse_draft(reply, None).unwrap();
        assert_eq!(draft.experiences[0].position, "Lead");
        assert_eq!(draft.experiences[0].company, "Acme");
        assert_eq!(draft.projects[0].name, "Tool");
        assert_eq!(draft.awards[0].title, "Best Paper");
        assert_eq!(draft.awards[0].issuing_organization, "ACM");
        assert_eq!(draft.personal.as_ref().unwrap().full_name, "Ada");

        let object = r#"{"title": "T", "experience": [{"company": "A", "jobTitle": "Dev", "title": "Developer"}]}"#;
        let draft = parse_draft(object, None).unwrap();
        assert_eq!(draft.title, "T");
        assert_eq!(draft.experiences[0].position, "Dev");
    }

    #[test]
    fn test_skills_rich_text_is_split() {
        let reply = r#"[{"type": "skills", "content": "<p><b>Languages:</b> Rust, Go; Python</p><p>Cloud: AWS</p><p>misc text</p>"}]"#;
        let draft = parse_draft(reply, None).unwrap();
        let names: Vec<(&str, &str)> = draft
            .skills
            .iter()
            .map(|s| (s.category.as_str(), s.name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Languages", "Rust"),
                ("Languages", "Go"),
                ("Languages", "Python"),
                ("Cloud", "AWS")
            ]
        );
    }

    #[test]
    fn test_references_as_text_become_empty() {
        let reply = r#"[{"type": "references", "content": "Available upon request"},
                        {"type": "publications", "content": "None"}]"#;
        let draft = parse_draft(reply, None).unwrap();
        assert!(draft.references.is_empty());
        assert!(draft.publications.is_empty());
    }

    #[test]
    fn test_broken_section_is_skipped() {
        let reply = r#"[
            {"type": "experience", "content": "not a list"},
            {"header": "no type"},
            {"type": "hobbies", "content": []},
            {"type": "summary", "content": "Still here"}
        ]"#;
        let draft = parse_draft(reply, None).unwrap();
        assert!(draft.experiences.is_empty());
        assert_eq!(draft.summary.as_deref(), Some("Still here"));
    }

    #[test]
    fn test_array_without_known_sections_is_error() {
        assert!(matches!(
            parse_draft(r#"[{"type": "hobbies", "content": []}]"#, None),
            Err(ReshapeError::NoSections)
        ));
        assert!(matches!(parse_draft("[]", None), Err(ReshapeError::NoSections)));
    }

    #[test]
    fn test_non_json_reply() {
        assert!(matches!(parse_draft("I cannot help with that.", None), Err(ReshapeError::NoJson)));
        assert!(matches!(parse_draft("{not json}", None), Err(ReshapeError::Json(_))));
    }

    #[test]
    fn test_reshape_error_maps_to_bad_request() {
        let err: AppError = ReshapeError::MissingTitle.into();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.starts_with("Invalid resume format")));
    }
}
