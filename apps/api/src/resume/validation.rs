use chrono::NaiveDate;

use crate::errors::FieldError;
use crate::models::resume::{Section, SectionContent};
use crate::models::sections::{
    AwardItem, CertificationItem, EducationItem, ExperienceItem, LanguageItem, PersonalInfo,
    ProjectItem, PublicationItem, ReferenceItem, SkillItem,
};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const HEADER_MAX_CHARS: usize = 100;
const GPA_MAX: f64 = 5.0;

/// Checks the resume-level fields and every section. Empty result means valid.
pub fn validate_resume(
    title: &str,
    score: Option<f32>,
    keywords: &[String],
    sections: &[Section],
) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_title(title, &mut errors);

    if let Some(score) = score {
        if !(0.0..=100.0).contains(&score) {
            errors.push(FieldError::new("score", "must be between 0 and 100"));
        }
    }

    for (i, keyword) in keywords.iter().enumerate() {
        if keyword.trim().is_empty() {
            errors.push(FieldError::new(format!("keywords[{i}]"), "must not be blank"));
        }
    }

    for (i, section) in sections.iter().enumerate() {
        errors.extend(validate_section(section, &format!("sections[{i}]")));
    }
    errors
}

pub fn check_title(title: &str, errors: &mut Vec<FieldError>) {
    let chars = title.trim().chars().count();
    if chars == 0 {
        errors.push(FieldError::new("title", "is required"));
    } else if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&chars) {
        errors.push(FieldError::new(
            "title",
            format!("must be between {TITLE_MIN_CHARS} and {TITLE_MAX_CHARS} characters"),
        ));
    }
}

/// Checks one section. Field paths are prefixed with `prefix` (e.g. `sections[2]`).
pub fn validate_section(section: &Section, prefix: &str) -> Vec<FieldError> {
    let mut v = Validator {
        errors: Vec::new(),
        prefix: prefix.to_string(),
    };

    let header = section.header.trim();
    if header.is_empty() {
        v.error("header", "is required");
    } else if header.chars().count() > HEADER_MAX_CHARS {
        v.error("header", format!("must be at most {HEADER_MAX_CHARS} characters"));
    }

    match &section.content {
        SectionContent::Personal(p) => personal(&mut v, p),
        SectionContent::Summary(_) => {}
        SectionContent::Experience(items) => each(&mut v, items, experience),
        SectionContent::Education(items) => each(&mut v, items, education),
        SectionContent::Skills(items) => each(&mut v, items, skill),
        SectionContent::Projects(items) => each(&mut v, items, project),
        SectionContent::Certifications(items) => each(&mut v, items, certification),
        SectionContent::Languages(items) => each(&mut v, items, language),
        SectionContent::Awards(items) => each(&mut v, items, award),
        SectionContent::References(items) => each(&mut v, items, reference),
        SectionContent::Publications(items) => each(&mut v, items, publication),
    }
    v.errors
}

/// Minimal address check: one `@`, no whitespace, a dotted domain without empty labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

// ── per-kind rules ──────────────────────────────────────────────────────────

struct Validator {
    errors: Vec<FieldError>,
    prefix: String,
}

impl Validator {
    fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .push(FieldError::new(format!("{}.{field}", self.prefix), message));
    }

    fn required(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.error(field, "is required");
        }
    }

    fn required_date(&mut self, field: &str, value: Option<NaiveDate>) {
        if value.is_none() {
            self.error(field, "is required");
        }
    }

    fn ordered(&mut self, field: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                self.error(field, "must not be before the start date");
            }
        }
    }

    fn rating(&mut self, field: &str, value: Option<u8>) {
        if let Some(value) = value {
            if !(1..=5).contains(&value) {
                self.error(field, "must be between 1 and 5");
            }
        }
    }
}

fn each<T>(v: &mut Validator, items: &[T], check: fn(&mut Validator, &T)) {
    let base = v.prefix.clone();
    for (i, item) in items.iter().enumerate() {
        v.prefix = format!("{base}.data[{i}]");
        check(v, item);
    }
    v.prefix = base;
}

fn personal(v: &mut Validator, p: &PersonalInfo) {
    let email = p.email.trim();
    if !email.is_empty() && !is_valid_email(email) {
        v.error("email", "is not a valid email address");
    }
}

fn experience(v: &mut Validator, e: &ExperienceItem) {
    v.required("company", &e.company);
    v.required("position", &e.position);
    v.required_date("start_date", e.start_date);
    if !e.is_current {
        v.ordered("end_date", e.start_date, e.end_date);
    }
}

fn education(v: &mut Validator, e: &EducationItem) {
    v.required("institution", &e.institution);
    v.required("degree", &e.degree);
    v.required("field_of_study", &e.field_of_study);
    v.required_date("start_date", e.start_date);
    if !e.is_current {
        v.ordered("end_date", e.start_date, e.end_date);
    }
    if let Some(gpa) = e.gpa {
        if !(0.0..=GPA_MAX).contains(&gpa) {
            v.error("gpa", format!("must be between 0 and {GPA_MAX}"));
        }
    }
}

fn skill(v: &mut Validator, s: &SkillItem) {
    v.required("name", &s.name);
    v.required("category", &s.category);
    v.rating("proficiency_level", s.proficiency_level);
}

fn project(v: &mut Validator, p: &ProjectItem) {
    v.required("name", &p.name);
    if !p.is_ongoing {
        v.ordered("end_date", p.start_date, p.end_date);
    }
}

fn certification(v: &mut Validator, c: &CertificationItem) {
    v.required("name", &c.name);
    v.required("issuing_organization", &c.issuing_organization);
    if let (Some(issued), Some(expires)) = (c.issue_date, c.expiry_date) {
        if expires <= issued {
            v.error("expiry_date", "must be after the issue date");
        }
    }
}

fn language(v: &mut Validator, l: &LanguageItem) {
    v.required("name", &l.name);
    v.required("proficiency_level", &l.proficiency_level);
    v.rating("speaking", l.speaking);
    v.rating("writing", l.writing);
    v.rating("reading", l.reading);
    v.rating("listening", l.listening);
}

fn award(v: &mut Validator, a: &AwardItem) {
    v.required("title", &a.title);
}

fn reference(v: &mut Validator, r: &ReferenceItem) {
    v.required("name", &r.name);
    v.required("company", &r.company);
    v.required("position", &r.position);
}

fn publication(v: &mut Validator, p: &PublicationItem) {
    v.required("title", &p.title);
}
