//! Preview rendering: HTML fragments per section, grouped into simulated pages.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::layout::{analyze_page_fill, paginate, PageConfig, PageFillAnalysis};
use crate::layout::estimate::group_skills;
use crate::models::resume::{Resume, Section, SectionContent, SectionKind};
use crate::models::sections::{
    AwardItem, CertificationItem, EducationItem, ExperienceItem, LanguageItem, PersonalInfo,
    ProjectItem, PublicationItem, ReferenceItem, SkillItem,
};
use crate::render::html::{escape_text, render_rich};

#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub title: String,
    pub page_count: usize,
    pub pages: Vec<PreviewPage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewPage {
    pub number: usize,
    pub sections: Vec<PreviewSection>,
    pub fill: PageFillAnalysis,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewSection {
    pub id: Uuid,
    pub kind: SectionKind,
    pub header: String,
    pub html: String,
}

/// Paginates the resume and renders every placed section.
pub fn render_preview(resume: &Resume, config: &PageConfig) -> Preview {
    let pages: Vec<PreviewPage> = paginate(&resume.sections, config)
        .into_iter()
        .map(|page| {
            let fill = analyze_page_fill(&page, config);
            let sections = page
                .sections
                .iter()
                .filter_map(|placed| resume.section(placed.section_id))
                .map(|section| PreviewSection {
                    id: section.id,
                    kind: section.kind(),
                    header: section.header.clone(),
                    html: render_section(section),
                })
                .collect();
            PreviewPage {
                number: page.number,
                sections,
                fill,
            }
        })
        .collect();

    Preview {
        title: resume.title.clone(),
        page_count: pages.len(),
        pages,
    }
}

const DOCUMENT_STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;background:#eee;margin:0}\
.page{width:210mm;min-height:297mm;margin:16px auto;padding:18mm;box-sizing:border-box;background:#fff}\
.name{margin:0;font-size:24px}.contact{color:#555;margin-bottom:12px}\
.resume-section h2{font-size:15px;border-bottom:1px solid #ccc;margin:14px 0 6px}\
.item{margin-bottom:8px}.item-head{display:flex;justify-content:space-between}\
.item-sub,.meta{color:#555}.dates{color:#777;white-space:nowrap}.empty{color:#999;text-align:center}";

/// A standalone HTML document with one `.page` block per simulated page.
pub fn render_document(resume: &Resume, config: &PageConfig) -> String {
    let preview = render_preview(resume, config);
    let title = escape_text(&preview.title);

    let mut body = String::new();
    if preview.pages.is_empty() {
        body.push_str(r#"<div class="page"><p class="empty">Nothing to preview yet.</p></div>"#);
    }
    for page in &preview.pages {
        body.push_str(&format!(r#"<div class="page" data-page="{}">"#, page.number));
        for section in &page.sections {
            body.push_str(&section.html);
        }
        body.push_str("</div>");
    }

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title>\
         <style>{DOCUMENT_STYLE}</style></head><body>{body}</body></html>"
    )
}

/// HTML fragment for one section. Optional fields render only when present.
pub fn render_section(section: &Section) -> String {
    let body = match &section.content {
        SectionContent::Personal(info) => return render_personal(info),
        SectionContent::Summary(text) => format!(r#"<div class="rich">{}</div>"#, render_rich(text)),
        SectionContent::Experience(items) => items.iter().map(experience).collect(),
        SectionContent::Education(items) => items.iter().map(education).collect(),
        SectionContent::Skills(items) => skills(items),
        SectionContent::Projects(items) => items.iter().map(project).collect(),
        SectionContent::Certifications(items) => items.iter().map(certification).collect(),
        SectionContent::Languages(items) => items.iter().map(language).collect(),
        SectionContent::Awards(items) => items.iter().map(award).collect(),
        SectionContent::References(items) => items.iter().map(reference).collect(),
        SectionContent::Publications(items) => items.iter().map(publication).collect(),
    };

    format!(
        r#"<section class="resume-section section-{}"><h2>{}</h2>{}</section>"#,
        section.kind().as_str(),
        escape_text(&section.header),
        body
    )
}

fn render_personal(info: &PersonalInfo) -> String {
    let contact: Vec<String> = [
        Some(info.email.as_str()),
        Some(info.phone.as_str()),
        Some(info.location.as_str()),
        info.website.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(escape_text)
    .collect();

    let mut out = String::from(r#"<header class="resume-section section-personal">"#);
    if !info.full_name.trim().is_empty() {
        out.push_str(&format!(r#"<h1 class="name">{}</h1>"#, escape_text(info.full_name.trim())));
    }
    if !contact.is_empty() {
        out.push_str(&format!(r#"<div class="contact">{}</div>"#, contact.join(" | ")));
    }
    out.push_str("</header>");
    out
}

// ── item blocks ─────────────────────────────────────────────────────────────

fn fmt_date(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// "Jan 2020 - Present", "Jan 2020 - Mar 2022", or a single date.
fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>, current: bool) -> Option<String> {
    let end = if current {
        Some("Present".to_string())
    } else {
        end.map(fmt_date)
    };
    match (start.map(fmt_date), end) {
        (Some(s), Some(e)) => Some(format!("{s} - {e}")),
        (Some(s), None) => Some(s),
        (None, Some(e)) => Some(e),
        (None, None) => None,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Title line with an optional subtitle and a right-aligned date.
fn item_head(title: &str, subtitle: Option<&str>, dates: Option<String>) -> String {
    let mut out = format!(r#"<div class="item-head"><div><strong>{}</strong>"#, escape_text(title.trim()));
    if let Some(sub) = non_blank(subtitle) {
        out.push_str(&format!(r#" <span class="item-sub">{}</span>"#, escape_text(sub)));
    }
    out.push_str("</div>");
    if let Some(dates) = dates {
        out.push_str(&format!(r#"<span class="dates">{dates}</span>"#));
    }
    out.push_str("</div>");
    out
}

fn meta(label: &str, value: Option<&str>) -> String {
    match non_blank(value) {
        Some(v) => format!(r#"<div class="meta">{label}: {}</div>"#, escape_text(v)),
        None => String::new(),
    }
}

fn rich(value: Option<&str>) -> String {
    match non_blank(value) {
        Some(v) => format!(r#"<div class="rich">{}</div>"#, render_rich(v)),
        None => String::new(),
    }
}

fn item(parts: &[String]) -> String {
    format!(r#"<div class="item">{}</div>"#, parts.concat())
}

fn experience(e: &ExperienceItem) -> String {
    let subtitle = match non_blank(e.location.as_deref()) {
        Some(loc) => format!("{}, {loc}", e.company.trim()),
        None => e.company.trim().to_string(),
    };
    item(&[
        item_head(&e.position, Some(&subtitle), date_range(e.start_date, e.end_date, e.is_current)),
        rich(Some(&e.description)),
        meta("Technologies", e.technologies.as_deref()),
        rich(e.achievements.as_deref()),
    ])
}

fn education(e: &EducationItem) -> String {
    let title = match non_blank(Some(&e.field_of_study)) {
        Some(field) => format!("{} in {field}", e.degree.trim()),
        None => e.degree.trim().to_string(),
    };
    let gpa = e.gpa.map(|g| format!("{g:.2}"));
    item(&[
        item_head(&title, Some(&e.institution), date_range(e.start_date, e.end_date, e.is_current)),
        meta("Location", e.location.as_deref()),
        meta("GPA", gpa.as_deref()),
        rich(e.description.as_deref()),
        rich(e.achievements.as_deref()),
    ])
}

fn skills(items: &[SkillItem]) -> String {
    group_skills(items)
        .into_iter()
        .map(|(category, names)| {
            let names = escape_text(&names.join(", "));
            if category.is_empty() {
                format!(r#"<div class="skill-line">{names}</div>"#)
            } else {
                format!(
                    r#"<div class="skill-line"><strong>{}:</strong> {names}</div>"#,
                    escape_text(&category)
                )
            }
        })
        .collect()
}

fn project(p: &ProjectItem) -> String {
    item(&[
        item_head(&p.name, p.role.as_deref(), date_range(p.start_date, p.end_date, p.is_ongoing)),
        rich(Some(&p.description)),
        meta("Technologies", p.technologies.as_deref()),
        meta("Link", p.link.as_deref()),
        rich(p.achievements.as_deref()),
    ])
}

fn certification(c: &CertificationItem) -> String {
    let dates = match (c.issue_date, c.expiry_date) {
        (Some(issued), Some(expires)) => Some(format!("{} - {}", fmt_date(issued), fmt_date(expires))),
        (Some(issued), None) => Some(fmt_date(issued)),
        _ => None,
    };
    item(&[
        item_head(&c.name, Some(&c.issuing_organization), dates),
        meta("Credential ID", c.credential_id.as_deref()),
        meta("Verify", c.credential_url.as_deref()),
        rich(c.description.as_deref()),
    ])
}

fn language(l: &LanguageItem) -> String {
    item(&[
        item_head(&l.name, Some(&l.proficiency_level), None),
        meta("Certification", l.certification.as_deref()),
        rich(l.additional_info.as_deref()),
    ])
}

fn award(a: &AwardItem) -> String {
    item(&[
        item_head(&a.title, Some(&a.issuing_organization), a.date_received.map(fmt_date)),
        meta("Level", a.level.as_deref()),
        rich(a.description.as_deref()),
    ])
}

fn reference(r: &ReferenceItem) -> String {
    let subtitle = format!("{}, {}", r.position.trim(), r.company.trim());
    item(&[
        item_head(&r.name, Some(subtitle.trim_matches(|c| c == ',' || c == ' ')), None),
        meta("Relationship", r.relationship.as_deref()),
        rich(r.description.as_deref()),
    ])
}

fn publication(p: &PublicationItem) -> String {
    item(&[
        item_head(&p.title, p.publisher.as_deref(), p.publication_date.map(fmt_date)),
        meta("Authors", p.authors.as_deref()),
        meta("DOI", p.doi.as_deref()),
        rich(p.description.as_deref()),
    ])
}
