//! Content-size estimation: how many printed lines a section occupies.
//!
//! This is a heuristic, not a typesetter: list sections are charged a fixed number
//! of lines per item, text sections are charged by character count.

use crate::layout::PageConfig;
use crate::models::resume::{Section, SectionContent, SectionKind};
use crate::models::sections::SkillItem;
use crate::render::html::strip_html;

/// Section header plus the spacing above it.
const HEADER_LINES: u16 = 2;
/// Name and contact block at the top of the first page.
const PERSONAL_LINES: u16 = 3;
/// Text sections never take fewer lines than this.
const MIN_TEXT_LINES: u16 = 2;

/// Lines charged per entry of a list section. `None` for non-list kinds.
pub fn lines_per_item(kind: SectionKind) -> Option<u16> {
    match kind {
        SectionKind::Experience => Some(10),
        SectionKind::Education => Some(7),
        SectionKind::Projects => Some(8),
        SectionKind::Certifications | SectionKind::Languages | SectionKind::Awards => Some(3),
        SectionKind::References | SectionKind::Publications => Some(5),
        SectionKind::Personal | SectionKind::Summary | SectionKind::Skills => None,
    }
}

/// Whether a section has anything worth printing.
pub fn has_content(section: &Section) -> bool {
    match &section.content {
        SectionContent::Personal(info) => !info.is_blank(),
        SectionContent::Summary(text) => !strip_html(text).is_empty(),
        other => other.item_count() > 0,
    }
}

/// Estimated printed height of a section in lines. Empty sections take 0.
pub fn estimate_lines(section: &Section, config: &PageConfig) -> u16 {
    if !has_content(section) {
        return 0;
    }

    let body = match &section.content {
        SectionContent::Personal(_) => return PERSONAL_LINES,
        SectionContent::Summary(text) => {
            text_lines(&strip_html(text), config.chars_per_line).max(MIN_TEXT_LINES)
        }
        SectionContent::Skills(items) => skill_lines(items, config).max(MIN_TEXT_LINES),
        other => {
            let per_item = lines_per_item(other.kind()).unwrap_or(MIN_TEXT_LINES);
            let count = u16::try_from(other.item_count()).unwrap_or(u16::MAX);
            per_item.saturating_mul(count)
        }
    };

    HEADER_LINES.saturating_add(body)
}

/// Skills grouped by category in first-seen order. Blank categories group under "".
pub fn group_skills(items: &[SkillItem]) -> Vec<(String, Vec<&str>)> {
    let mut groups: Vec<(String, Vec<&str>)> = Vec::new();
    for item in items {
        let name = item.name.trim();
        if name.is_empty() {
            continue;
        }
        let category = item.category.trim();
        match groups.iter_mut().find(|(c, _)| c == category) {
            Some((_, names)) => names.push(name),
            None => groups.push((category.to_string(), vec![name])),
        }
    }
    groups
}

/// One "Category: a, b, c" line of text per group, each wrapped independently.
fn skill_lines(items: &[SkillItem], config: &PageConfig) -> u16 {
    group_skills(items)
        .iter()
        .map(|(category, names)| {
            let line = if category.is_empty() {
                names.join(", ")
            } else {
                format!("{category}: {}", names.join(", "))
            };
            text_lines(&line, config.chars_per_line)
        })
        .fold(0u16, u16::saturating_add)
}

/// `ceil(chars / chars_per_line)`.
fn text_lines(text: &str, chars_per_line: u16) -> u16 {
    let chars = text.chars().count();
    let per_line = usize::from(chars_per_line.max(1));
    u16::try_from(chars.div_ceil(per_line)).unwrap_or(u16::MAX)
}
