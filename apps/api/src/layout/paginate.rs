//! Greedy page grouping for the preview.
//!
//! Sections are placed in order, each on the current page if it still fits,
//! otherwise on a fresh page. Sections are never split across pages.
//!
//! # Placement rules
//! - The personal block always opens page 1, wherever it appears in the list;
//!   it is placed before anything else so page 1 capacity accounts for it.
//! - Sections with no printable content are left out.
//! - A section taller than a whole page gets a page of its own (and overflows it).
//! - A resume with nothing printable has zero pages.

use serde::Serialize;
use uuid::Uuid;

use crate::layout::estimate::{estimate_lines, has_content};
use crate::layout::PageConfig;
use crate::models::resume::{Section, SectionKind};

/// A section as placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedSection {
    pub section_id: Uuid,
    pub kind: SectionKind,
    pub header: String,
    pub lines: u16,
}

/// One simulated printed page. `number` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub number: usize,
    pub sections: Vec<PlacedSection>,
    pub lines_used: u16,
}

impl Page {
    fn new(number: usize) -> Self {
        Page {
            number,
            sections: Vec::new(),
            lines_used: 0,
        }
    }

    fn place(&mut self, section: &Section, lines: u16) {
        self.sections.push(PlacedSection {
            section_id: section.id,
            kind: section.kind(),
            header: section.header.clone(),
            lines,
        });
        self.lines_used = self.lines_used.saturating_add(lines);
    }
}

/// Groups `sections` (already in display order) into pages.
pub fn paginate(sections: &[Section], config: &PageConfig) -> Vec<Page> {
    let capacity = config.lines_per_page;
    let mut pages = vec![Page::new(1)];
    let mut current = 0usize;

    let (personal, rest): (Vec<&Section>, Vec<&Section>) = sections
        .iter()
        .filter(|s| has_content(s))
        .partition(|s| s.kind() == SectionKind::Personal);

    for section in personal {
        pages[0].place(section, estimate_lines(section, config));
    }

    for section in rest {
        let lines = estimate_lines(section, config);
        let page = &pages[current];
        let fits = page.lines_used.saturating_add(lines) <= capacity;
        if !fits && !page.sections.is_empty() {
            pages.push(Page::new(pages.len() + 1));
            current += 1;
        }
        pages[current].place(section, lines);
    }

    pages.retain(|p| !p.sections.is_empty());
    for (i, page) in pages.iter_mut().enumerate() {
        page.number = i + 1;
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::SectionContent;
    use crate::models::sections::{ExperienceItem, PersonalInfo, SkillItem};

    fn config() -> PageConfig {
        PageConfig::default()
    }

    fn personal() -> Section {
        Section::new(
            "Personal Information",
            SectionContent::Personal(PersonalInfo {
                full_name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                ..Default::default()
            }),
        )
    }

    /// 2 header lines + 10 per item.
    fn experience(items: usize) -> Section {
        Section::new(
            "Work Experience",
            SectionContent::Experience(vec![ExperienceItem::default(); items]),
        )
    }

    fn skills() -> Section {
        Section::new(
            "Skills",
            SectionContent::Skills(vec![SkillItem {
                name: "Rust".into(),
                ..Default::default()
            }]),
        )
    }

    #[test]
    fn test_empty_resume_has_no_pages() {
        assert!(paginate(&[], &config()).is_empty());
        let blank = vec![Section::empty(SectionKind::Personal), Section::empty(SectionKind::Summary)];
        assert!(paginate(&blank, &config()).is_empty());
    }

    #[test]
    fn test_small_resume_fits_one_page() {
        let sections = vec![personal(), experience(2), skills()];
        let pages = paginate(&sections, &config());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].sections.len(), 3);
        // 3 + 22 + 4
        assert_eq!(pages[0].lines_used, 29);
    }

    #[test]
    fn test_section_that_does_not_fit_moves_to_next_page() {
        // 3 + 32 = 35, then 22 does not fit in 45.
        let sections = vec![personal(), experience(3), experience(2)];
        let pages = paginate(&sections, &config());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines_used, 35);
        assert_eq!(pages[1].number, 2);
        assert_eq!(pages[1].sections[0].section_id, sections[2].id);
        assert_eq!(pages[1].lines_used, 22);
    }

    #[test]
    fn test_exact_fit_stays_on_page() {
        // 3 + 42 = 45 exactly.
        let sections = vec![personal(), experience(4)];
        let pages = paginate(&sections, &config());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines_used, 45);
    }

    #[test]
    fn test_oversized_section_gets_its_own_page() {
        let sections = vec![experience(1), experience(6), skills()];
        let pages = paginate(&sections, &config());
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].sections.len(), 1);
        assert_eq!(pages[1].lines_used, 62);
        assert_eq!(pages[2].sections[0].kind, SectionKind::Skills);
    }

    #[test]
    fn test_oversized_first_section_does_not_leave_blank_page() {
        let pages = paginate(&[experience(6)], &config());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
    }

    #[test]
    fn test_personal_always_on_first_page() {
        let sections = vec![experience(4), experience(3), personal()];
        let pages = paginate(&sections, &config());
        assert_eq!(pages.len(), 2);
        assert!(pages[0]
            .sections
            .iter()
            .any(|s| s.kind == SectionKind::Personal));
        assert!(pages[1]
            .sections
            .iter()
            .all(|s| s.kind != SectionKind::Personal));
        assert_eq!(pages[0].sections[0].kind, SectionKind::Personal);
    }

    #[test]
    fn test_late_personal_counts_against_first_page() {
        // Without personal: 32 + 12 = 44 lines. With it placed first: 3 + 32,
        // and the 12-line section no longer fits.
        let sections = vec![experience(3), experience(1), personal()];
        let config = config();
        let pages = paginate(&sections, &config);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].sections[0].kind, SectionKind::Personal);
        assert_eq!(pages[0].lines_used, 35);
        assert_eq!(pages[1].sections[0].section_id, sections[1].id);
        for page in &pages {
            assert!(page.lines_used <= config.lines_per_page);
        }
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let sections = vec![
            personal(),
            Section::empty(SectionKind::Projects),
            experience(1),
        ];
        let pages = paginate(&sections, &config());
        assert_eq!(pages.len(), 1);
        assert!(pages[0]
            .sections
            .iter()
            .all(|s| s.kind != SectionKind::Projects));
    }

    #[test]
    fn test_smaller_page_capacity_from_config() {
        let small = PageConfig {
            lines_per_page: 20,
            chars_per_line: 80,
        };
        let sections = vec![personal(), experience(1), experience(1)];
        let pages = paginate(&sections, &small);
        // 3 + 12 = 15, next 12 does not fit in 20.
        assert_eq!(pages.len(), 2);
    }
}
