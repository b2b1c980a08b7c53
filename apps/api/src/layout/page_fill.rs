//! Page Fill Analysis: how well each simulated page is used.
//!
//! # Fill rules
//! - Fill > 100%         → overflow (only possible for a single oversized section)
//! - Fill 92–100%        → full
//! - Fill < 92%          → partial; the last page of a resume is usually partial

use serde::Serialize;
use uuid::Uuid;

use crate::layout::paginate::Page;
use crate::layout::PageConfig;

/// Fill ratio at or above which a page counts as full (8% whitespace or less).
const FULL_THRESHOLD: f32 = 0.92;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFillVerdict {
    /// Content runs past the bottom of the page.
    Overflow,
    /// 92–100% fill.
    Full,
    /// Less than 92% fill.
    Partial,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageFillAnalysis {
    pub page: usize,
    pub total_lines_used: u16,
    pub total_lines_available: u16,
    pub whitespace_fraction: f32,
    pub overflow_fraction: f32,
    pub verdict: PageFillVerdict,
    /// Sections on this page taller than a whole page.
    pub oversized_sections: Vec<Uuid>,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

pub fn analyze_page_fill(page: &Page, config: &PageConfig) -> PageFillAnalysis {
    let available = config.lines_per_page.max(1);
    let fill_ratio = f32::from(page.lines_used) / f32::from(available);

    let whitespace_fraction = (1.0_f32 - fill_ratio).max(0.0);
    let overflow_fraction = (fill_ratio - 1.0_f32).max(0.0);

    let verdict = if fill_ratio > 1.0 {
        PageFillVerdict::Overflow
    } else if fill_ratio >= FULL_THRESHOLD {
        PageFillVerdict::Full
    } else {
        PageFillVerdict::Partial
    };

    let oversized_sections = page
        .sections
        .iter()
        .filter(|s| s.lines > available)
        .map(|s| s.section_id)
        .collect();

    PageFillAnalysis {
        page: page.number,
        total_lines_used: page.lines_used,
        total_lines_available: available,
        whitespace_fraction,
        overflow_fraction,
        verdict,
        oversized_sections,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::paginate::PlacedSection;
    use crate::models::resume::SectionKind;

    fn make_page(section_lines: &[u16]) -> Page {
        let sections: Vec<PlacedSection> = section_lines
            .iter()
            .map(|&lines| PlacedSection {
                section_id: Uuid::new_v4(),
                kind: SectionKind::Experience,
                header: "Work Experience".to_string(),
                lines,
            })
            .collect();
        Page {
            number: 1,
            lines_used: section_lines.iter().sum(),
            sections,
        }
    }

    #[test]
    fn test_full_fill_verdict() {
        // 43/45 = 95.6% fill
        let analysis = analyze_page_fill(&make_page(&[20, 23]), &PageConfig::default());
        assert_eq!(analysis.verdict, PageFillVerdict::Full);
        assert_eq!(analysis.total_lines_used, 43);
        assert!(analysis.whitespace_fraction < 0.08);
        assert!(analysis.oversized_sections.is_empty());
    }

    #[test]
    fn test_exactly_full_page() {
        let analysis = analyze_page_fill(&make_page(&[45]), &PageConfig::default());
        assert_eq!(analysis.verdict, PageFillVerdict::Full);
        assert_eq!(analysis.overflow_fraction, 0.0);
    }

    #[test]
    fn test_partial_fill_verdict() {
        // 35/45 = 77.8% fill
        let analysis = analyze_page_fill(&make_page(&[35]), &PageConfig::default());
        assert_eq!(analysis.verdict, PageFillVerdict::Partial);
        assert!(analysis.whitespace_fraction > 0.2);
    }

    #[test]
    fn test_overflow_flags_oversized_section() {
        let page = make_page(&[62]);
        let analysis = analyze_page_fill(&page, &PageConfig::default());
        assert_eq!(analysis.verdict, PageFillVerdict::Overflow);
        assert!(analysis.overflow_fraction > 0.3);
        assert_eq!(analysis.oversized_sections, vec![page.sections[0].section_id]);
    }

    #[test]
    fn test_verdict_serializes_snake_case() {
        let json = serde_json::to_value(PageFillVerdict::Overflow).unwrap();
        assert_eq!(json, "overflow");
    }
}
