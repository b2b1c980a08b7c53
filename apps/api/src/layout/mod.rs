// Simulated printed pages for the preview: per-section size estimates,
// greedy page grouping, and page fill analysis.

pub mod estimate;
pub mod page_fill;
pub mod paginate;

use serde::{Deserialize, Serialize};

// Re-export the public API consumed by render and the resume handlers.
pub use page_fill::{analyze_page_fill, PageFillAnalysis};
pub use paginate::{paginate, Page};

/// Geometry of a simulated A4 page.
///
/// An A4 page fits roughly 50–55 lines at a normal font size; margins and
/// inter-section spacing leave about 45 usable lines. Text wraps at ~80 characters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub lines_per_page: u16,
    pub chars_per_line: u16,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            lines_per_page: 45,
            chars_per_line: 80,
        }
    }
}
