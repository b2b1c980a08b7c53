pub mod html;
pub mod preview;

pub use preview::{render_document, render_preview, Preview};
