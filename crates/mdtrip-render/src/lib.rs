//! Renderers for the unified document tree
//!
//! Markdown output is fidelity-preserving: unedited regions replay their
//! original source bytes, edits fall back to canonical formatting. HTML
//! and JSON output are always canonical.

pub mod html;
pub mod json;
pub mod markdown;

pub use html::render_html;
pub use json::{render_json, render_json_pretty};
pub use markdown::{render_markdown, render_markdown_with, MarkdownRenderOptions};
