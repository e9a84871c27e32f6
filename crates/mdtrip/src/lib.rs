//! mdtrip: parse Markdown into a unified mutable tree, transform it, and
//! render it back without disturbing untouched formatting.
//!
//! ```
//! let mut doc = mdtrip::parse("# Title\n\nBody.\n").unwrap();
//! doc.child_mut(0).unwrap().set_level(2);
//! assert_eq!(mdtrip::render_markdown(&doc).unwrap(), "## Title\n\nBody.\n");
//! ```
//!
//! The one-call functions here use the pulldown backend and the bundled
//! extension set. The re-exported crate surfaces expose every knob:
//! backend selection, parser options, extension registration, pipelines,
//! and canonical-output options.

pub use mdtrip_core::{
    line_col, validate_tree, Extension, ExtensionSet, FormatHints, HeadingStyle, MdtripError,
    Node, NodeKind, Recognized, Result,
};
pub use mdtrip_extensions::{standard_set, Kbd, Strikethrough, TaskList};
pub use mdtrip_parser::{
    backend_for, parse_markdown, Backend, BackendParser, Capabilities, MarkdownItBackend,
    ParserOptions, PulldownBackend,
};
pub use mdtrip_render::{render_json, render_json_pretty, MarkdownRenderOptions};
pub use mdtrip_transform::{
    slugify, ExtensionPass, IdGenerator, IdRegistry, NormalizeHeadings, Pipeline, ShiftHeadings,
    TocGenerator, Transform,
};

/// Parse with the pulldown backend, default options, and the bundled
/// extensions
pub fn parse(source: &str) -> Result<Node> {
    mdtrip_parser::parse_markdown(
        source,
        Backend::Pulldown,
        &ParserOptions::default(),
        &standard_set(),
    )
}

/// Render Markdown with the bundled extensions and default canonical
/// options
pub fn render_markdown(doc: &Node) -> Result<String> {
    mdtrip_render::render_markdown(doc, &standard_set())
}

pub fn render_markdown_with(
    doc: &Node,
    extensions: &ExtensionSet,
    options: &MarkdownRenderOptions,
) -> Result<String> {
    mdtrip_render::render_markdown_with(doc, extensions, options)
}

/// Render HTML with the bundled extensions
pub fn render_html(doc: &Node) -> Result<String> {
    mdtrip_render::render_html(doc, &standard_set())
}

pub fn render_html_with(doc: &Node, extensions: &ExtensionSet) -> Result<String> {
    mdtrip_render::render_html(doc, extensions)
}
