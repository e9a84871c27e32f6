//! Backend normalizers
//!
//! Two structurally different parser backends feed the unified node
//! model:
//! - `pulldown` — pulldown-cmark's flat event stream with byte offsets;
//!   nesting is reconstructed from Start/End pairing and every marker run
//!   is recovered by slicing the source at event offsets
//! - `markdown_it` — markdown-it's native tree; node values map 1:1 onto
//!   unified kinds and srcmap spans fill the gaps the native
//!   representation leaves (delimiter characters, fence runs)
//!
//! Both normalizers are all-or-nothing: either the whole document
//! normalizes into a clean tree, or a `ParseError` comes back and no tree
//! does.

pub mod markdown_it;
pub mod pulldown;
mod span;

use serde::{Deserialize, Serialize};
use tracing::debug;

use mdtrip_core::{ExtensionSet, Node, Result};

pub use crate::markdown_it::MarkdownItBackend;
pub use crate::pulldown::PulldownBackend;

/// Which parser backend to normalize through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// pulldown-cmark: flat offset-annotated event stream
    Pulldown,
    /// markdown-it: native tree with source maps
    MarkdownIt,
}

/// Syntax switches shared by both backends
///
/// Not every backend honors every switch; see [`Capabilities`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    /// Parse trailing `{#id}` heading attribute blocks
    pub heading_attributes: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
            heading_attributes: true,
        }
    }
}

/// What a backend actually supports
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub name: &'static str,
    pub tables: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub heading_attributes: bool,
}

/// A parser backend normalized into the unified node model
pub trait BackendParser {
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    /// Parse `source` and normalize the backend's native output into a
    /// clean document tree. Extension recognizers run before default
    /// text handling.
    fn normalize(&self, source: &str, extensions: &ExtensionSet) -> Result<Node>;
}

/// Construct the backend selected by `backend`
pub fn backend_for(backend: Backend, options: ParserOptions) -> Box<dyn BackendParser> {
    match backend {
        Backend::Pulldown => Box::new(PulldownBackend::new(options)),
        Backend::MarkdownIt => Box::new(MarkdownItBackend::new(options)),
    }
}

/// One-call parse: normalize `source` through the selected backend
pub fn parse_markdown(
    source: &str,
    backend: Backend,
    options: &ParserOptions,
    extensions: &ExtensionSet,
) -> Result<Node> {
    debug!(backend = ?backend, bytes = source.len(), "parsing markdown");
    backend_for(backend, options.clone()).normalize(source, extensions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_capabilities_differ() {
        let pd = backend_for(Backend::Pulldown, ParserOptions::default());
        let mi = backend_for(Backend::MarkdownIt, ParserOptions::default());
        assert!(pd.capabilities().tables);
        assert!(!mi.capabilities().tables);
    }

    #[test]
    fn test_both_backends_agree_on_structure() {
        let src = "# Title\n\nSome *emphasis* here.\n";
        let exts = ExtensionSet::new();
        let a = parse_markdown(src, Backend::Pulldown, &ParserOptions::default(), &exts).unwrap();
        let b = parse_markdown(src, Backend::MarkdownIt, &ParserOptions::default(), &exts).unwrap();

        assert_eq!(a.children().len(), b.children().len());
        assert_eq!(a.child(0).unwrap().kind(), b.child(0).unwrap().kind());
        assert_eq!(a.child(0).unwrap().level(), Some(1));
        assert_eq!(b.child(0).unwrap().level(), Some(1));
    }
}
