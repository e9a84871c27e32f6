//! Extension registry
//!
//! Extensions plug into three seams without the core knowing their
//! identities: syntax recognition during normalization, a tree-rewriting
//! pass in the transformer pipeline, and per-kind render hooks for the
//! Markdown and HTML renderers.
//!
//! There is no process-wide registry. An `ExtensionSet` is an explicit
//! value scoped to one parser configuration and passed into normalizers,
//! the pipeline, and renderers.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::node::Node;

/// Outcome of a successful `recognize` call
#[derive(Debug, Clone)]
pub struct Recognized {
    /// Custom kind the matched span becomes
    pub kind: String,
    /// Bytes consumed from the recognition position, delimiters included
    pub consumed: usize,
    /// Literal content for the produced node (e.g. the key text inside
    /// `++Ctrl+C++`), if the kind carries text
    pub text: Option<String>,
    /// Attributes for the produced node
    pub attrs: Vec<(String, String)>,
}

/// A syntax/transform/render extension
///
/// Every hook has a no-op default, so an extension implements only the
/// seams it needs.
pub trait Extension: Send + Sync {
    /// Stable name, used in `TransformationError` and logging
    fn name(&self) -> &'static str;

    /// Ascending priority; lower runs first. Ties keep registration order.
    fn priority(&self) -> i32 {
        100
    }

    /// Custom node kinds this extension introduces
    fn kinds(&self) -> &[&'static str] {
        &[]
    }

    /// Try to recognize extension syntax at `pos` (a char boundary) in
    /// `text`. Consulted by normalizers before default text handling;
    /// the first matching extension wins.
    fn recognize(&self, _text: &str, _pos: usize) -> Option<Recognized> {
        None
    }

    /// Tree-rewriting pass run during the transformer pipeline. Receives
    /// the full document and sees the cumulative effect of
    /// earlier-priority extensions.
    fn transform(&self, _doc: &mut Node) -> Result<()> {
        Ok(())
    }

    /// Canonical Markdown for a node of one of this extension's kinds.
    /// `children` is the already-rendered content of the node's children.
    fn render_markdown(&self, _node: &Node, _children: &str) -> Option<String> {
        None
    }

    /// HTML for a node of one of this extension's kinds
    fn render_html(&self, _node: &Node, _children: &str) -> Option<String> {
        None
    }
}

/// An ordered set of extensions
///
/// Kept sorted by ascending priority with stable registration order for
/// ties; the order governs recognition precedence and transform-pass
/// order alike.
#[derive(Clone, Default)]
pub struct ExtensionSet {
    items: Vec<Arc<dyn Extension>>,
}

impl ExtensionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, extension: Arc<dyn Extension>) {
        debug!(name = extension.name(), priority = extension.priority(), "registered extension");
        let priority = extension.priority();
        // stable insert keeps registration order within a priority
        let at = self
            .items
            .iter()
            .position(|e| e.priority() > priority)
            .unwrap_or(self.items.len());
        self.items.insert(at, extension);
    }

    pub fn with(mut self, extension: Arc<dyn Extension>) -> Self {
        self.register(extension);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Extension>> {
        self.items.iter()
    }

    /// First extension recognizing syntax at `pos`
    pub fn recognize_at(&self, text: &str, pos: usize) -> Option<(&Arc<dyn Extension>, Recognized)> {
        self.items
            .iter()
            .find_map(|ext| ext.recognize(text, pos).map(|hit| (ext, hit)))
    }

    /// Extension providing a Markdown render hook for `kind`
    pub fn markdown_hook(&self, kind: &str) -> Option<&Arc<dyn Extension>> {
        self.items.iter().find(|ext| ext.kinds().contains(&kind))
    }

    /// Extension providing an HTML render hook for `kind`
    pub fn html_hook(&self, kind: &str) -> Option<&Arc<dyn Extension>> {
        self.items.iter().find(|ext| ext.kinds().contains(&kind))
    }

    /// Split literal text into text nodes and recognized custom nodes.
    ///
    /// `span_start` is the byte offset of `text` within the source; when
    /// known, every produced node gets a span so recognized syntax
    /// round-trips byte-exactly. Returns `None` when nothing matched, so
    /// the caller keeps its single text node.
    pub fn split_text(&self, text: &str, span_start: Option<usize>) -> Option<Vec<Node>> {
        if self.items.is_empty() {
            return None;
        }

        let mut nodes = Vec::new();
        let mut segment_start = 0;
        let mut pos = 0;

        while pos < text.len() {
            match self.recognize_at(text, pos) {
                Some((ext, hit)) if hit.consumed > 0 => {
                    debug!(name = ext.name(), kind = %hit.kind, at = pos, "recognized extension syntax");
                    if segment_start < pos {
                        nodes.push(text_node(text, segment_start..pos, span_start));
                    }
                    let mut node = Node::custom(hit.kind);
                    if let Some(content) = hit.text {
                        node = node.with_text(content);
                    }
                    for (key, value) in hit.attrs {
                        node = node.with_attr(key, value);
                    }
                    if let Some(base) = span_start {
                        node = node.with_span(base + pos..base + pos + hit.consumed);
                    }
                    nodes.push(node);
                    pos += hit.consumed;
                    segment_start = pos;
                }
                _ => {
                    pos += text[pos..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }

        if nodes.is_empty() {
            return None;
        }
        if segment_start < text.len() {
            nodes.push(text_node(text, segment_start..text.len(), span_start));
        }
        Some(nodes)
    }
}

impl std::fmt::Debug for ExtensionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.items.iter().map(|e| e.name()))
            .finish()
    }
}

fn text_node(text: &str, range: std::ops::Range<usize>, span_start: Option<usize>) -> Node {
    let mut node = Node::text(&text[range.clone()]);
    if let Some(base) = span_start {
        node = node.with_span(base + range.start..base + range.end);
    }
    node
}
