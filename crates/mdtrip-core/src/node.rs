//! The unified node model
//!
//! A document is a tree of `Node` values rooted at a single
//! `NodeKind::Document`. Ownership is strictly hierarchical: every node
//! owns its children, there is no sharing and no parent back-pointers.
//! Node identity is positional.
//!
//! Two construction surfaces exist on purpose:
//! - builder-style constructors (`Node::heading(2).with_attr(..)`) leave
//!   the node clean; normalizers use these so a freshly parsed tree is
//!   entirely clean and renders byte-identically to its source
//! - mutators (`set_text`, `set_attr`, `insert_child`, ...) flip dirty
//!   flags; transformers use these and the fidelity renderer falls back
//!   to canonical output exactly where edits happened

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Semantic role of a node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Heading,
    Paragraph,
    Text,
    Emphasis,
    Strong,
    Link,
    Image,
    List,
    ListItem,
    CodeBlock,
    CodeInline,
    BlockQuote,
    ThematicBreak,
    HtmlBlock,
    HtmlInline,
    Table,
    TableRow,
    TableCell,
    /// Extension-registered kind, keyed by the string the extension chose
    Custom(String),
}

impl NodeKind {
    /// Snake_case tag for this kind, as used in JSON output and error
    /// messages. Custom kinds return the extension's key.
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Heading => "heading",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Text => "text",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::Link => "link",
            NodeKind::Image => "image",
            NodeKind::List => "list",
            NodeKind::ListItem => "list_item",
            NodeKind::CodeBlock => "code_block",
            NodeKind::CodeInline => "code_inline",
            NodeKind::BlockQuote => "block_quote",
            NodeKind::ThematicBreak => "thematic_break",
            NodeKind::HtmlBlock => "html_block",
            NodeKind::HtmlInline => "html_inline",
            NodeKind::Table => "table",
            NodeKind::TableRow => "table_row",
            NodeKind::TableCell => "table_cell",
            NodeKind::Custom(kind) => kind,
        }
    }

    /// Leaf kinds never carry children
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::Text
                | NodeKind::Image
                | NodeKind::CodeBlock
                | NodeKind::CodeInline
                | NodeKind::ThematicBreak
                | NodeKind::HtmlBlock
                | NodeKind::HtmlInline
        )
    }

    /// Kinds whose literal content lives in `text`
    pub fn carries_text(&self) -> bool {
        matches!(
            self,
            NodeKind::Text
                | NodeKind::CodeBlock
                | NodeKind::CodeInline
                | NodeKind::HtmlBlock
                | NodeKind::HtmlInline
                | NodeKind::Custom(_)
        )
    }

    /// Inline kinds may not appear as direct children of the document
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Text
                | NodeKind::Emphasis
                | NodeKind::Strong
                | NodeKind::Link
                | NodeKind::Image
                | NodeKind::CodeInline
                | NodeKind::HtmlInline
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Which heading syntax the source used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStyle {
    Atx,
    Setext,
}

/// Source-formatting metadata captured at normalization time
///
/// Populated by backend normalizers, consulted (never required) by the
/// fidelity renderer. Everything here is advisory: an empty `FormatHints`
/// simply means canonical output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormatHints {
    /// Byte span of this node in the original source. For block nodes the
    /// span is trimmed of trailing newlines so separators between siblings
    /// can be recovered from the text between spans.
    pub span: Option<Range<usize>>,
    /// Full source text; set on the document node only
    pub source: Option<Arc<str>>,
    /// Delimiter or marker character: `*`/`_` for emphasis, `-`/`*`/`+`
    /// for bullets, fence character, thematic break character, `<` for
    /// autolinks
    pub marker: Option<char>,
    /// Delimiter run length: fence length, inline-code backtick count,
    /// thematic break width
    pub marker_len: Option<usize>,
    /// ATX vs Setext for headings
    pub heading_style: Option<HeadingStyle>,
    /// Raw info string of a fenced code block
    pub info: Option<String>,
    /// Fenced (true) vs indented (false) code block
    pub fenced: Option<bool>,
    /// List tightness observed in the source
    pub tight: Option<bool>,
    /// Width of a list item's marker plus padding, used to indent nested
    /// block content
    pub marker_width: Option<usize>,
}

/// A node in the unified document tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
    #[serde(rename = "attributes", skip_serializing_if = "BTreeMap::is_empty")]
    attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<u8>,
    #[serde(skip)]
    hints: FormatHints,
    #[serde(skip)]
    dirty: bool,
}

impl Node {
    /// Create a clean node of the given kind
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            attrs: BTreeMap::new(),
            text: None,
            level: None,
            hints: FormatHints::default(),
            dirty: false,
        }
    }

    pub fn document() -> Self {
        Self::new(NodeKind::Document)
    }

    pub fn heading(level: u8) -> Self {
        let mut node = Self::new(NodeKind::Heading);
        node.level = Some(level);
        node
    }

    pub fn paragraph() -> Self {
        Self::new(NodeKind::Paragraph)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeKind::Text).with_text(content)
    }

    pub fn code_block(content: impl Into<String>, language: Option<&str>) -> Self {
        let node = Self::new(NodeKind::CodeBlock).with_text(content);
        match language {
            Some(lang) if !lang.is_empty() => node.with_attr("language", lang),
            _ => node,
        }
    }

    pub fn code_inline(content: impl Into<String>) -> Self {
        Self::new(NodeKind::CodeInline).with_text(content)
    }

    pub fn list(ordered: bool) -> Self {
        let node = Self::new(NodeKind::List);
        if ordered {
            node.with_attr("ordered", "true")
        } else {
            node
        }
    }

    pub fn list_item() -> Self {
        Self::new(NodeKind::ListItem)
    }

    pub fn link(href: impl Into<String>) -> Self {
        Self::new(NodeKind::Link).with_attr("href", href.into())
    }

    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::new(NodeKind::Image)
            .with_attr("src", src.into())
            .with_attr("alt", alt.into())
    }

    pub fn custom(kind: impl Into<String>) -> Self {
        Self::new(NodeKind::Custom(kind.into()))
    }

    // Builder surface: these do not flip the dirty flag, so normalizers
    // can assemble a fully clean tree.

    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.text = Some(content.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.hints.span = Some(span);
        self
    }

    // Read access

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    /// Mutable access to one child. Editing a child does not dirty this
    /// node; only membership changes do.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.children.get_mut(index)
    }

    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn level(&self) -> Option<u8> {
        self.level
    }

    pub fn hints(&self) -> &FormatHints {
        &self.hints
    }

    /// Hints are renderer-owned metadata; touching them does not dirty
    /// the node.
    pub fn hints_mut(&mut self) -> &mut FormatHints {
        &mut self.hints
    }

    // Mutation surface: every structural or content edit marks the edited
    // node dirty; adding or removing children marks the container dirty.

    pub fn set_text(&mut self, content: impl Into<String>) {
        self.text = Some(content.into());
        self.dirty = true;
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
        self.dirty = true;
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let removed = self.attrs.remove(key);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Set a heading level. The value is stored as given; range
    /// enforcement happens in validation, and clamping is the calling
    /// transformer's responsibility.
    pub fn set_level(&mut self, level: u8) {
        self.level = Some(level);
        self.dirty = true;
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
        self.dirty = true;
    }

    pub fn insert_child(&mut self, index: usize, child: Node) {
        self.children.insert(index, child);
        self.dirty = true;
    }

    pub fn remove_child(&mut self, index: usize) -> Node {
        self.dirty = true;
        self.children.remove(index)
    }

    /// Replace the child at `index` with zero or more nodes
    pub fn replace_child_with(&mut self, index: usize, replacement: Vec<Node>) {
        self.children.splice(index..index + 1, replacement);
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// True when neither this node nor any descendant has been mutated
    /// since normalization. The fidelity renderer emits the recorded
    /// source span only for clean-deep subtrees.
    pub fn is_clean_deep(&self) -> bool {
        !self.dirty && self.children.iter().all(Node::is_clean_deep)
    }

    // Tree helpers

    /// Depth-first walk over the subtree, this node first
    pub fn walk(&self, f: &mut impl FnMut(&Node)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Depth-first mutable walk. Dirty flags are only set by the
    /// mutations the callback performs.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    /// All nodes of one kind in the subtree, depth-first
    pub fn find_all(&self, kind: &NodeKind) -> Vec<&Node> {
        let mut out = Vec::new();
        collect_kind(self, kind, &mut out);
        out
    }

    /// Concatenated plain-text content of the subtree
    pub fn collect_text(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |node| {
            if let Some(text) = &node.text {
                out.push_str(text);
            }
        });
        out
    }
}

fn collect_kind<'a>(node: &'a Node, kind: &NodeKind, out: &mut Vec<&'a Node>) {
    if node.kind() == kind {
        out.push(node);
    }
    for child in node.children() {
        collect_kind(child, kind, out);
    }
}
