//! pulldown-cmark backend
//!
//! pulldown-cmark emits a flat event stream; `into_offset_iter` pairs
//! every event with its byte range. The normalizer keeps a frame stack
//! mirroring the open Start tags, recovers marker characters by slicing
//! the source at event offsets, and records trimmed spans so unedited
//! regions can later be replayed verbatim.

use std::ops::Range;
use std::sync::Arc;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, LinkType, Options, Parser, Tag};
use tracing::warn;

use mdtrip_core::{ExtensionSet, HeadingStyle, MdtripError, Node, NodeKind, Result};

use crate::span;
use crate::{BackendParser, Capabilities, ParserOptions};

pub struct PulldownBackend {
    options: ParserOptions,
}

impl PulldownBackend {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    fn backend_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.options.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.options.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.options.tasklists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.options.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        opts
    }
}

impl BackendParser for PulldownBackend {
    fn name(&self) -> &'static str {
        "pulldown"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            name: "pulldown",
            tables: true,
            strikethrough: true,
            tasklists: true,
            heading_attributes: true,
        }
    }

    fn normalize(&self, source: &str, extensions: &ExtensionSet) -> Result<Node> {
        let mut builder = TreeBuilder::new(source, extensions);
        for (event, range) in Parser::new_ext(source, self.backend_options()).into_offset_iter() {
            builder.handle(event, range)?;
        }
        builder.finish()
    }
}

/// One open Start tag awaiting its End
struct Frame {
    node: Node,
    children: Vec<Node>,
    range: Range<usize>,
    /// Accumulated literal content for code and raw HTML frames
    text: String,
    literal: bool,
    discard: bool,
    /// List frames: a paragraph appeared directly inside an item
    loose: bool,
}

impl Frame {
    fn new(node: Node, range: Range<usize>) -> Self {
        Self {
            node,
            children: Vec::new(),
            range,
            text: String::new(),
            literal: false,
            discard: false,
            loose: false,
        }
    }

    fn literal(mut self) -> Self {
        self.literal = true;
        self
    }

    fn discard(mut self) -> Self {
        self.discard = true;
        self
    }
}

struct TreeBuilder<'a> {
    source: &'a str,
    extensions: &'a ExtensionSet,
    stack: Vec<Frame>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str, extensions: &'a ExtensionSet) -> Self {
        Self {
            source,
            extensions,
            stack: vec![Frame::new(Node::document(), 0..source.len())],
        }
    }

    fn handle(&mut self, event: Event<'_>, range: Range<usize>) -> Result<()> {
        match event {
            Event::Start(tag) => self.start(tag, range),
            // End variants always pair with the innermost open Start, so
            // popping unconditionally keeps the stack balanced without
            // matching each TagEnd.
            Event::End(_) => return self.end(),
            Event::Text(text) => self.text(text.as_ref(), range),
            Event::Code(code) => {
                let slice = &self.source[range.clone()];
                let run = slice.chars().take_while(|&c| c == '`').count().max(1);
                let mut node = Node::code_inline(code.as_ref()).with_span(range);
                node.hints_mut().marker = Some('`');
                node.hints_mut().marker_len = Some(run);
                self.push(node);
            }
            Event::Html(html) => {
                // raw lines inside an open html_block frame
                if self.top_literal() {
                    self.append_text(html.as_ref());
                } else {
                    self.push(
                        Node::new(NodeKind::HtmlBlock)
                            .with_text(html.as_ref())
                            .with_span(span::trim_trailing_newlines(self.source, range)),
                    );
                }
            }
            Event::InlineHtml(html) => {
                self.push(Node::new(NodeKind::HtmlInline).with_text(html.as_ref()).with_span(range));
            }
            Event::SoftBreak | Event::HardBreak => {
                self.push(Node::text("\n").with_span(range));
            }
            Event::Rule => {
                let slice = &self.source[span::trim_trailing_newlines(self.source, range.clone())];
                let marker = slice.chars().find(|c| matches!(c, '-' | '_' | '*'));
                let mut node = Node::new(NodeKind::ThematicBreak)
                    .with_span(span::trim_trailing_newlines(self.source, range));
                node.hints_mut().marker = marker;
                node.hints_mut().marker_len =
                    marker.map(|m| slice.chars().filter(|&c| c == m).count());
                self.push(node);
            }
            Event::TaskListMarker(checked) => {
                if let Some(item) = self
                    .stack
                    .iter_mut()
                    .rev()
                    .find(|f| *f.node.kind() == NodeKind::ListItem)
                {
                    let node = std::mem::replace(&mut item.node, Node::list_item());
                    item.node = node.with_attr("checked", if checked { "true" } else { "false" });
                }
            }
            other => {
                warn!(event = ?other, "skipping unsupported event");
            }
        }
        Ok(())
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let frame = match tag {
            Tag::Paragraph => {
                self.mark_enclosing_list_loose();
                Frame::new(Node::paragraph(), range)
            }
            Tag::Heading { level, id, classes, attrs } => {
                let mut node = Node::heading(level as u8);
                if let Some(id) = id {
                    node = node.with_attr("id", id.to_string());
                }
                if !classes.is_empty() {
                    let joined = classes.iter().map(|c| c.as_ref()).collect::<Vec<_>>().join(" ");
                    node = node.with_attr("class", joined);
                }
                for (key, value) in attrs {
                    node = node.with_attr(key.to_string(), value.map(|v| v.to_string()).unwrap_or_default());
                }
                let slice = &self.source[span::trim_trailing_newlines(self.source, range.clone())];
                if slice.trim_start().starts_with('#') {
                    node.hints_mut().heading_style = Some(HeadingStyle::Atx);
                } else {
                    node.hints_mut().heading_style = Some(HeadingStyle::Setext);
                    if let Some(underline) = slice.lines().last() {
                        let trimmed = underline.trim();
                        node.hints_mut().marker = trimmed.chars().next();
                        node.hints_mut().marker_len = Some(trimmed.chars().count());
                    }
                }
                Frame::new(node, range)
            }
            Tag::BlockQuote(_) => Frame::new(Node::new(NodeKind::BlockQuote), range),
            Tag::CodeBlock(kind) => {
                let mut node = match kind {
                    CodeBlockKind::Fenced(info) => {
                        let info = info.to_string();
                        let mut node = Node::code_block("", info.split_whitespace().next());
                        node.hints_mut().fenced = Some(true);
                        if !info.is_empty() {
                            node.hints_mut().info = Some(info);
                        }
                        if let Some((marker, run, _)) = span::fence_open(&self.source[range.clone()]) {
                            node.hints_mut().marker = Some(marker);
                            node.hints_mut().marker_len = Some(run);
                        }
                        node
                    }
                    CodeBlockKind::Indented => {
                        let mut node = Node::code_block("", None);
                        node.hints_mut().fenced = Some(false);
                        node
                    }
                };
                node = node.with_text("");
                Frame::new(node, range).literal()
            }
            Tag::List(start) => {
                let node = match start {
                    Some(n) => Node::list(true).with_attr("start", n.to_string()),
                    None => Node::list(false),
                };
                Frame::new(node, range)
            }
            Tag::Item => {
                let mut node = Node::list_item();
                let (marker, width) = span::list_marker_hints(&self.source[range.clone()]);
                node.hints_mut().marker = marker;
                node.hints_mut().marker_width = width;
                Frame::new(node, range)
            }
            Tag::Table(alignments) => {
                let joined = alignments
                    .iter()
                    .map(|a| match a {
                        Alignment::Left => "left",
                        Alignment::Center => "center",
                        Alignment::Right => "right",
                        Alignment::None => "none",
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                Frame::new(Node::new(NodeKind::Table).with_attr("alignments", joined), range)
            }
            Tag::TableHead => {
                Frame::new(Node::new(NodeKind::TableRow).with_attr("header", "true"), range)
            }
            Tag::TableRow => Frame::new(Node::new(NodeKind::TableRow), range),
            Tag::TableCell => Frame::new(Node::new(NodeKind::TableCell), range),
            Tag::Emphasis => {
                let mut node = Node::new(NodeKind::Emphasis);
                node.hints_mut().marker = self.source[range.clone()].chars().next().filter(|c| matches!(c, '*' | '_'));
                Frame::new(node, range)
            }
            Tag::Strong => {
                let mut node = Node::new(NodeKind::Strong);
                node.hints_mut().marker = self.source[range.clone()].chars().next().filter(|c| matches!(c, '*' | '_'));
                Frame::new(node, range)
            }
            Tag::Strikethrough => {
                let mut node = Node::custom("strikethrough");
                node.hints_mut().marker = Some('~');
                node.hints_mut().marker_len = Some(2);
                Frame::new(node, range)
            }
            Tag::Link { link_type, dest_url, title, .. } => {
                let mut node = Node::link(dest_url.to_string());
                if !title.is_empty() {
                    node = node.with_attr("title", title.to_string());
                }
                if matches!(link_type, LinkType::Autolink | LinkType::Email) {
                    node.hints_mut().marker = Some('<');
                }
                Frame::new(node, range)
            }
            Tag::Image { dest_url, title, .. } => {
                let mut node = Node::image(dest_url.to_string(), "");
                if !title.is_empty() {
                    node = node.with_attr("title", title.to_string());
                }
                Frame::new(node, range)
            }
            Tag::HtmlBlock => Frame::new(Node::new(NodeKind::HtmlBlock), range).literal(),
            other => {
                warn!(tag = ?other, "skipping unsupported block construct");
                Frame::new(Node::document(), range).discard()
            }
        };
        self.stack.push(frame);
    }

    fn end(&mut self) -> Result<()> {
        let Some(frame) = self.stack.pop() else {
            return Err(MdtripError::parse_at(self.source, 0, "unbalanced end event"));
        };
        if self.stack.is_empty() {
            return Err(MdtripError::parse_at(self.source, frame.range.start, "unbalanced end event"));
        }
        if frame.discard {
            return Ok(());
        }
        let node = self.close_frame(frame)?;
        self.push(node);
        Ok(())
    }

    fn close_frame(&self, frame: Frame) -> Result<Node> {
        let Frame { mut node, children, range, text, loose, .. } = frame;
        let raw = &self.source[range.clone()];

        match node.kind().clone() {
            NodeKind::CodeBlock => {
                if node.hints().fenced == Some(true) && !span::fenced_block_closed(raw) {
                    return Err(MdtripError::parse_at(
                        self.source,
                        range.start,
                        "unterminated code fence",
                    ));
                }
                node = node.with_text(text);
            }
            NodeKind::HtmlBlock => {
                node = node.with_text(text);
            }
            NodeKind::Image => {
                let alt: String = children.iter().map(Node::collect_text).collect();
                node = node.with_attr("alt", alt);
            }
            NodeKind::List => {
                node = node.with_children(children);
                node.hints_mut().tight = Some(!loose);
            }
            NodeKind::ListItem => {
                node = node.with_children(wrap_inline_runs(children));
            }
            _ => {
                node = node.with_children(children);
            }
        }

        let span = if node.kind().is_inline() {
            range
        } else {
            span::trim_trailing_newlines(self.source, range)
        };
        Ok(node.with_span(span))
    }

    fn text(&mut self, text: &str, range: Range<usize>) {
        if self.top_literal() {
            self.append_text(text);
        } else if let Some(nodes) = self.extensions.split_text(text, Some(range.start)) {
            for node in nodes {
                self.push(node);
            }
        } else {
            self.push(Node::text(text).with_span(range));
        }
    }

    fn push(&mut self, node: Node) {
        if let Some(top) = self.stack.last_mut() {
            top.children.push(node);
        }
    }

    fn top_literal(&self) -> bool {
        self.stack.last().is_some_and(|f| f.literal)
    }

    fn append_text(&mut self, text: &str) {
        if let Some(top) = self.stack.last_mut() {
            top.text.push_str(text);
        }
    }

    /// A paragraph directly inside a list item means the enclosing list
    /// is loose.
    fn mark_enclosing_list_loose(&mut self) {
        if self.stack.last().map(|f| f.node.kind()) != Some(&NodeKind::ListItem) {
            return;
        }
        if let Some(list) = self
            .stack
            .iter_mut()
            .rev()
            .find(|f| *f.node.kind() == NodeKind::List)
        {
            list.loose = true;
        }
    }

    fn finish(mut self) -> Result<Node> {
        let Some(root) = self.stack.pop() else {
            return Err(MdtripError::parse_at(self.source, 0, "empty builder stack"));
        };
        if !self.stack.is_empty() {
            return Err(MdtripError::parse_at(
                self.source,
                root.range.start,
                "unclosed block at end of input",
            ));
        }
        let mut doc = root.node.with_children(root.children).with_span(0..self.source.len());
        doc.hints_mut().source = Some(Arc::from(self.source));
        Ok(doc)
    }
}

/// Tight list items carry their inline content bare; wrap each run of
/// inline nodes in a paragraph so item children are always blocks.
fn wrap_inline_runs(children: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    let mut run: Vec<Node> = Vec::new();
    for child in children {
        let inline = child.kind().is_inline() || matches!(child.kind(), NodeKind::Custom(_));
        if inline {
            run.push(child);
        } else {
            flush_run(&mut run, &mut out);
            out.push(child);
        }
    }
    flush_run(&mut run, &mut out);
    out
}

fn flush_run(run: &mut Vec<Node>, out: &mut Vec<Node>) {
    if run.is_empty() {
        return;
    }
    let span = match (
        run.first().and_then(|n| n.hints().span.clone()),
        run.last().and_then(|n| n.hints().span.clone()),
    ) {
        (Some(first), Some(last)) => Some(first.start..last.end),
        _ => None,
    };
    let mut para = Node::paragraph().with_children(std::mem::take(run));
    if let Some(span) = span {
        para = para.with_span(span);
    }
    out.push(para);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Backend;

    fn parse(src: &str) -> Node {
        crate::parse_markdown(src, Backend::Pulldown, &ParserOptions::default(), &ExtensionSet::new())
            .unwrap()
    }

    #[test]
    fn test_basic_document() {
        let doc = parse("# Title\n\nBody text.\n");
        assert_eq!(doc.children().len(), 2);
        assert_eq!(*doc.child(0).unwrap().kind(), NodeKind::Heading);
        assert_eq!(doc.child(0).unwrap().level(), Some(1));
        assert_eq!(*doc.child(1).unwrap().kind(), NodeKind::Paragraph);
        assert!(doc.is_clean_deep());
        assert_eq!(doc.hints().source.as_deref(), Some("# Title\n\nBody text.\n"));
    }

    #[test]
    fn test_block_spans_are_trimmed() {
        let doc = parse("# Title\n\nBody.\n");
        assert_eq!(doc.child(0).unwrap().hints().span, Some(0..7));
        assert_eq!(doc.child(1).unwrap().hints().span, Some(9..14));
    }

    #[test]
    fn test_heading_style_hints() {
        let doc = parse("Title\n=====\n\n## Sub\n");
        let setext = doc.child(0).unwrap();
        assert_eq!(setext.hints().heading_style, Some(HeadingStyle::Setext));
        assert_eq!(setext.hints().marker, Some('='));
        assert_eq!(setext.level(), Some(1));

        let atx = doc.child(1).unwrap();
        assert_eq!(atx.hints().heading_style, Some(HeadingStyle::Atx));
        assert_eq!(atx.level(), Some(2));
    }

    #[test]
    fn test_heading_attribute_id() {
        let doc = parse("# Intro {#intro}\n");
        assert_eq!(doc.child(0).unwrap().attr("id"), Some("intro"));
    }

    #[test]
    fn test_fenced_code_block() {
        let doc = parse("```rust\nfn main() {}\n```\n");
        let code = doc.child(0).unwrap();
        assert_eq!(*code.kind(), NodeKind::CodeBlock);
        assert_eq!(code.attr("language"), Some("rust"));
        assert_eq!(code.text_content(), Some("fn main() {}\n"));
        assert_eq!(code.hints().fenced, Some(true));
        assert_eq!(code.hints().marker, Some('`'));
        assert_eq!(code.hints().marker_len, Some(3));
    }

    #[test]
    fn test_unterminated_fence_is_an_error() {
        let err = crate::parse_markdown(
            "before\n\n```rust\nfn broken(\n",
            Backend::Pulldown,
            &ParserOptions::default(),
            &ExtensionSet::new(),
        )
        .unwrap_err();
        assert!(matches!(err, MdtripError::Parse { line: 3, .. }), "{err}");
        assert!(err.to_string().contains("unterminated code fence"));
    }

    #[test]
    fn test_tight_list_wraps_inline_in_paragraphs() {
        let doc = parse("- one\n- two\n");
        let list = doc.child(0).unwrap();
        assert_eq!(*list.kind(), NodeKind::List);
        assert_eq!(list.hints().tight, Some(true));
        assert_eq!(list.children().len(), 2);
        let item = list.child(0).unwrap();
        assert_eq!(*item.child(0).unwrap().kind(), NodeKind::Paragraph);
        assert_eq!(item.hints().marker, Some('-'));
        assert_eq!(item.hints().marker_width, Some(2));
    }

    #[test]
    fn test_loose_list_detected() {
        let doc = parse("- one\n\n- two\n");
        assert_eq!(doc.child(0).unwrap().hints().tight, Some(false));
    }

    #[test]
    fn test_ordered_list_start_and_marker() {
        let doc = parse("3. three\n4. four\n");
        let list = doc.child(0).unwrap();
        assert_eq!(list.attr("ordered"), Some("true"));
        assert_eq!(list.attr("start"), Some("3"));
        assert_eq!(list.child(0).unwrap().hints().marker, Some('.'));
    }

    #[test]
    fn test_task_list_marker_sets_checked() {
        let doc = parse("- [x] done\n- [ ] open\n");
        let list = doc.child(0).unwrap();
        assert_eq!(list.child(0).unwrap().attr("checked"), Some("true"));
        assert_eq!(list.child(1).unwrap().attr("checked"), Some("false"));
    }

    #[test]
    fn test_table_structure() {
        let doc = parse("| a | b |\n|---|:-:|\n| 1 | 2 |\n");
        let table = doc.child(0).unwrap();
        assert_eq!(*table.kind(), NodeKind::Table);
        assert_eq!(table.attr("alignments"), Some("none,center"));
        assert_eq!(table.children().len(), 2);
        assert_eq!(table.child(0).unwrap().attr("header"), Some("true"));
        assert_eq!(table.child(1).unwrap().children().len(), 2);
    }

    #[test]
    fn test_emphasis_markers_recovered() {
        let doc = parse("*a* and __b__\n");
        let para = doc.child(0).unwrap();
        let em = para.child(0).unwrap();
        assert_eq!(*em.kind(), NodeKind::Emphasis);
        assert_eq!(em.hints().marker, Some('*'));
        let strong = para.child(2).unwrap();
        assert_eq!(*strong.kind(), NodeKind::Strong);
        assert_eq!(strong.hints().marker, Some('_'));
    }

    #[test]
    fn test_strikethrough_becomes_custom_node() {
        let doc = parse("~~gone~~\n");
        let node = doc.child(0).unwrap().child(0).unwrap();
        assert_eq!(node.kind().as_str(), "strikethrough");
        assert_eq!(node.collect_text(), "gone");
    }

    #[test]
    fn test_image_alt_collapsed() {
        let doc = parse("![an *image*](pic.png)\n");
        let image = doc.child(0).unwrap().child(0).unwrap();
        assert_eq!(*image.kind(), NodeKind::Image);
        assert_eq!(image.attr("src"), Some("pic.png"));
        assert_eq!(image.attr("alt"), Some("an image"));
        assert!(image.children().is_empty());
    }

    #[test]
    fn test_breaks_normalize_to_newline_text() {
        let doc = parse("line one\nline two\n");
        let para = doc.child(0).unwrap();
        assert_eq!(para.children().len(), 3);
        assert_eq!(para.child(1).unwrap().text_content(), Some("\n"));
    }

    #[test]
    fn test_extension_recognition_in_text() {
        use mdtrip_core::{Extension, Recognized};
        use std::sync::Arc as StdArc;

        struct Kbd;
        impl Extension for Kbd {
            fn name(&self) -> &'static str {
                "kbd"
            }
            fn kinds(&self) -> &[&'static str] {
                &["kbd"]
            }
            fn recognize(&self, text: &str, pos: usize) -> Option<Recognized> {
                let rest = text[pos..].strip_prefix("++")?;
                let end = rest.find("++").filter(|&e| e > 0)?;
                Some(Recognized {
                    kind: "kbd".into(),
                    consumed: end + 4,
                    text: Some(rest[..end].to_string()),
                    attrs: Vec::new(),
                })
            }
        }

        let exts = ExtensionSet::new().with(StdArc::new(Kbd));
        let doc = crate::parse_markdown(
            "Press ++Ctrl+C++ to stop.\n",
            Backend::Pulldown,
            &ParserOptions::default(),
            &exts,
        )
        .unwrap();
        let para = doc.child(0).unwrap();
        assert_eq!(para.children().len(), 3);
        let kbd = para.child(1).unwrap();
        assert_eq!(kbd.kind().as_str(), "kbd");
        assert_eq!(kbd.text_content(), Some("Ctrl+C"));
        assert_eq!(kbd.hints().span, Some(6..16));
    }

    #[test]
    fn test_blockquote_and_rule() {
        let doc = parse("> quoted\n\n---\n");
        assert_eq!(*doc.child(0).unwrap().kind(), NodeKind::BlockQuote);
        let rule = doc.child(1).unwrap();
        assert_eq!(*rule.kind(), NodeKind::ThematicBreak);
        assert_eq!(rule.hints().marker, Some('-'));
        assert_eq!(rule.hints().marker_len, Some(3));
    }
}
