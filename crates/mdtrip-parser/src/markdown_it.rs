//! markdown-it backend
//!
//! markdown-it already builds a tree, so normalization is a recursive
//! conversion: each native node value is downcast with `cast` and mapped
//! onto a unified kind. The native values carry most format hints
//! directly (fence marker and run, emphasis delimiter, list marker);
//! srcmaps provide the byte spans.

use std::ops::Range;
use std::sync::Arc;

use markdown_it::parser::inline::{Text, TextSpecial};
use markdown_it::plugins::cmark::block::blockquote::Blockquote;
use markdown_it::plugins::cmark::block::code::CodeBlock;
use markdown_it::plugins::cmark::block::fence::CodeFence;
use markdown_it::plugins::cmark::block::heading::ATXHeading;
use markdown_it::plugins::cmark::block::hr::ThematicBreak;
use markdown_it::plugins::cmark::block::lheading::SetextHeader;
use markdown_it::plugins::cmark::block::list::{BulletList, ListItem, OrderedList};
use markdown_it::plugins::cmark::block::paragraph::Paragraph;
use markdown_it::plugins::cmark::inline::autolink::Autolink;
use markdown_it::plugins::cmark::inline::backticks::CodeInline;
use markdown_it::plugins::cmark::inline::emphasis::{Em, Strong};
use markdown_it::plugins::cmark::inline::image::Image;
use markdown_it::plugins::cmark::inline::link::Link;
use markdown_it::plugins::cmark::inline::newline::{Hardbreak, Softbreak};
use markdown_it::plugins::extra::strikethrough::Strikethrough;
use markdown_it::plugins::html::html_block::HtmlBlock;
use markdown_it::plugins::html::html_inline::HtmlInline;
use markdown_it::{MarkdownIt, Node as NativeNode};
use tracing::warn;

use mdtrip_core::{ExtensionSet, HeadingStyle, MdtripError, Node, NodeKind, Result};

use crate::span;
use crate::{BackendParser, Capabilities, ParserOptions};

pub struct MarkdownItBackend {
    options: ParserOptions,
}

impl MarkdownItBackend {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    fn build_parser(&self) -> MarkdownIt {
        let mut md = MarkdownIt::new();
        markdown_it::plugins::cmark::add(&mut md);
        markdown_it::plugins::html::add(&mut md);
        if self.options.strikethrough {
            markdown_it::plugins::extra::strikethrough::add(&mut md);
        }
        md
    }
}

impl BackendParser for MarkdownItBackend {
    fn name(&self) -> &'static str {
        "markdown_it"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            name: "markdown_it",
            tables: false,
            strikethrough: true,
            tasklists: false,
            heading_attributes: false,
        }
    }

    fn normalize(&self, source: &str, extensions: &ExtensionSet) -> Result<Node> {
        let root = self.build_parser().parse(source);
        let converter = Converter { source, extensions };

        let mut blocks = Vec::new();
        for child in &root.children {
            blocks.extend(converter.convert(child)?);
        }
        let mut doc = Node::document().with_children(blocks).with_span(0..source.len());
        doc.hints_mut().source = Some(Arc::from(source));
        Ok(doc)
    }
}

struct Converter<'a> {
    source: &'a str,
    extensions: &'a ExtensionSet,
}

impl Converter<'_> {
    /// Convert one native node. Returns zero nodes for constructs that
    /// have no counterpart and more than one when extension recognition
    /// splits a text node.
    fn convert(&self, native: &NativeNode) -> Result<Vec<Node>> {
        let raw_span = native.srcmap.map(|map| {
            let (start, end) = map.get_byte_offsets();
            start..end
        });

        if let Some(heading) = native.cast::<ATXHeading>() {
            let mut node = Node::heading(heading.level).with_children(self.children(native)?);
            node.hints_mut().heading_style = Some(HeadingStyle::Atx);
            return Ok(vec![self.spanned(node, raw_span)]);
        }
        if let Some(heading) = native.cast::<SetextHeader>() {
            let mut node = Node::heading(heading.level).with_children(self.children(native)?);
            node.hints_mut().heading_style = Some(HeadingStyle::Setext);
            node.hints_mut().marker = Some(heading.marker);
            return Ok(vec![self.spanned(node, raw_span)]);
        }
        if native.cast::<Paragraph>().is_some() {
            let node = Node::paragraph().with_children(self.children(native)?);
            return Ok(vec![self.spanned(node, raw_span)]);
        }
        if native.cast::<Blockquote>().is_some() {
            let node = Node::new(NodeKind::BlockQuote).with_children(self.children(native)?);
            return Ok(vec![self.spanned(node, raw_span)]);
        }
        if let Some(fence) = native.cast::<CodeFence>() {
            if let Some(range) = &raw_span {
                if !span::fenced_block_closed(&self.source[range.clone()]) {
                    return Err(MdtripError::parse_at(
                        self.source,
                        range.start,
                        "unterminated code fence",
                    ));
                }
            }
            let mut node =
                Node::code_block(fence.content.clone(), fence.info.split_whitespace().next());
            node.hints_mut().fenced = Some(true);
            node.hints_mut().marker = Some(fence.marker);
            node.hints_mut().marker_len = Some(fence.marker_len);
            if !fence.info.is_empty() {
                node.hints_mut().info = Some(fence.info.clone());
            }
            return Ok(vec![self.spanned(node, raw_span)]);
        }
        if let Some(code) = native.cast::<CodeBlock>() {
            let mut node = Node::code_block(code.content.clone(), None);
            node.hints_mut().fenced = Some(false);
            return Ok(vec![self.spanned(node, raw_span)]);
        }
        if let Some(list) = native.cast::<BulletList>() {
            let mut node = Node::list(false).with_children(self.children(native)?);
            node.hints_mut().marker = Some(list.marker);
            node.hints_mut().tight = Some(self.items_are_tight(native));
            return Ok(vec![self.spanned(node, raw_span)]);
        }
        if let Some(list) = native.cast::<OrderedList>() {
            let mut node = Node::list(true)
                .with_attr("start", list.start.to_string())
                .with_children(self.children(native)?);
            node.hints_mut().marker = Some(list.marker);
            node.hints_mut().tight = Some(self.items_are_tight(native));
            return Ok(vec![self.spanned(node, raw_span)]);
        }
        if native.cast::<ListItem>().is_some() {
            let mut node = Node::list_item().with_children(self.children(native)?);
            if let Some(range) = &raw_span {
                let (marker, width) = span::list_marker_hints(&self.source[range.clone()]);
                node.hints_mut().marker = marker;
                node.hints_mut().marker_width = width;
            }
            return Ok(vec![self.spanned(node, raw_span)]);
        }
        if let Some(rule) = native.cast::<ThematicBreak>() {
            let mut node = Node::new(NodeKind::ThematicBreak);
            node.hints_mut().marker = Some(rule.marker);
            node.hints_mut().marker_len = Some(rule.marker_len);
            return Ok(vec![self.spanned(node, raw_span)]);
        }
        if let Some(em) = native.cast::<Em>() {
            let mut node = Node::new(NodeKind::Emphasis).with_children(self.children(native)?);
            node.hints_mut().marker = Some(em.marker);
            return Ok(vec![self.inline_spanned(node, raw_span)]);
        }
        if let Some(strong) = native.cast::<Strong>() {
            let mut node = Node::new(NodeKind::Strong).with_children(self.children(native)?);
            node.hints_mut().marker = Some(strong.marker);
            return Ok(vec![self.inline_spanned(node, raw_span)]);
        }
        if native.cast::<Strikethrough>().is_some() {
            let mut node = Node::custom("strikethrough").with_children(self.children(native)?);
            node.hints_mut().marker = Some('~');
            node.hints_mut().marker_len = Some(2);
            return Ok(vec![self.inline_spanned(node, raw_span)]);
        }
        if let Some(link) = native.cast::<Link>() {
            let mut node = Node::link(link.url.clone()).with_children(self.children(native)?);
            if let Some(title) = link.title.as_deref().filter(|t| !t.is_empty()) {
                node = node.with_attr("title", title);
            }
            return Ok(vec![self.inline_spanned(node, raw_span)]);
        }
        if let Some(image) = native.cast::<Image>() {
            let alt: String = self.children(native)?.iter().map(Node::collect_text).collect();
            let mut node = Node::image(image.url.clone(), alt);
            if let Some(title) = image.title.as_deref().filter(|t| !t.is_empty()) {
                node = node.with_attr("title", title);
            }
            return Ok(vec![self.inline_spanned(node, raw_span)]);
        }
        if let Some(auto) = native.cast::<Autolink>() {
            let mut children = self.children(native)?;
            if children.is_empty() {
                children.push(Node::text(auto.url.clone()));
            }
            let mut node = Node::link(auto.url.clone()).with_children(children);
            node.hints_mut().marker = Some('<');
            return Ok(vec![self.inline_spanned(node, raw_span)]);
        }
        if let Some(code) = native.cast::<CodeInline>() {
            // CodeInline stores only the delimiter; the span text lives
            // in its child Text nodes.
            let content: String = native
                .children
                .iter()
                .filter_map(|child| child.cast::<Text>().map(|t| t.content.as_str()))
                .collect();
            let mut node = Node::code_inline(content);
            node.hints_mut().marker = Some(code.marker);
            node.hints_mut().marker_len = Some(code.marker_len);
            return Ok(vec![self.inline_spanned(node, raw_span)]);
        }
        if native.cast::<Softbreak>().is_some() || native.cast::<Hardbreak>().is_some() {
            return Ok(vec![self.inline_spanned(Node::text("\n"), raw_span)]);
        }
        if let Some(text) = native.cast::<Text>() {
            if let Some(nodes) = self
                .extensions
                .split_text(&text.content, raw_span.as_ref().map(|r| r.start))
            {
                return Ok(nodes);
            }
            return Ok(vec![self.inline_spanned(Node::text(text.content.clone()), raw_span)]);
        }
        if let Some(special) = native.cast::<TextSpecial>() {
            return Ok(vec![self.inline_spanned(Node::text(special.content.clone()), raw_span)]);
        }
        if let Some(html) = native.cast::<HtmlBlock>() {
            let node = Node::new(NodeKind::HtmlBlock).with_text(html.content.clone());
            return Ok(vec![self.spanned(node, raw_span)]);
        }
        if let Some(html) = native.cast::<HtmlInline>() {
            let node = Node::new(NodeKind::HtmlInline).with_text(html.content.clone());
            return Ok(vec![self.inline_spanned(node, raw_span)]);
        }

        warn!("skipping unrecognized markdown-it node");
        Ok(Vec::new())
    }

    fn children(&self, native: &NativeNode) -> Result<Vec<Node>> {
        let mut out = Vec::new();
        for child in &native.children {
            out.extend(self.convert(child)?);
        }
        Ok(out)
    }

    /// Block nodes get trimmed spans so inter-sibling gaps stay
    /// recoverable.
    fn spanned(&self, node: Node, raw_span: Option<Range<usize>>) -> Node {
        match raw_span {
            Some(range) => {
                let trimmed = span::trim_trailing_newlines(self.source, range);
                node.with_span(trimmed)
            }
            None => node,
        }
    }

    fn inline_spanned(&self, node: Node, raw_span: Option<Range<usize>>) -> Node {
        match raw_span {
            Some(range) => node.with_span(range),
            None => node,
        }
    }

    fn items_are_tight(&self, list: &NativeNode) -> bool {
        let spans: Vec<Range<usize>> = list
            .children
            .iter()
            .filter_map(|item| item.srcmap.map(|m| {
                let (start, end) = m.get_byte_offsets();
                start..end
            }))
            .collect();
        span::list_is_tight(self.source, &spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Backend;

    fn parse(src: &str) -> Node {
        crate::parse_markdown(src, Backend::MarkdownIt, &ParserOptions::default(), &ExtensionSet::new())
            .unwrap()
    }

    #[test]
    fn test_basic_document() {
        let doc = parse("# Title\n\nBody text.\n");
        assert_eq!(doc.children().len(), 2);
        assert_eq!(*doc.child(0).unwrap().kind(), NodeKind::Heading);
        assert_eq!(doc.child(0).unwrap().level(), Some(1));
        assert!(doc.is_clean_deep());
    }

    #[test]
    fn test_setext_heading_hints() {
        let doc = parse("Title\n-----\n");
        let heading = doc.child(0).unwrap();
        assert_eq!(heading.level(), Some(2));
        assert_eq!(heading.hints().heading_style, Some(HeadingStyle::Setext));
        assert_eq!(heading.hints().marker, Some('-'));
    }

    #[test]
    fn test_fence_hints_from_native_value() {
        let doc = parse("~~~~python\nprint()\n~~~~\n");
        let code = doc.child(0).unwrap();
        assert_eq!(*code.kind(), NodeKind::CodeBlock);
        assert_eq!(code.attr("language"), Some("python"));
        assert_eq!(code.hints().marker, Some('~'));
        assert_eq!(code.hints().marker_len, Some(4));
        assert_eq!(code.hints().fenced, Some(true));
    }

    #[test]
    fn test_unterminated_fence_is_an_error() {
        let err = crate::parse_markdown(
            "```\nnever closed\n",
            Backend::MarkdownIt,
            &ParserOptions::default(),
            &ExtensionSet::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unterminated code fence"));
    }

    #[test]
    fn test_list_markers_and_tightness() {
        let doc = parse("* one\n* two\n");
        let list = doc.child(0).unwrap();
        assert_eq!(list.hints().marker, Some('*'));
        assert_eq!(list.hints().tight, Some(true));

        let loose = parse("* one\n\n* two\n");
        assert_eq!(loose.child(0).unwrap().hints().tight, Some(false));
    }

    #[test]
    fn test_inline_code_content_and_hints() {
        let doc = parse("run ``a `tick` b`` now\n");
        let para = doc.child(0).unwrap();
        let code = para.child(1).unwrap();
        assert_eq!(*code.kind(), NodeKind::CodeInline);
        assert_eq!(code.text_content(), Some("a `tick` b"));
        assert_eq!(code.hints().marker, Some('`'));
        assert_eq!(code.hints().marker_len, Some(2));
    }

    #[test]
    fn test_strikethrough_custom_node() {
        let doc = parse("~~gone~~\n");
        let node = doc.child(0).unwrap().child(0).unwrap();
        assert_eq!(node.kind().as_str(), "strikethrough");
        assert_eq!(node.collect_text(), "gone");
    }

    #[test]
    fn test_escaped_char_keeps_span() {
        let doc = parse("not \\*emphasis\\*\n");
        let para = doc.child(0).unwrap();
        let text: String = para.children().iter().map(Node::collect_text).collect();
        assert_eq!(text, "not *emphasis*");
    }

    #[test]
    fn test_tables_not_parsed() {
        let doc = parse("| a | b |\n|---|---|\n");
        assert!(doc.find_all(&NodeKind::Table).is_empty());
    }
}
