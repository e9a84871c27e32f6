//! Fidelity-preserving Markdown renderer
//!
//! The contract: rendering an unedited tree reproduces the source
//! byte-for-byte, and edits only reformat the nodes they touched.
//!
//! Three mechanisms stack up to deliver that:
//! 1. a fully clean document short-circuits to the stored source text
//! 2. a clean subtree with a recorded span is emitted as the source
//!    slice for that span, and the text between two sibling spans is
//!    replayed verbatim as their separator
//! 3. everything else falls back to canonical output, reusing marker
//!    hints (delimiter characters, fence runs, list marker widths) where
//!    normalization captured them
//!
//! Span replay is disabled inside canonically rendered blockquotes and
//! list item bodies: their source slices embed `> ` prefixes and marker
//! indentation that the canonical path re-applies itself.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use mdtrip_core::{
    validate_tree, ExtensionSet, HeadingStyle, MdtripError, Node, NodeKind, Result,
};

/// Canonical-output knobs, consulted only where no format hint exists
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownRenderOptions {
    pub emphasis_marker: char,
    pub strong_marker: char,
    pub bullet_marker: char,
    pub fence_marker: char,
    /// Prefer Setext underlines for new level 1-2 headings
    pub setext_headings: bool,
}

impl Default for MarkdownRenderOptions {
    fn default() -> Self {
        Self {
            emphasis_marker: '*',
            strong_marker: '*',
            bullet_marker: '-',
            fence_marker: '`',
            setext_headings: false,
        }
    }
}

pub fn render_markdown(doc: &Node, extensions: &ExtensionSet) -> Result<String> {
    render_markdown_with(doc, extensions, &MarkdownRenderOptions::default())
}

pub fn render_markdown_with(
    doc: &Node,
    extensions: &ExtensionSet,
    options: &MarkdownRenderOptions,
) -> Result<String> {
    validate_tree(doc).map_err(|err| match err {
        MdtripError::Validation { kind, message } => MdtripError::rendering(kind, message),
        other => other,
    })?;
    debug!(clean = doc.is_clean_deep(), "rendering markdown");
    let renderer = Renderer {
        source: doc.hints().source.as_deref(),
        extensions,
        options,
    };
    renderer.render(doc)
}

#[derive(Clone, Copy)]
struct Ctx {
    /// Replay source slices for clean subtrees
    allow_spans: bool,
    /// Collapse line breaks (headings, table cells)
    single_line: bool,
}

impl Ctx {
    const TOP: Ctx = Ctx { allow_spans: true, single_line: false };

    fn no_spans(self) -> Ctx {
        Ctx { allow_spans: false, ..self }
    }
}

struct Renderer<'a> {
    source: Option<&'a str>,
    extensions: &'a ExtensionSet,
    options: &'a MarkdownRenderOptions,
}

impl<'a> Renderer<'a> {
    fn render(&self, doc: &Node) -> Result<String> {
        if doc.is_clean_deep() {
            if let Some(source) = self.source {
                return Ok(source.to_string());
            }
        }

        if doc.children().is_empty() {
            return Ok(String::new());
        }

        let mut out = String::new();
        // replay any source text before the first block (leading blank
        // lines) and after the last one; anything non-whitespace there
        // belonged to a block that has since been removed
        let prefix = doc
            .children()
            .first()
            .and_then(|first| first.hints().span.clone())
            .zip(self.source)
            .map(|(span, src)| &src[..span.start.min(src.len())]);
        if let Some(prefix) = prefix.filter(|p| whitespace_only(p)) {
            out.push_str(prefix);
        }
        out.push_str(&self.render_siblings(doc.children(), Ctx::TOP, "\n\n")?);

        let tail = doc
            .children()
            .last()
            .and_then(|last| last.hints().span.clone())
            .zip(self.source)
            .map(|(span, src)| &src[span.end.min(src.len())..]);
        match tail {
            Some(tail) if whitespace_only(tail) => out.push_str(tail),
            _ => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
        Ok(out)
    }

    fn slice(&self, range: &Range<usize>) -> Option<&'a str> {
        self.source.and_then(|src| src.get(range.start..range.end))
    }

    /// Source slice for a clean subtree, canonical output otherwise
    fn block_text(&self, node: &Node, ctx: Ctx) -> Result<String> {
        if ctx.allow_spans && node.is_clean_deep() {
            if let Some(span) = &node.hints().span {
                if let Some(slice) = self.slice(span) {
                    return Ok(slice.to_string());
                }
            }
        }
        self.canonical_block(node, ctx)
    }

    fn render_siblings(&self, children: &[Node], ctx: Ctx, default_sep: &str) -> Result<String> {
        let mut out = String::new();
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                out.push_str(&self.separator(&children[i - 1], child, ctx, default_sep));
            }
            out.push_str(&self.block_text(child, ctx)?);
        }
        Ok(out)
    }

    /// Original text between two sibling spans, when both are known.
    /// Only whitespace gaps are replayed: a gap with visible content
    /// means a block between these two was removed.
    fn separator(&self, prev: &Node, next: &Node, ctx: Ctx, default_sep: &str) -> String {
        if ctx.allow_spans {
            if let (Some(a), Some(b)) = (&prev.hints().span, &next.hints().span) {
                if a.end <= b.start {
                    if let Some(gap) = self.slice(&(a.end..b.start)) {
                        if gap.contains('\n') && whitespace_only(gap) {
                            return gap.to_string();
                        }
                    }
                }
            }
        }
        default_sep.to_string()
    }

    fn canonical_block(&self, node: &Node, ctx: Ctx) -> Result<String> {
        match node.kind() {
            NodeKind::Heading => self.heading(node, ctx),
            NodeKind::Paragraph => self.inlines(node.children(), ctx),
            NodeKind::BlockQuote => {
                let inner = self.render_siblings(node.children(), ctx.no_spans(), "\n\n")?;
                Ok(quote_lines(&inner))
            }
            NodeKind::CodeBlock => self.code_block(node),
            NodeKind::List => self.list(node, ctx),
            NodeKind::ThematicBreak => {
                let marker = node.hints().marker.unwrap_or('-');
                let width = node.hints().marker_len.unwrap_or(3).max(3);
                Ok(marker.to_string().repeat(width))
            }
            NodeKind::HtmlBlock => {
                Ok(node.text_content().unwrap_or("").trim_end_matches('\n').to_string())
            }
            NodeKind::Table => self.table(node),
            NodeKind::ListItem | NodeKind::TableRow | NodeKind::TableCell => Err(
                MdtripError::rendering(node.kind().as_str(), "node outside its container"),
            ),
            NodeKind::Document => Err(MdtripError::rendering("document", "nested document node")),
            // stray inline or custom content at block position
            _ => self.canonical_inline(node, ctx),
        }
    }

    fn heading(&self, node: &Node, ctx: Ctx) -> Result<String> {
        let level = node.level().unwrap_or(1);
        let text = self.inlines(node.children(), Ctx { single_line: true, ..ctx })?;
        let id_suffix = node
            .attr("id")
            .map(|id| format!(" {{#{id}}}"))
            .unwrap_or_default();

        let setext = matches!(node.hints().heading_style, Some(HeadingStyle::Setext))
            || (node.hints().heading_style.is_none() && self.options.setext_headings);
        if setext && level <= 2 && !text.is_empty() {
            let marker = if level == 1 { '=' } else { '-' };
            let width = node.hints().marker_len.unwrap_or(0).max(text.chars().count()).max(3);
            return Ok(format!("{text}{id_suffix}\n{}", marker.to_string().repeat(width)));
        }

        let hashes = "#".repeat(level as usize);
        if text.is_empty() && id_suffix.is_empty() {
            Ok(hashes)
        } else {
            Ok(format!("{hashes} {}{id_suffix}", text))
        }
    }

    fn code_block(&self, node: &Node) -> Result<String> {
        let content = node.text_content().unwrap_or("");
        if node.hints().fenced == Some(false) {
            let indented = content
                .trim_end_matches('\n')
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        String::new()
                    } else {
                        format!("    {line}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            return Ok(indented);
        }

        let marker = node.hints().marker.unwrap_or(self.options.fence_marker);
        let run = node
            .hints()
            .marker_len
            .unwrap_or(3)
            .max(3)
            .max(longest_run(content, marker) + 1);
        let fence = marker.to_string().repeat(run);
        let info = node
            .hints()
            .info
            .clone()
            .or_else(|| node.attr("language").map(str::to_string))
            .unwrap_or_default();
        let body = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{content}\n")
        };
        Ok(format!("{fence}{info}\n{body}{fence}"))
    }

    fn list(&self, node: &Node, ctx: Ctx) -> Result<String> {
        let ordered = node.attr("ordered") == Some("true");
        let tight = node.hints().tight != Some(false);
        let default_sep = if tight { "\n" } else { "\n\n" };
        let bullet = node
            .hints()
            .marker
            .filter(|c| matches!(c, '-' | '*' | '+'))
            .unwrap_or(self.options.bullet_marker);
        let delim = node
            .hints()
            .marker
            .filter(|c| matches!(c, '.' | ')'))
            .unwrap_or('.');
        // new items inherit the width the source used
        let default_width = node.children().iter().find_map(|item| item.hints().marker_width);

        let mut number: u64 = node.attr("start").and_then(|s| s.parse().ok()).unwrap_or(1);
        let mut out = String::new();
        for (i, item) in node.children().iter().enumerate() {
            if i > 0 {
                out.push_str(&self.separator(&node.children()[i - 1], item, ctx, default_sep));
            }
            // item slices include their own marker and indentation
            let reused = ctx.allow_spans && item.is_clean_deep();
            let slice = reused
                .then(|| item.hints().span.as_ref())
                .flatten()
                .and_then(|span| self.slice(span));
            match slice {
                Some(text) => out.push_str(text),
                None => out.push_str(&self.list_item(
                    item,
                    ordered,
                    number,
                    bullet,
                    delim,
                    default_width,
                    tight,
                )?),
            }
            if ordered {
                number += 1;
            }
        }
        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn list_item(
        &self,
        item: &Node,
        ordered: bool,
        number: u64,
        bullet: char,
        delim: char,
        default_width: Option<usize>,
        tight: bool,
    ) -> Result<String> {
        let marker = if ordered {
            format!("{number}{delim}")
        } else {
            bullet.to_string()
        };
        let width = item
            .hints()
            .marker_width
            .or(default_width)
            .unwrap_or(0)
            .max(marker.chars().count() + 1);
        let mut head = marker;
        while head.chars().count() < width {
            head.push(' ');
        }
        if let Some(checked) = item.attr("checked") {
            head.push_str(if checked == "true" { "[x] " } else { "[ ] " });
        }
        let indent = " ".repeat(head.chars().count());

        let body = self.render_siblings(
            item.children(),
            Ctx { allow_spans: false, single_line: false },
            if tight { "\n" } else { "\n\n" },
        )?;
        Ok(prefix_lines(&body, &head, &indent))
    }

    fn table(&self, node: &Node) -> Result<String> {
        let cell_ctx = Ctx { allow_spans: false, single_line: true };
        let mut rows: Vec<Vec<String>> = Vec::new();
        for row in node.children() {
            let mut cells = Vec::new();
            for cell in row.children() {
                cells.push(self.inlines(cell.children(), cell_ctx)?);
            }
            rows.push(cells);
        }
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return Ok(String::new());
        }

        let alignments: Vec<String> = node
            .attr("alignments")
            .map(|a| a.split(',').map(str::to_string).collect())
            .unwrap_or_default();
        let mut widths = vec![3usize; columns];
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut lines = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            let mut line = String::from("|");
            for col in 0..columns {
                let cell = row.get(col).map(String::as_str).unwrap_or("");
                line.push_str(&format!(" {:<width$} |", cell, width = widths[col]));
            }
            lines.push(line);

            if index == 0 {
                let mut sep = String::from("|");
                for (col, width) in widths.iter().enumerate() {
                    let dashes = match alignments.get(col).map(String::as_str) {
                        Some("left") => format!(":{}", "-".repeat(width.saturating_sub(1))),
                        Some("right") => format!("{}:", "-".repeat(width.saturating_sub(1))),
                        Some("center") => format!(":{}:", "-".repeat(width.saturating_sub(2))),
                        _ => "-".repeat(*width),
                    };
                    sep.push_str(&format!(" {dashes} |"));
                }
                lines.push(sep);
            }
        }
        Ok(lines.join("\n"))
    }

    fn inlines(&self, children: &[Node], ctx: Ctx) -> Result<String> {
        let mut out = String::new();
        for child in children {
            if ctx.allow_spans && child.is_clean_deep() {
                if let Some(span) = &child.hints().span {
                    if let Some(slice) = self.slice(span) {
                        if !(ctx.single_line && slice.contains('\n')) {
                            out.push_str(slice);
                            continue;
                        }
                    }
                }
            }
            out.push_str(&self.canonical_inline(child, ctx)?);
        }
        Ok(out)
    }

    fn canonical_inline(&self, node: &Node, ctx: Ctx) -> Result<String> {
        match node.kind() {
            NodeKind::Text => {
                let text = node.text_content().unwrap_or("");
                if text == "\n" {
                    return Ok(if ctx.single_line { " " } else { "\n" }.to_string());
                }
                Ok(escape_markdown(text))
            }
            NodeKind::Emphasis => {
                let marker = node.hints().marker.unwrap_or(self.options.emphasis_marker);
                let inner = self.inlines(node.children(), ctx)?;
                Ok(format!("{marker}{inner}{marker}"))
            }
            NodeKind::Strong => {
                let marker = node.hints().marker.unwrap_or(self.options.strong_marker);
                let inner = self.inlines(node.children(), ctx)?;
                Ok(format!("{marker}{marker}{inner}{marker}{marker}"))
            }
            NodeKind::CodeInline => {
                let content = node.text_content().unwrap_or("");
                let run = node
                    .hints()
                    .marker_len
                    .unwrap_or(1)
                    .max(longest_run(content, '`') + 1);
                let fence = "`".repeat(run);
                if content.starts_with('`') || content.ends_with('`') {
                    Ok(format!("{fence} {content} {fence}"))
                } else {
                    Ok(format!("{fence}{content}{fence}"))
                }
            }
            NodeKind::Link => {
                let href = node.attr("href").unwrap_or("");
                let inner = self.inlines(node.children(), ctx)?;
                if node.hints().marker == Some('<') && node.attr("title").is_none() {
                    return Ok(format!("<{href}>"));
                }
                match node.attr("title") {
                    Some(title) => Ok(format!(
                        "[{inner}]({href} \"{}\")",
                        title.replace('"', "\\\"")
                    )),
                    None => Ok(format!("[{inner}]({href})")),
                }
            }
            NodeKind::Image => {
                let src = node.attr("src").unwrap_or("");
                let alt = node.attr("alt").unwrap_or("");
                match node.attr("title") {
                    Some(title) => Ok(format!(
                        "![{alt}]({src} \"{}\")",
                        title.replace('"', "\\\"")
                    )),
                    None => Ok(format!("![{alt}]({src})")),
                }
            }
            NodeKind::HtmlInline => Ok(node.text_content().unwrap_or("").to_string()),
            NodeKind::Custom(kind) => {
                let children = if node.children().is_empty() {
                    node.text_content().unwrap_or("").to_string()
                } else {
                    self.inlines(node.children(), ctx)?
                };
                let Some(extension) = self.extensions.markdown_hook(kind) else {
                    return Err(MdtripError::rendering(
                        kind.clone(),
                        "no registered extension renders this kind",
                    ));
                };
                extension.render_markdown(node, &children).ok_or_else(|| {
                    MdtripError::rendering(kind.clone(), "extension produced no markdown")
                })
            }
            other => Err(MdtripError::rendering(
                other.as_str(),
                "block node in inline position",
            )),
        }
    }
}

fn whitespace_only(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

fn longest_run(text: &str, marker: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == marker {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn quote_lines(text: &str) -> String {
    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect();
    lines.join("\n")
}

fn prefix_lines(text: &str, first: &str, rest: &str) -> String {
    if text.is_empty() {
        return first.trim_end().to_string();
    }
    let mut out = String::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if i == 0 {
            out.push_str(first);
            out.push_str(line);
        } else if line.is_empty() {
            // blank continuation lines carry no trailing indentation
        } else {
            out.push_str(rest);
            out.push_str(line);
        }
    }
    out
}

fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        escape_line(line, &mut out);
    }
    out
}

fn escape_line(line: &str, out: &mut String) {
    // a leading digit run followed by `.` or `)` would reparse as an
    // ordered list marker
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    let ordered_delim = digits > 0 && matches!(line.as_bytes().get(digits), Some(b'.' | b')'));
    for (pos, ch) in line.char_indices() {
        match ch {
            '\\' | '`' | '*' | '_' | '[' | ']' => {
                out.push('\\');
                out.push(ch);
            }
            '#' | '>' | '+' | '-' if pos == 0 => {
                out.push('\\');
                out.push(ch);
            }
            '.' | ')' if ordered_delim && pos == digits => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdtrip_parser::{parse_markdown, Backend, ParserOptions};

    fn parse(src: &str) -> Node {
        parse_markdown(src, Backend::Pulldown, &ParserOptions::default(), &ExtensionSet::new())
            .unwrap()
    }

    fn render(doc: &Node) -> String {
        render_markdown(doc, &ExtensionSet::new()).unwrap()
    }

    #[test]
    fn test_unedited_documents_render_verbatim() {
        for src in [
            "# Title\n\nBody text here.\n",
            "Title\n=====\n\nSetext body.\n",
            "*  Item 1\n*  Item 2\n",
            "1. one\n2. two\n\n   continued\n",
            "> quoted\n> more\n\n---\n",
            "```rust\nfn main() {}\n```\n",
            "    indented code\n    more\n",
            "| a | b |\n|---|:-:|\n| 1 | 2 |\n",
            "Text with *stars*, __unders__, `code`, and <b>html</b>.\n",
            "No trailing newline at all",
            "Weird   spacing\nand soft breaks  \nhard break.\n",
        ] {
            let doc = parse(src);
            assert_eq!(render(&doc), src, "round trip failed for {src:?}");
        }
    }

    #[test]
    fn test_level_bump_touches_only_the_heading() {
        let mut doc = parse("# Title\n\nBody.\n");
        doc.child_mut(0).unwrap().set_level(2);
        assert_eq!(render(&doc), "## Title\n\nBody.\n");
    }

    #[test]
    fn test_edited_paragraph_keeps_neighbor_formatting() {
        let mut doc = parse("*  Item 1\n*  Item 2\n\nSome   spaced    text.\n");
        // dirty the paragraph's text node
        doc.child_mut(1)
            .and_then(|p| p.child_mut(0))
            .unwrap()
            .set_text("Replaced.");
        assert_eq!(render(&doc), "*  Item 1\n*  Item 2\n\nReplaced.\n");
    }

    #[test]
    fn test_appended_list_item_matches_list_style() {
        let mut doc = parse("*  Item 1\n*  Item 2\n");
        let item = Node::list_item()
            .with_child(Node::paragraph().with_child(Node::text("Item 3")));
        doc.child_mut(0).unwrap().push_child(item);
        assert_eq!(render(&doc), "*  Item 1\n*  Item 2\n*  Item 3\n");
    }

    #[test]
    fn test_appended_paragraph_renders_canonically() {
        let mut doc = parse("# Title\n");
        doc.push_child(Node::paragraph().with_child(Node::text("New paragraph.")));
        assert_eq!(render(&doc), "# Title\n\nNew paragraph.\n");
    }

    #[test]
    fn test_canonical_heading_with_id() {
        let mut doc = parse("## Usage\n");
        doc.child_mut(0).unwrap().set_attr("id", "usage");
        assert_eq!(render(&doc), "## Usage {#usage}\n");
    }

    #[test]
    fn test_heading_id_round_trips_through_reparse() {
        let rendered = {
            let mut doc = parse("## Usage\n");
            doc.child_mut(0).unwrap().set_attr("id", "usage");
            render(&doc)
        };
        let reparsed = parse(&rendered);
        assert_eq!(reparsed.child(0).unwrap().attr("id"), Some("usage"));
        assert_eq!(render(&reparsed), rendered);
    }

    #[test]
    fn test_fence_sized_past_content_runs() {
        let mut code = Node::code_block("outer\n```\ninner\n```\n", Some("md"));
        code.mark_dirty();
        let doc = Node::document().with_child(code);
        let out = render(&doc);
        assert!(out.starts_with("````md\n"), "{out}");
        assert!(out.ends_with("\n````\n"), "{out}");
    }

    #[test]
    fn test_canonical_table_widths() {
        let mut doc = parse("| a | b |\n|---|---|\n| long cell | x |\n");
        doc.child_mut(0).unwrap().mark_dirty();
        let out = render(&doc);
        assert_eq!(
            out,
            "| a         | b   |\n| --------- | --- |\n| long cell | x   |\n"
        );
    }

    #[test]
    fn test_dirty_blockquote_prefixes_all_lines() {
        let mut doc = parse("> first\n>\n> second\n");
        doc.child_mut(0).unwrap().mark_dirty();
        assert_eq!(render(&doc), "> first\n>\n> second\n");
    }

    #[test]
    fn test_custom_kind_without_extension_fails() {
        let mut para = Node::paragraph().with_child(Node::custom("kbd").with_text("X"));
        para.mark_dirty();
        let doc = Node::document().with_child(para);
        let err = render_markdown(&doc, &ExtensionSet::new()).unwrap_err();
        assert!(matches!(err, MdtripError::Rendering { .. }));
        assert!(err.to_string().contains("kbd"));
    }

    #[test]
    fn test_invalid_tree_is_a_rendering_error() {
        let doc = Node::document().with_child(Node::text("bare inline"));
        let err = render_markdown(&doc, &ExtensionSet::new()).unwrap_err();
        assert!(matches!(err, MdtripError::Rendering { .. }));
    }

    #[test]
    fn test_tree_without_source_renders_canonically() {
        let doc = Node::document()
            .with_child(Node::heading(1).with_child(Node::text("Fresh")))
            .with_child(
                Node::paragraph()
                    .with_child(Node::text("Built "))
                    .with_child(Node::new(NodeKind::Strong).with_child(Node::text("by hand"))),
            )
            .with_child(
                Node::list(false).with_child(
                    Node::list_item()
                        .with_child(Node::paragraph().with_child(Node::text("only item"))),
                ),
            );
        assert_eq!(
            render(&doc),
            "# Fresh\n\nBuilt **by hand**\n\n- only item\n"
        );
    }

    #[test]
    fn test_setext_preserved_canonically() {
        let mut doc = parse("Title\n=====\n");
        doc.child_mut(0).unwrap().set_attr("id", "title");
        assert_eq!(render(&doc), "Title {#title}\n=====\n");
    }

    #[test]
    fn test_escaping_in_new_text() {
        let mut doc = parse("placeholder\n");
        doc.child_mut(0)
            .and_then(|p| p.child_mut(0))
            .unwrap()
            .set_text("literal *stars* and [brackets]");
        assert_eq!(render(&doc), "literal \\*stars\\* and \\[brackets\\]\n");
    }

    #[test]
    fn test_ordered_marker_escaped_at_line_start() {
        let mut doc = parse("placeholder\n");
        doc.child_mut(0)
            .and_then(|p| p.child_mut(0))
            .unwrap()
            .set_text("1. not a list");
        let out = render(&doc);
        assert_eq!(out, "1\\. not a list\n");
        assert_eq!(parse(&out).child(0).unwrap().kind().as_str(), "paragraph");

        assert_eq!(escape_markdown("12) twelve"), "12\\) twelve");
        assert_eq!(escape_markdown("see item 1. mid-line"), "see item 1. mid-line");
        assert_eq!(escape_markdown("a\n2. b"), "a\n2\\. b");
    }
}
