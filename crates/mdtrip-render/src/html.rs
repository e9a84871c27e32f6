//! HTML renderer
//!
//! Straightforward recursive visitor. No fidelity machinery applies here;
//! HTML output is always canonical. Custom kinds go through the
//! extension html hooks and fail loudly when nothing claims them.

use mdtrip_core::{validate_tree, ExtensionSet, MdtripError, Node, NodeKind, Result};

pub fn render_html(doc: &Node, extensions: &ExtensionSet) -> Result<String> {
    validate_tree(doc).map_err(|err| match err {
        MdtripError::Validation { kind, message } => MdtripError::rendering(kind, message),
        other => other,
    })?;

    let renderer = HtmlRenderer { extensions };
    let mut out = String::new();
    for child in doc.children() {
        out.push_str(&renderer.block(child)?);
        out.push('\n');
    }
    Ok(out)
}

struct HtmlRenderer<'a> {
    extensions: &'a ExtensionSet,
}

impl HtmlRenderer<'_> {
    fn block(&self, node: &Node) -> Result<String> {
        match node.kind() {
            NodeKind::Heading => {
                let level = node.level().unwrap_or(1);
                let id = node
                    .attr("id")
                    .map(|id| format!(" id=\"{}\"", escape_attr(id)))
                    .unwrap_or_default();
                Ok(format!("<h{level}{id}>{}</h{level}>", self.inlines(node.children())?))
            }
            NodeKind::Paragraph => Ok(format!("<p>{}</p>", self.inlines(node.children())?)),
            NodeKind::BlockQuote => {
                let mut inner = String::new();
                for child in node.children() {
                    inner.push('\n');
                    inner.push_str(&self.block(child)?);
                }
                Ok(format!("<blockquote>{inner}\n</blockquote>"))
            }
            NodeKind::CodeBlock => {
                let class = node
                    .attr("language")
                    .map(|lang| format!(" class=\"language-{}\"", escape_attr(lang)))
                    .unwrap_or_default();
                Ok(format!(
                    "<pre><code{class}>{}</code></pre>",
                    escape_html(node.text_content().unwrap_or(""))
                ))
            }
            NodeKind::List => self.list(node),
            NodeKind::ThematicBreak => Ok("<hr />".to_string()),
            NodeKind::HtmlBlock => Ok(node
                .text_content()
                .unwrap_or("")
                .trim_end_matches('\n')
                .to_string()),
            NodeKind::Table => self.table(node),
            NodeKind::Custom(_) => self.custom(node),
            _ => self.inline(node),
        }
    }

    fn list(&self, node: &Node) -> Result<String> {
        let ordered = node.attr("ordered") == Some("true");
        let tight = node.hints().tight != Some(false);
        let tag = if ordered { "ol" } else { "ul" };
        let start = node
            .attr("start")
            .filter(|s| ordered && *s != "1")
            .map(|s| format!(" start=\"{}\"", escape_attr(s)))
            .unwrap_or_default();

        let mut out = format!("<{tag}{start}>");
        for item in node.children() {
            out.push_str("\n<li>");
            out.push_str(&self.list_item_body(item, tight)?);
            out.push_str("</li>");
        }
        out.push_str(&format!("\n</{tag}>"));
        Ok(out)
    }

    /// Tight lists drop the paragraph wrappers inside items
    fn list_item_body(&self, item: &Node, tight: bool) -> Result<String> {
        let checkbox = match item.attr("checked") {
            Some("true") => "<input type=\"checkbox\" checked disabled /> ",
            Some(_) => "<input type=\"checkbox\" disabled /> ",
            None => "",
        };
        let mut out = checkbox.to_string();
        for (i, child) in item.children().iter().enumerate() {
            if tight && *child.kind() == NodeKind::Paragraph {
                if i > 0 {
                    out.push('\n');
                }
                out.push_str(&self.inlines(child.children())?);
            } else {
                out.push('\n');
                out.push_str(&self.block(child)?);
            }
        }
        Ok(out)
    }

    fn table(&self, node: &Node) -> Result<String> {
        let alignments: Vec<&str> = node
            .attr("alignments")
            .map(|a| a.split(',').collect())
            .unwrap_or_default();
        let style = |col: usize| match alignments.get(col) {
            Some(&"left") => " style=\"text-align: left\"".to_string(),
            Some(&"center") => " style=\"text-align: center\"".to_string(),
            Some(&"right") => " style=\"text-align: right\"".to_string(),
            _ => String::new(),
        };

        let mut out = String::from("<table>");
        for row in node.children() {
            let header = row.attr("header") == Some("true");
            let cell_tag = if header { "th" } else { "td" };
            out.push_str("\n<tr>");
            for (col, cell) in row.children().iter().enumerate() {
                out.push_str(&format!(
                    "<{cell_tag}{}>{}</{cell_tag}>",
                    style(col),
                    self.inlines(cell.children())?
                ));
            }
            out.push_str("</tr>");
        }
        out.push_str("\n</table>");
        Ok(out)
    }

    fn inlines(&self, children: &[Node]) -> Result<String> {
        let mut out = String::new();
        for child in children {
            out.push_str(&self.inline(child)?);
        }
        Ok(out)
    }

    fn inline(&self, node: &Node) -> Result<String> {
        match node.kind() {
            NodeKind::Text => Ok(escape_html(node.text_content().unwrap_or(""))),
            NodeKind::Emphasis => Ok(format!("<em>{}</em>", self.inlines(node.children())?)),
            NodeKind::Strong => {
                Ok(format!("<strong>{}</strong>", self.inlines(node.children())?))
            }
            NodeKind::CodeInline => Ok(format!(
                "<code>{}</code>",
                escape_html(node.text_content().unwrap_or(""))
            )),
            NodeKind::Link => {
                let href = escape_attr(node.attr("href").unwrap_or(""));
                let title = node
                    .attr("title")
                    .map(|t| format!(" title=\"{}\"", escape_attr(t)))
                    .unwrap_or_default();
                Ok(format!(
                    "<a href=\"{href}\"{title}>{}</a>",
                    self.inlines(node.children())?
                ))
            }
            NodeKind::Image => {
                let src = escape_attr(node.attr("src").unwrap_or(""));
                let alt = escape_attr(node.attr("alt").unwrap_or(""));
                let title = node
                    .attr("title")
                    .map(|t| format!(" title=\"{}\"", escape_attr(t)))
                    .unwrap_or_default();
                Ok(format!("<img src=\"{src}\" alt=\"{alt}\"{title} />"))
            }
            NodeKind::HtmlInline => Ok(node.text_content().unwrap_or("").to_string()),
            NodeKind::Custom(_) => self.custom(node),
            other => Err(MdtripError::rendering(
                other.as_str(),
                "no html form for this kind in inline position",
            )),
        }
    }

    fn custom(&self, node: &Node) -> Result<String> {
        let NodeKind::Custom(kind) = node.kind() else {
            return Err(MdtripError::rendering(node.kind().as_str(), "expected a custom kind"));
        };
        let children = if node.children().is_empty() {
            escape_html(node.text_content().unwrap_or(""))
        } else {
            self.inlines(node.children())?
        };
        let Some(extension) = self.extensions.html_hook(kind) else {
            return Err(MdtripError::rendering(
                kind.clone(),
                "no registered extension renders this kind",
            ));
        };
        extension
            .render_html(node, &children)
            .ok_or_else(|| MdtripError::rendering(kind.clone(), "extension produced no html"))
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
