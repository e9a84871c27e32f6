//! `++key++` keyboard-shortcut syntax

use mdtrip_core::{Extension, Node, NodeKind, Recognized, Result};

/// Turns `++Ctrl+C++` into a `kbd` node
///
/// Recognition normally happens inline during parsing; the transform hook
/// is the fallback for trees that were built or edited after parsing and
/// still carry the literal syntax in text nodes.
pub struct Kbd;

impl Kbd {
    fn match_at(&self, text: &str, pos: usize) -> Option<(usize, String)> {
        let rest = text.get(pos..)?;
        let inner = rest.strip_prefix("++")?;
        let end = inner.find("++").filter(|&e| e > 0)?;
        let key = &inner[..end];
        if key.contains('\n') {
            return None;
        }
        Some((end + 4, key.to_string()))
    }

    fn split(&self, text: &str) -> Option<Vec<Node>> {
        let mut nodes = Vec::new();
        let mut segment_start = 0;
        let mut pos = 0;
        while pos < text.len() {
            match self.match_at(text, pos) {
                Some((consumed, key)) => {
                    if segment_start < pos {
                        nodes.push(Node::text(&text[segment_start..pos]));
                    }
                    nodes.push(Node::custom("kbd").with_text(key));
                    pos += consumed;
                    segment_start = pos;
                }
                None => pos += text[pos..].chars().next().map_or(1, char::len_utf8),
            }
        }
        if nodes.is_empty() {
            return None;
        }
        if segment_start < text.len() {
            nodes.push(Node::text(&text[segment_start..]));
        }
        Some(nodes)
    }

    fn rewrite(&self, node: &mut Node) {
        let mut i = 0;
        while i < node.children().len() {
            if let Some(child) = node.child_mut(i) {
                self.rewrite(child);
            }
            let replacement = node.child(i).and_then(|child| {
                if *child.kind() == NodeKind::Text {
                    child.text_content().and_then(|t| self.split(t))
                } else {
                    None
                }
            });
            match replacement {
                Some(nodes) => {
                    let advanced = nodes.len();
                    node.replace_child_with(i, nodes);
                    i += advanced;
                }
                None => i += 1,
            }
        }
    }
}

impl Extension for Kbd {
    fn name(&self) -> &'static str {
        "kbd"
    }

    fn kinds(&self) -> &[&'static str] {
        &["kbd"]
    }

    fn recognize(&self, text: &str, pos: usize) -> Option<Recognized> {
        let (consumed, key) = self.match_at(text, pos)?;
        Some(Recognized {
            kind: "kbd".to_string(),
            consumed,
            text: Some(key),
            attrs: Vec::new(),
        })
    }

    fn transform(&self, doc: &mut Node) -> Result<()> {
        self.rewrite(doc);
        Ok(())
    }

    fn render_markdown(&self, _node: &Node, children: &str) -> Option<String> {
        Some(format!("++{children}++"))
    }

    fn render_html(&self, _node: &Node, children: &str) -> Option<String> {
        Some(format!("<kbd>{children}</kbd>"))
    }
}
