//! Task list checkboxes
//!
//! The pulldown backend parses `- [x]` markers natively; this transform
//! is the equivalent for backends that do not, lifting a literal
//! `[ ] `/`[x] ` prefix out of an item's leading text into a `checked`
//! attribute on the list item.

use mdtrip_core::{Extension, Node, NodeKind, Result};

pub struct TaskList;

fn leading_checkbox(item: &Node) -> Option<(bool, String)> {
    let para = item.child(0)?;
    if *para.kind() != NodeKind::Paragraph {
        return None;
    }
    let text = para.child(0)?;
    if *text.kind() != NodeKind::Text {
        return None;
    }
    let content = text.text_content()?;
    if let Some(rest) = content.strip_prefix("[ ] ") {
        return Some((false, rest.to_string()));
    }
    for marker in ["[x] ", "[X] "] {
        if let Some(rest) = content.strip_prefix(marker) {
            return Some((true, rest.to_string()));
        }
    }
    None
}

impl Extension for TaskList {
    fn name(&self) -> &'static str {
        "tasklist"
    }

    fn transform(&self, doc: &mut Node) -> Result<()> {
        doc.walk_mut(&mut |node| {
            if *node.kind() != NodeKind::ListItem || node.attr("checked").is_some() {
                return;
            }
            let Some((checked, rest)) = leading_checkbox(node) else {
                return;
            };
            node.set_attr("checked", if checked { "true" } else { "false" });
            if let Some(text) = node.child_mut(0).and_then(|p| p.child_mut(0)) {
                text.set_text(rest);
            }
        });
        Ok(())
    }
}
