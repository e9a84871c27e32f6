//! Table-of-contents generation

use mdtrip_core::{Node, NodeKind, Result};

use crate::pipeline::Transform;
use crate::slug::slugify;

const DEFAULT_MARKER: &str = "[[TOC]]";

/// Insert a nested bullet list linking to the document's headings.
///
/// Placement: a top-level paragraph containing exactly the marker text is
/// replaced in place; without a marker the list lands after the leading
/// level-1 heading, or at the top of the document.
pub struct TocGenerator {
    min_level: u8,
    max_level: u8,
    title: Option<String>,
    marker: String,
}

struct TocEntry {
    level: u8,
    title: String,
    id: String,
}

impl TocGenerator {
    pub fn new() -> Self {
        Self {
            min_level: 1,
            max_level: 3,
            title: None,
            marker: DEFAULT_MARKER.to_string(),
        }
    }

    pub fn levels(mut self, min: u8, max: u8) -> Self {
        self.min_level = min;
        self.max_level = max;
        self
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    fn collect_entries(&self, doc: &Node) -> Vec<TocEntry> {
        let mut entries = Vec::new();
        doc.walk(&mut |node| {
            if *node.kind() != NodeKind::Heading {
                return;
            }
            let Some(level) = node.level() else { return };
            if level < self.min_level || level > self.max_level {
                return;
            }
            let title = node.collect_text();
            let id = node
                .attr("id")
                .map(str::to_string)
                .unwrap_or_else(|| slugify(&title));
            entries.push(TocEntry { level, title, id });
        });
        entries
    }

    fn toc_nodes(&self, entries: &[TocEntry]) -> Vec<Node> {
        let base = entries.iter().map(|e| e.level).min().unwrap_or(1);
        let mut pos = 0;
        let list = build_list(entries, &mut pos, base);

        let mut nodes = Vec::new();
        if let Some(title) = &self.title {
            let mut heading = Node::heading(2).with_child(Node::text(title.clone()));
            heading.mark_dirty();
            nodes.push(heading);
        }
        nodes.push(list);
        nodes
    }
}

impl Default for TocGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for TocGenerator {
    fn name(&self) -> &str {
        "toc"
    }

    fn apply(&self, doc: &mut Node) -> Result<()> {
        let entries = self.collect_entries(doc);

        let marker_index = doc.children().iter().position(|child| {
            *child.kind() == NodeKind::Paragraph && child.collect_text().trim() == self.marker
        });

        if let Some(index) = marker_index {
            let replacement = if entries.is_empty() {
                Vec::new()
            } else {
                self.toc_nodes(&entries)
            };
            doc.replace_child_with(index, replacement);
            return Ok(());
        }

        if entries.is_empty() {
            return Ok(());
        }

        let insert_at = doc
            .children()
            .iter()
            .position(|child| *child.kind() == NodeKind::Heading && child.level() == Some(1))
            .map(|i| i + 1)
            .unwrap_or(0);
        for (offset, node) in self.toc_nodes(&entries).into_iter().enumerate() {
            doc.insert_child(insert_at + offset, node);
        }
        Ok(())
    }
}

fn build_list(entries: &[TocEntry], pos: &mut usize, level: u8) -> Node {
    let mut items: Vec<Node> = Vec::new();
    while *pos < entries.len() && entries[*pos].level >= level {
        if entries[*pos].level > level {
            let sublist = build_list(entries, pos, entries[*pos].level);
            match items.last_mut() {
                Some(item) => item.push_child(sublist),
                // deeper entry with no parent at this level
                None => items.push(Node::list_item().with_child(sublist)),
            }
        } else {
            let entry = &entries[*pos];
            *pos += 1;
            items.push(
                Node::list_item().with_child(
                    Node::paragraph().with_child(
                        Node::link(format!("#{}", entry.id))
                            .with_child(Node::text(entry.title.clone())),
                    ),
                ),
            );
        }
    }
    let mut list = Node::list(false).with_children(items);
    list.mark_dirty();
    list
}
