//! Heading id generation

use mdtrip_core::{Node, NodeKind, Result};

use crate::pipeline::Transform;
use crate::slug::{slugify, IdRegistry};

/// Assign a slugified `id` attribute to every heading that lacks one.
///
/// Existing ids are collected first and never overwritten, so running the
/// pass twice is a no-op and hand-written anchors keep winning.
pub struct IdGenerator {
    prefix: String,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { prefix: String::new() }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for IdGenerator {
    fn name(&self) -> &str {
        "id-generator"
    }

    fn apply(&self, doc: &mut Node) -> Result<()> {
        let mut registry = IdRegistry::new();
        doc.walk(&mut |node| {
            if *node.kind() == NodeKind::Heading {
                if let Some(id) = node.attr("id") {
                    registry.reserve(id);
                }
            }
        });

        doc.walk_mut(&mut |node| {
            if *node.kind() != NodeKind::Heading || node.attr("id").is_some() {
                return;
            }
            let base = format!("{}{}", self.prefix, slugify(&node.collect_text()));
            let id = registry.claim(&base);
            node.set_attr("id", id);
        });
        Ok(())
    }
}
