//! Structural invariant validation
//!
//! Run between pipeline stages and at render entry. Fail-fast: the first
//! violation is returned as a `ValidationError` naming the offending node
//! kind, since a tree that breaks these invariants cannot be rendered
//! into trustworthy Markdown.

use crate::error::{MdtripError, Result};
use crate::node::{Node, NodeKind};

/// Validate a whole tree rooted at a document node
pub fn validate_tree(root: &Node) -> Result<()> {
    if *root.kind() != NodeKind::Document {
        return Err(MdtripError::validation(
            root.kind().as_str(),
            "tree root must be a document node",
        ));
    }
    validate_node(root)
}

fn validate_node(node: &Node) -> Result<()> {
    let kind = node.kind();

    // level is present iff heading, and always within 1..=6
    match (kind, node.level()) {
        (NodeKind::Heading, Some(level)) if (1..=6).contains(&level) => {}
        (NodeKind::Heading, Some(level)) => {
            return Err(MdtripError::validation(
                kind.as_str(),
                format!("heading level must be 1-6, got {level}"),
            ));
        }
        (NodeKind::Heading, None) => {
            return Err(MdtripError::validation(kind.as_str(), "heading has no level"));
        }
        (_, Some(_)) => {
            return Err(MdtripError::validation(
                kind.as_str(),
                "level is only valid on heading nodes",
            ));
        }
        (_, None) => {}
    }

    // leaf kinds never carry children; non-leaf built-ins never carry text
    if kind.is_leaf() && !node.children().is_empty() {
        return Err(MdtripError::validation(
            kind.as_str(),
            format!("leaf kind has {} children", node.children().len()),
        ));
    }
    if !kind.carries_text() && node.text_content().is_some() {
        return Err(MdtripError::validation(
            kind.as_str(),
            "non-leaf kind carries literal text",
        ));
    }

    match kind {
        NodeKind::Document => {
            for child in node.children() {
                if child.kind().is_inline() {
                    return Err(MdtripError::validation(
                        child.kind().as_str(),
                        "document contains a bare inline element",
                    ));
                }
            }
        }
        NodeKind::List => {
            for child in node.children() {
                if *child.kind() != NodeKind::ListItem {
                    return Err(MdtripError::validation(
                        child.kind().as_str(),
                        "list children must be list_item nodes",
                    ));
                }
            }
        }
        NodeKind::Table => {
            for child in node.children() {
                if *child.kind() != NodeKind::TableRow {
                    return Err(MdtripError::validation(
                        child.kind().as_str(),
                        "table children must be table_row nodes",
                    ));
                }
            }
        }
        NodeKind::TableRow => {
            for child in node.children() {
                if *child.kind() != NodeKind::TableCell {
                    return Err(MdtripError::validation(
                        child.kind().as_str(),
                        "table_row children must be table_cell nodes",
                    ));
                }
            }
        }
        NodeKind::Link => {
            if node.attr("href").is_none() {
                return Err(MdtripError::validation(kind.as_str(), "link has no href"));
            }
        }
        NodeKind::Image => {
            if node.attr("src").is_none() {
                return Err(MdtripError::validation(kind.as_str(), "image has no src"));
            }
        }
        _ => {}
    }

    for child in node.children() {
        validate_node(child)?;
    }
    Ok(())
}
