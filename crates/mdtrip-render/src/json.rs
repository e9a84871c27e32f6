//! JSON tree output
//!
//! Serializes the document tree's semantic fields (kind, attributes,
//! text, level, children). Format hints and dirty flags are internal and
//! never appear in the output.

use mdtrip_core::{MdtripError, Node, Result};

pub fn render_json(doc: &Node) -> Result<String> {
    serde_json::to_string(doc).map_err(|err| MdtripError::rendering("document", err.to_string()))
}

pub fn render_json_pretty(doc: &Node) -> Result<String> {
    serde_json::to_string_pretty(doc)
        .map_err(|err| MdtripError::rendering("document", err.to_string()))
}
