//! `~~text~~` strikethrough rendering
//!
//! Both backends parse strikethrough natively into a custom
//! `strikethrough` node; this extension contributes the render hooks
//! (and a recognizer for text that bypassed the parsers).

use mdtrip_core::{Extension, Node, Recognized};

pub struct Strikethrough;

impl Extension for Strikethrough {
    fn name(&self) -> &'static str {
        "strikethrough"
    }

    fn kinds(&self) -> &[&'static str] {
        &["strikethrough"]
    }

    fn recognize(&self, text: &str, pos: usize) -> Option<Recognized> {
        let rest = text.get(pos..)?;
        let inner = rest.strip_prefix("~~")?;
        let end = inner.find("~~").filter(|&e| e > 0)?;
        if inner[..end].contains('\n') {
            return None;
        }
        Some(Recognized {
            kind: "strikethrough".to_string(),
            consumed: end + 4,
            text: Some(inner[..end].to_string()),
            attrs: Vec::new(),
        })
    }

    fn render_markdown(&self, _node: &Node, children: &str) -> Option<String> {
        Some(format!("~~{children}~~"))
    }

    fn render_html(&self, _node: &Node, children: &str) -> Option<String> {
        Some(format!("<del>{children}</del>"))
    }
}
