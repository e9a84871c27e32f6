//! mdtrip core
//!
//! The unified node model every backend normalizes into and every renderer
//! consumes. This crate provides:
//! - The `Node` tree with per-node formatting hints and dirty tracking
//! - The error taxonomy shared across parse/transform/render stages
//! - The extension registry (`ExtensionSet`) consulted by normalizers,
//!   the transformer pipeline, and both renderers
//! - Structural invariant validation run between pipeline stages

pub mod error;
pub mod extension;
pub mod node;
pub mod validate;

pub use error::{line_col, MdtripError, Result};
pub use extension::{Extension, ExtensionSet, Recognized};
pub use node::{FormatHints, HeadingStyle, Node, NodeKind};
pub use validate::validate_tree;
