//! Error taxonomy shared by all pipeline stages
//!
//! All four variants are fail-fast: no stage returns a partial tree or a
//! partial rendering alongside an error. Callers catch these at the
//! pipeline boundary and decide whether to retry with another backend,
//! skip the document, or abort a batch.

use thiserror::Error;

/// Error type covering the whole parse -> transform -> render cycle
#[derive(Debug, Error)]
pub enum MdtripError {
    /// Malformed input detected during normalization
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        /// 1-based source line
        line: usize,
        /// 1-based source column
        column: usize,
        message: String,
    },

    /// An extension hook failed mid-pipeline
    #[error("extension '{extension}' failed on {kind} node: {message}")]
    Transformation {
        /// Name of the failing extension or transformer
        extension: String,
        /// Kind of the node being processed when the hook failed
        kind: String,
        message: String,
    },

    /// A renderer was handed a node it cannot emit
    #[error("cannot render {kind} node: {message}")]
    Rendering { kind: String, message: String },

    /// A structural invariant check failed between stages
    #[error("invalid tree at {kind} node: {message}")]
    Validation { kind: String, message: String },
}

/// Specialized Result type for mdtrip operations
pub type Result<T> = std::result::Result<T, MdtripError>;

impl MdtripError {
    /// Create a parse error located at a byte offset within `source`
    pub fn parse_at(source: &str, byte: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_col(source, byte);
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a transformation error
    pub fn transformation(
        extension: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Transformation {
            extension: extension.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create a rendering error
    pub fn rendering(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rendering {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Resolve a byte offset to a 1-based (line, column) pair
///
/// Columns count bytes within the line, which matches how both backends
/// report offsets. Out-of-range offsets clamp to the end of input.
pub fn line_col(source: &str, byte: usize) -> (usize, usize) {
    let byte = byte.min(source.len());
    let before = &source[..byte];
    let line = before.bytes().filter(|b| *b == b'\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => byte - nl,
        None => byte + 1,
    };
    (line, column)
}
