//! Document transformers
//!
//! A [`Pipeline`] runs [`Transform`] passes over a mutable document tree,
//! validating structural invariants between passes. The shipped passes
//! cover the common restructuring jobs: heading level shifts, heading id
//! generation, and table-of-contents insertion. Extension transform hooks
//! plug in through [`ExtensionPass`].

pub mod heading;
pub mod id_generator;
pub mod pipeline;
pub mod slug;
pub mod toc;

pub use heading::{NormalizeHeadings, ShiftHeadings};
pub use id_generator::IdGenerator;
pub use pipeline::{ExtensionPass, Pipeline, Transform};
pub use slug::{slugify, IdRegistry};
pub use toc::TocGenerator;
