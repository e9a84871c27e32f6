//! Bundled extensions
//!
//! Each extension is an ordinary [`Extension`] implementation; nothing
//! here is special-cased by the core. [`standard_set`] registers the
//! whole bundle at default priorities.

use std::sync::Arc;

use mdtrip_core::ExtensionSet;

pub mod kbd;
pub mod strikethrough;
pub mod tasklist;

pub use kbd::Kbd;
pub use strikethrough::Strikethrough;
pub use tasklist::TaskList;

/// All bundled extensions in one set
pub fn standard_set() -> ExtensionSet {
    ExtensionSet::new()
        .with(Arc::new(Kbd))
        .with(Arc::new(Strikethrough))
        .with(Arc::new(TaskList))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set_contents() {
        let set = standard_set();
        let names: Vec<_> = set.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["kbd", "strikethrough", "tasklist"]);
        assert!(set.markdown_hook("kbd").is_some());
        assert!(set.markdown_hook("strikethrough").is_some());
    }
}
