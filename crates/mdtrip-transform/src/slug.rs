//! Slug generation for heading anchors

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Lowercased, ASCII-alphanumeric slug with `-` separators. Non-ASCII
/// characters are dropped by the alphanumeric filter; a text with nothing
/// usable falls back to `section`.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let slug = NON_ALNUM.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug.to_string()
    }
}

/// Tracks claimed ids and deduplicates with numeric suffixes
#[derive(Debug, Default)]
pub struct IdRegistry {
    counts: HashMap<String, usize>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id that already exists in the document
    pub fn reserve(&mut self, id: &str) {
        self.counts.entry(id.to_string()).or_insert(0);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.counts.contains_key(id)
    }

    /// Claim `base` or the first free `base-N`
    pub fn claim(&mut self, base: &str) -> String {
        if !self.counts.contains_key(base) {
            self.counts.insert(base.to_string(), 0);
            return base.to_string();
        }
        let mut n = self.counts[base] + 1;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.counts.contains_key(&candidate) {
                self.counts.insert(base.to_string(), n);
                self.counts.insert(candidate.clone(), 0);
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("  What's New?  "), "what-s-new");
        assert_eq!(slugify("C++ & Rust!"), "c-rust");
    }

    #[test]
    fn test_slugify_empty_falls_back() {
        assert_eq!(slugify("???"), "section");
        assert_eq!(slugify(""), "section");
    }

    #[test]
    fn test_registry_deduplicates() {
        let mut registry = IdRegistry::new();
        assert_eq!(registry.claim("intro"), "intro");
        assert_eq!(registry.claim("intro"), "intro-1");
        assert_eq!(registry.claim("intro"), "intro-2");
    }

    #[test]
    fn test_registry_respects_reserved() {
        let mut registry = IdRegistry::new();
        registry.reserve("usage");
        assert!(registry.contains("usage"));
        assert_eq!(registry.claim("usage"), "usage-1");
    }
}
