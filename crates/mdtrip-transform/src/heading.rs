//! Heading level transformers

use mdtrip_core::{Node, NodeKind, Result};

use crate::pipeline::Transform;

/// Shift every heading by a fixed delta, clamped to the valid 1..=6
/// range. Headings already at the boundary stay untouched (and stay
/// clean) rather than erroring.
pub struct ShiftHeadings {
    delta: i8,
}

impl ShiftHeadings {
    pub fn new(delta: i8) -> Self {
        Self { delta }
    }

    pub fn increase(by: u8) -> Self {
        Self::new(by as i8)
    }

    pub fn decrease(by: u8) -> Self {
        Self::new(-(by as i8))
    }
}

impl Transform for ShiftHeadings {
    fn name(&self) -> &str {
        "shift-headings"
    }

    fn apply(&self, doc: &mut Node) -> Result<()> {
        let delta = self.delta;
        doc.walk_mut(&mut |node| {
            if *node.kind() != NodeKind::Heading {
                return;
            }
            if let Some(level) = node.level() {
                let shifted = (level as i8 + delta).clamp(1, 6) as u8;
                if shifted != level {
                    node.set_level(shifted);
                }
            }
        });
        Ok(())
    }
}

/// Normalize the heading hierarchy: the first heading becomes level 1 and
/// no heading is more than one level deeper than the heading before it.
pub struct NormalizeHeadings;

impl Transform for NormalizeHeadings {
    fn name(&self) -> &str {
        "normalize-headings"
    }

    fn apply(&self, doc: &mut Node) -> Result<()> {
        let mut previous: Option<u8> = None;
        doc.walk_mut(&mut |node| {
            if *node.kind() != NodeKind::Heading {
                return;
            }
            let Some(level) = node.level() else { return };
            let target = match previous {
                None => 1,
                Some(prev) => level.min(prev + 1).min(6),
            };
            if target != level {
                node.set_level(target);
            }
            previous = Some(target);
        });
        Ok(())
    }
}
