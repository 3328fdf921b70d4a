//! Nondominated 2D staircase maintained during plane sweeps.
//!
//! Steps are `(x, y)` pairs keyed by `x` in the tree with `y` as the
//! payload. At all times x values are unique and y strictly decreases as x
//! grows, so the steps trace the lower-left boundary of the region attained
//! so far. The 3D hypervolume and attainment sweeps both project onto this
//! structure, one slab or level at a time.

use crate::ostree::OsTree;

/// Result of inserting a step: what fell off the staircase and the
/// surviving neighbors of the new step.
pub(crate) struct StairUpdate {
    /// Steps the new one dominates, in ascending x order.
    pub(crate) removed: Vec<(f64, f64)>,
    /// Smallest y among steps strictly left of the new x, infinity if none.
    pub(crate) left_y: f64,
    /// x of the surviving step right of the new one, infinity if none.
    pub(crate) right_x: f64,
}

#[derive(Debug, Default)]
pub(crate) struct Staircase {
    tree: OsTree,
}

impl Staircase {
    pub(crate) fn new() -> Self {
        Self {
            tree: OsTree::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tree.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Whether some step weakly dominates `(x, y)`.
    pub(crate) fn dominates(&self, x: f64, y: f64) -> bool {
        self.tree.min_payload_le(x).is_some_and(|min_y| min_y <= y)
    }

    /// Smallest y among steps with step x `<= x`, infinity if none.
    pub(crate) fn min_y_le(&self, x: f64) -> f64 {
        self.tree.min_payload_le(x).unwrap_or(f64::INFINITY)
    }

    /// Smallest y among steps with step x strictly `< x`, infinity if none.
    pub(crate) fn min_y_lt(&self, x: f64) -> f64 {
        self.tree.min_payload_lt(x).unwrap_or(f64::INFINITY)
    }

    /// Insert a step that is not weakly dominated by the staircase,
    /// dropping every step the new one dominates.
    pub(crate) fn insert(&mut self, x: f64, y: f64) -> StairUpdate {
        debug_assert!(!self.dominates(x, y));
        let left_y = self.min_y_lt(x);
        let mut removed = Vec::new();
        // Dominated steps form a run starting at the first step with
        // step x >= x, while their y stays >= y.
        let start = self.tree.count_lt(x);
        while let Some((sx, sy)) = self.tree.select(start) {
            if sy < y {
                break;
            }
            self.tree.remove(sx);
            removed.push((sx, sy));
        }
        self.tree.insert(x, y);
        let right_x = match self.tree.select(self.tree.count_lt(x) + 1) {
            Some((sx, _)) => sx,
            None => f64::INFINITY,
        };
        StairUpdate {
            removed,
            left_y,
            right_x,
        }
    }

    /// Steps with step x `>= x`, ascending.
    pub(crate) fn entries_ge(&self, x: f64) -> Vec<(f64, f64)> {
        let mut out = Vec::new();
        let mut i = self.tree.count_lt(x);
        while let Some(entry) = self.tree.select(i) {
            out.push(entry);
            i += 1;
        }
        out
    }
}
