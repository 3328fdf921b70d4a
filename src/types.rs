//! Core types shared across the crate.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The optimization direction of a single objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Smaller values are better.
    Minimize,
    /// Larger values are better.
    Maximize,
}

impl Direction {
    /// Map a value into minimize-space (negate when maximizing).
    ///
    /// Every indicator in this crate computes in minimize-space and maps
    /// results back; this is the single place where the sign convention
    /// lives.
    #[inline]
    #[must_use]
    pub fn to_minimize(self, value: f64) -> f64 {
        match self {
            Self::Minimize => value,
            Self::Maximize => -value,
        }
    }
}
