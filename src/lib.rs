#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Quality indicators for multi-objective optimization. Given the
//! nondominated fronts produced by one or more optimizer runs, this crate
//! answers "how good are they": Pareto dominance filtering, exact and
//! Monte-Carlo weighted hypervolume, epsilon and distance indicators,
//! empirical attainment functions with their pairwise differences, and
//! Vorob'ev expectation statistics. Every operation honors per-objective
//! minimize/maximize directions, and no feature flags are required.
//!
//! # Getting Started
//!
//! Score a front against a reference point:
//!
//! ```
//! use mometrics::prelude::*;
//!
//! let front = PointSet::from_rows(&[
//!     vec![1.0, 3.0],
//!     vec![2.0, 2.0],
//!     vec![3.0, 1.0],
//! ])
//! .unwrap();
//! let dirs = [Direction::Minimize, Direction::Minimize];
//!
//! let hv = hypervolume(&front, &[4.0, 4.0], &dirs).unwrap();
//! assert_eq!(hv, 6.0);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`PointSet`] | A validated set of points in objective space, stored row-major. |
//! | [`SetCollection`] | Several approximation sets back to back, e.g. one per optimizer run. |
//! | [`Direction`] | Whether an objective is minimized or maximized. |
//! | [`Error`] / [`Result`] | What every fallible operation returns. |
//!
//! # Indicator Guide
//!
//! ## Dominance
//!
//! | Function | Computes |
//! |----------|----------|
//! | [`is_nondominated`] | which points of a set survive Pareto filtering |
//! | [`filter_nondominated`] | the surviving points themselves |
//! | [`filter_nondominated_sets`] | per-set filtering inside a collection |
//! | [`pareto_rank`] | nondominated sorting front indices |
//!
//! ## Unary quality indicators
//!
//! | Function | Indicator |
//! |----------|-----------|
//! | [`hypervolume`] | exact hypervolume in any dimension |
//! | [`hypervolume_contributions`] | exclusive hypervolume per point |
//! | [`rect_weighted_hypervolume`] | 2D hypervolume under a piecewise-constant weight |
//! | [`whv_hype`] | Monte-Carlo weighted hypervolume (`HypE` sampling) |
//! | [`epsilon_additive`] / [`epsilon_multiplicative`] | epsilon indicators against a reference set |
//! | [`gd`] / [`igd`] / [`igd_plus`] | generational distances against a reference set |
//! | [`avg_hausdorff`] | averaged Hausdorff distance |
//!
//! ## Attainment analysis
//!
//! | Function | Computes |
//! |----------|----------|
//! | [`eaf()`] | empirical attainment surfaces of a collection (2D and 3D) |
//! | [`eaf_at_percentiles`] | the surfaces nearest the requested percentiles |
//! | [`eafdiff()`] | pointwise difference between two collections' attainment |
//! | [`eafdiff_rectangles`] / [`eafdiff_polygons`] | the same difference as plottable regions |
//! | [`vorobev_threshold`] | Vorob'ev threshold, expectation and mean hypervolume |
//! | [`vorobev_deviation`] | spread of a collection around an expectation |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize` on public types, `Deserialize` on input types | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at key computation points | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod distance;
pub mod eaf;
pub mod eafdiff;
pub mod epsilon;
mod error;
pub mod hypervolume;
mod ostree;
pub mod pareto;
mod set;
mod staircase;
mod types;
pub mod vorob;
pub mod whv;

pub use distance::{avg_hausdorff, gd, igd, igd_plus};
pub use eaf::{eaf, eaf_at_percentiles, AttainmentPoint};
pub use eafdiff::{
    eafdiff, eafdiff_polygons, eafdiff_rectangles, DiffPoint, DiffPolygon, DiffRectangle,
};
pub use epsilon::{epsilon_additive, epsilon_multiplicative};
pub use error::{Error, Result};
pub use hypervolume::{hypervolume, hypervolume_contributions, hypervolume_filtered};
pub use pareto::{
    filter_nondominated, filter_nondominated_sets, is_nondominated, pareto_rank,
    strictly_dominates, weakly_dominates,
};
pub use set::{normalize, PointSet, SetCollection};
pub use types::Direction;
pub use vorob::{vorobev_deviation, vorobev_threshold, Vorobev};
pub use whv::{rect_weighted_hypervolume, whv_hype, WeightDistribution, WeightedRectangle};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use mometrics::prelude::*;
/// ```
pub mod prelude {
    pub use crate::distance::{avg_hausdorff, gd, igd, igd_plus};
    pub use crate::eaf::{eaf, eaf_at_percentiles, AttainmentPoint};
    pub use crate::eafdiff::{
        eafdiff, eafdiff_polygons, eafdiff_rectangles, DiffPoint, DiffPolygon, DiffRectangle,
    };
    pub use crate::epsilon::{epsilon_additive, epsilon_multiplicative};
    pub use crate::error::{Error, Result};
    pub use crate::hypervolume::{hypervolume, hypervolume_contributions, hypervolume_filtered};
    pub use crate::pareto::{
        filter_nondominated, filter_nondominated_sets, is_nondominated, pareto_rank,
        strictly_dominates, weakly_dominates,
    };
    pub use crate::set::{normalize, PointSet, SetCollection};
    pub use crate::types::Direction;
    pub use crate::vorob::{vorobev_deviation, vorobev_threshold, Vorobev};
    pub use crate::whv::{
        rect_weighted_hypervolume, whv_hype, WeightDistribution, WeightedRectangle,
    };
}
