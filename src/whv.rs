//! Weighted hypervolume: exact over rectangle partitions, Monte-Carlo
//! under a weight distribution.
//!
//! Plain hypervolume values every unit of dominated space equally. The two
//! operations here skew that measure toward regions the caller cares
//! about:
//!
//! * [`rect_weighted_hypervolume`] intersects the dominated region with a
//!   set of axis-aligned rectangles, each carrying its own weight, and
//!   sums the weighted overlap areas exactly.
//! * [`whv_hype`] estimates the integral of a weight density over the
//!   dominated part of an `[ideal, reference]` box by importance sampling,
//!   after the `HypE` scheme. Given the same seed it is bit-reproducible.
//!
//! Both are defined for two objectives only.

use crate::error::{Error, Result};
use crate::pareto::nondominated_min_rows;
use crate::set::{check_directions, check_point, minimized, minimized_point, PointSet};
use crate::types::Direction;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with an attached weight.
///
/// Corners are given in the caller's objective orientation; maximized
/// objectives are renormalized together with the points.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeightedRectangle {
    /// Lower x corner.
    pub xmin: f64,
    /// Lower y corner.
    pub ymin: f64,
    /// Upper x corner.
    pub xmax: f64,
    /// Upper y corner.
    pub ymax: f64,
    /// Weight applied to the overlap area.
    pub weight: f64,
}

/// Weight density over objective space for [`whv_hype`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WeightDistribution {
    /// Every point in the sampling box weighs the same.
    Uniform,
    /// Per-axis exponential decay away from the ideal point.
    Exponential {
        /// Rate parameter; larger means slower decay. Must be positive.
        mu: f64,
    },
    /// Gaussian bell centered on a goal point, with per-axis spread equal
    /// to a quarter of the sampling box extent.
    PointGoal {
        /// Center of the bell, in the caller's objective orientation.
        goal: Vec<f64>,
    },
}

/// Exact weighted hypervolume over a rectangle partition.
///
/// The region weakly dominated by `set` (unbounded above) is intersected
/// with every rectangle; the result is the sum of `weight * overlap_area`
/// over rectangles. Rectangles may overlap or leave gaps; each is
/// accounted for independently.
///
/// # Errors
///
/// [`Error::UnsupportedDimension`] unless the set has exactly two
/// objectives, [`Error::InvalidRectangle`] for a rectangle with inverted
/// corners or non-finite fields, [`Error::EmptyInput`] for an empty set,
/// [`Error::DimensionMismatch`] for mis-sized `directions`.
pub fn rect_weighted_hypervolume(
    set: &PointSet,
    rectangles: &[WeightedRectangle],
    directions: &[Direction],
) -> Result<f64> {
    let nobj = set.nobj();
    if nobj != 2 {
        return Err(Error::UnsupportedDimension {
            operation: "rect_weighted_hypervolume",
            supported: "2",
            got: nobj,
        });
    }
    check_directions(directions, 2)?;
    if set.is_empty() {
        return Err(Error::EmptyInput);
    }
    for (i, r) in rectangles.iter().enumerate() {
        let finite =
            [r.xmin, r.ymin, r.xmax, r.ymax, r.weight].iter().all(|v| v.is_finite());
        if !finite || r.xmin > r.xmax || r.ymin > r.ymax {
            return Err(Error::InvalidRectangle(i));
        }
    }

    let data = minimized(set.as_flat(), 2, directions);
    let front = front_2d(&data);
    let mut total = 0.0;
    for r in rectangles {
        // Rectangle corners move to minimize-space with the points; a
        // negated axis swaps its corners.
        let (left, right) = normalize_interval(r.xmin, r.xmax, directions[0]);
        let (low, high) = normalize_interval(r.ymin, r.ymax, directions[1]);
        let mut area = 0.0;
        for (i, &(x, y)) in front.iter().enumerate() {
            // Strip of the dominated region: [x, next_x) x [y, inf).
            let next_x = front.get(i + 1).map_or(f64::INFINITY, |s| s.0);
            let width = next_x.min(right) - x.max(left);
            let height = high - y.max(low);
            if width > 0.0 && height > 0.0 {
                area += width * height;
            }
        }
        total += r.weight * area;
    }
    Ok(total)
}

/// Monte-Carlo weighted hypervolume estimate, two objectives only.
///
/// Draws `n_samples` points from `distribution` (uniform draws fill the
/// `[ideal, reference]` box; the others sample their own law) and counts
/// the samples that land inside the box and are weakly dominated by the
/// set. Sampling from the weight density itself makes the hit fraction an
/// unbiased estimate of the weighted hypervolume; under the uniform
/// distribution the fraction is scaled by the box volume.
///
/// The estimate is deterministic in `seed`: equal inputs and equal seeds
/// reproduce the result bit for bit.
///
/// # Errors
///
/// [`Error::UnsupportedDimension`] unless the set has exactly two
/// objectives, [`Error::InvalidBounds`] when `ideal` does not weakly
/// dominate `reference`, [`Error::NonPositiveRate`] for a non-positive
/// exponential rate, [`Error::ZeroSamples`], [`Error::EmptyInput`], and
/// the usual dimension/finiteness checks on `ideal`, `reference`, and a
/// point-goal center.
pub fn whv_hype(
    set: &PointSet,
    ideal: &[f64],
    reference: &[f64],
    directions: &[Direction],
    distribution: &WeightDistribution,
    n_samples: usize,
    seed: u64,
) -> Result<f64> {
    let nobj = set.nobj();
    if nobj != 2 {
        return Err(Error::UnsupportedDimension {
            operation: "whv_hype",
            supported: "2",
            got: nobj,
        });
    }
    check_directions(directions, 2)?;
    check_point(ideal, 2)?;
    check_point(reference, 2)?;
    if set.is_empty() {
        return Err(Error::EmptyInput);
    }
    if n_samples == 0 {
        return Err(Error::ZeroSamples);
    }
    let ideal = minimized_point(ideal, directions);
    let reference = minimized_point(reference, directions);
    for d in 0..2 {
        if ideal[d] > reference[d] {
            return Err(Error::InvalidBounds {
                low: ideal[d],
                high: reference[d],
            });
        }
    }

    let data = minimized(set.as_flat(), 2, directions);
    let front = front_2d(&data);
    let mut rng = fastrand::Rng::with_seed(seed);
    let in_box = |x: f64, y: f64| {
        x >= ideal[0] && x <= reference[0] && y >= ideal[1] && y <= reference[1]
    };

    let mut hits = 0_u64;
    let scale = match distribution {
        WeightDistribution::Uniform => {
            for _ in 0..n_samples {
                let x = f64_range(&mut rng, ideal[0], reference[0]);
                let y = f64_range(&mut rng, ideal[1], reference[1]);
                if front_attains(&front, x, y) {
                    hits += 1;
                }
            }
            (reference[0] - ideal[0]) * (reference[1] - ideal[1])
        }
        WeightDistribution::Exponential { mu } => {
            if *mu <= 0.0 {
                return Err(Error::NonPositiveRate(*mu));
            }
            for _ in 0..n_samples {
                // Inverse-transform sampling; 1 - u stays in (0, 1].
                let x = ideal[0] - mu * (1.0 - rng.f64()).ln();
                let y = ideal[1] - mu * (1.0 - rng.f64()).ln();
                if in_box(x, y) && front_attains(&front, x, y) {
                    hits += 1;
                }
            }
            1.0
        }
        WeightDistribution::PointGoal { goal } => {
            check_point(goal, 2)?;
            let goal = minimized_point(goal, directions);
            let sigma = [
                (reference[0] - ideal[0]) / 4.0,
                (reference[1] - ideal[1]) / 4.0,
            ];
            for _ in 0..n_samples {
                let x = goal[0] + sigma[0] * sample_standard_normal(&mut rng);
                let y = goal[1] + sigma[1] * sample_standard_normal(&mut rng);
                if in_box(x, y) && front_attains(&front, x, y) {
                    hits += 1;
                }
            }
            1.0
        }
    };
    #[allow(clippy::cast_precision_loss)]
    let estimate = scale * hits as f64 / n_samples as f64;
    trace_debug!(estimate, "weighted hypervolume sampled");
    Ok(estimate)
}

/// Nondominated front of flat minimize-space 2D rows, ascending in x with
/// strictly decreasing y.
fn front_2d(data: &[f64]) -> Vec<(f64, f64)> {
    nondominated_min_rows(data, 2)
        .chunks_exact(2)
        .map(|r| (r[0], r[1]))
        .collect()
}

/// Whether the front weakly dominates `(x, y)`.
fn front_attains(front: &[(f64, f64)], x: f64, y: f64) -> bool {
    let idx = front.partition_point(|&(fx, _)| fx <= x);
    idx > 0 && front[idx - 1].1 <= y
}

/// Map a caller-space interval onto minimize-space; negation swaps ends.
fn normalize_interval(low: f64, high: f64, direction: Direction) -> (f64, f64) {
    match direction {
        Direction::Minimize => (low, high),
        Direction::Maximize => (-high, -low),
    }
}

/// Uniform draw in `[low, high)`.
#[inline]
fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Sample a value from the standard normal distribution using Box-Muller transform.
fn sample_standard_normal(rng: &mut fastrand::Rng) -> f64 {
    // Box-Muller transform
    let u1 = f64_range(rng, f64::EPSILON, 1.0);
    let u2 = f64_range(rng, 0.0, core::f64::consts::TAU);
    (-2.0 * u1.ln()).sqrt() * u2.cos()
}
