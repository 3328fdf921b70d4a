//! Empirical attainment function (EAF) level sets.
//!
//! Given K independent approximation sets, the EAF at a point in objective
//! space is the fraction of sets whose front weakly dominates that point.
//! Rather than evaluating the function everywhere, the engine returns its
//! discrete level sets: for each level `t` in `1..=K`, the minimal points
//! of the region attained by at least `t` sets. Level 1 is the "best ever"
//! surface, level K the "attained by every run" surface, and intermediate
//! levels give percentile summaries of a stochastic optimizer.
//!
//! Two objectives run an exact sweep over x with a tree of per-set column
//! minima; three objectives sweep z-planes, maintaining one xy staircase
//! per input set plus one per output level. Higher dimensions are not
//! supported.
//!
//! # Example
//!
//! ```
//! use mometrics::{eaf, Direction, PointSet, SetCollection};
//!
//! let run1 = PointSet::from_rows(&[vec![1.0, 3.0], vec![3.0, 1.0]]).unwrap();
//! let run2 = PointSet::from_rows(&[vec![2.0, 2.0]]).unwrap();
//! let collection = SetCollection::from_sets(&[run1, run2]).unwrap();
//! let dirs = [Direction::Minimize, Direction::Minimize];
//!
//! let surface = eaf(&collection, &dirs).unwrap();
//! // Level 1 holds the three jointly nondominated points; level 2 the
//! // two corners attained by both runs.
//! assert_eq!(surface.iter().filter(|p| p.level == 1).count(), 3);
//! assert_eq!(surface.iter().filter(|p| p.level == 2).count(), 2);
//! ```

use core::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{Error, Result};
use crate::ostree::OsTree;
use crate::set::{check_directions, minimized, SetCollection};
use crate::staircase::Staircase;
use crate::types::Direction;

/// One point of an attainment surface.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AttainmentPoint {
    /// Coordinates in the caller's objective orientation.
    pub point: Vec<f64>,
    /// Attainment level, `1..=K` for K input sets.
    pub level: usize,
    /// The level as a percentile of K, `100 * level / K`.
    pub percentile: f64,
}

/// All EAF level sets of a collection, levels ascending.
///
/// Within a level, points are sorted by the sweep order: ascending first
/// objective for two objectives, ascending (third, first, second) for
/// three, in minimize-space.
///
/// # Errors
///
/// [`Error::UnsupportedDimension`] unless the collection has two or three
/// objectives, [`Error::EmptyInput`] when it holds no sets,
/// [`Error::DimensionMismatch`] for mis-sized `directions`.
pub fn eaf(collection: &SetCollection, directions: &[Direction]) -> Result<Vec<AttainmentPoint>> {
    let nobj = collection.nobj();
    check_directions(directions, nobj)?;
    if collection.is_empty() {
        return Err(Error::EmptyInput);
    }
    let surface = match nobj {
        2 => eaf2d(collection, directions),
        3 => eaf3d(collection, directions),
        _ => {
            return Err(Error::UnsupportedDimension {
                operation: "eaf",
                supported: "2 or 3",
                got: nobj,
            })
        }
    };
    trace_debug!(points = surface.len(), "attainment surfaces computed");
    Ok(surface)
}

/// The attainment surfaces closest to the requested percentiles.
///
/// A percentile `p` in `(0, 100]` maps to level `ceil(p * K / 100)`, with
/// a small tolerance so that `100 * t / K` always maps back to level `t`.
/// Surfaces are returned in the order requested; asking for two
/// percentiles that resolve to the same level repeats that surface.
///
/// # Errors
///
/// [`Error::InvalidPercentile`] for a percentile outside `(0, 100]`, plus
/// everything [`eaf`] rejects.
pub fn eaf_at_percentiles(
    collection: &SetCollection,
    directions: &[Direction],
    percentiles: &[f64],
) -> Result<Vec<AttainmentPoint>> {
    for &p in percentiles {
        if !(p > 0.0 && p <= 100.0) {
            return Err(Error::InvalidPercentile(p));
        }
    }
    let all = eaf(collection, directions)?;
    let k_sets = collection.n_sets();
    let mut out = Vec::new();
    for &p in percentiles {
        let level = percentile_level(p, k_sets);
        out.extend(all.iter().filter(|ap| ap.level == level).cloned());
    }
    Ok(out)
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentile_level(percentile: f64, k_sets: usize) -> usize {
    // The tolerance keeps 100 * t / K, fed back in, from rounding up to
    // level t + 1.
    let raw = (percentile * k_sets as f64 / 100.0 - 1e-9).ceil() as usize;
    raw.clamp(1, k_sets)
}

/// Exact 2D sweep: walk distinct x values left to right, keep each set's
/// lowest y seen so far in an order-statistics tree, and emit a level-t
/// point whenever the t-th smallest of those minima strictly drops.
fn eaf2d(collection: &SetCollection, directions: &[Direction]) -> Vec<AttainmentPoint> {
    let k_sets = collection.n_sets();
    let data = minimized(collection.points().as_flat(), 2, directions);

    let mut events: Vec<(f64, f64, usize)> = Vec::with_capacity(collection.len());
    for k in 0..k_sets {
        for i in collection.set_range(k) {
            events.push((data[2 * i], data[2 * i + 1], k));
        }
    }
    events.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then(a.1.total_cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });

    let mut set_min = vec![f64::INFINITY; k_sets];
    let mut minima = OsTree::new();
    let mut last = vec![f64::INFINITY; k_sets + 1];
    let mut levels: Vec<Vec<Vec<f64>>> = vec![Vec::new(); k_sets];

    let mut idx = 0;
    while idx < events.len() {
        let x = events[idx].0;
        let mut end = idx;
        while end < events.len() && events[end].0.total_cmp(&x) == Ordering::Equal {
            end += 1;
        }
        for &(_, y, k) in &events[idx..end] {
            if y < set_min[k] {
                if set_min[k].is_finite() {
                    minima.remove(set_min[k]);
                }
                minima.insert(y, y);
                set_min[k] = y;
            }
        }
        for t in 1..=minima.len() {
            if let Some((cur, _)) = minima.select(t - 1) {
                if cur < last[t] {
                    levels[t - 1].push(vec![x, cur]);
                    last[t] = cur;
                }
            }
        }
        idx = end;
    }
    assemble(levels, k_sets, directions)
}

/// 3D sweep in ascending z. Each input set keeps the xy staircase of its
/// points so far; each output level keeps the staircase of its emitted
/// points, which doubles as the "already attained" test. Inserting one
/// point re-sweeps x from that point rightward, tracking every set's
/// prefix minimum in an order-statistics tree.
fn eaf3d(collection: &SetCollection, directions: &[Direction]) -> Vec<AttainmentPoint> {
    let k_sets = collection.n_sets();
    let data = minimized(collection.points().as_flat(), 3, directions);

    let mut points: Vec<([f64; 3], usize)> = Vec::with_capacity(collection.len());
    for k in 0..k_sets {
        for i in collection.set_range(k) {
            points.push(([data[3 * i], data[3 * i + 1], data[3 * i + 2]], k));
        }
    }
    points.sort_by(|a, b| {
        a.0[2]
            .total_cmp(&b.0[2])
            .then(a.0[0].total_cmp(&b.0[0]))
            .then(a.0[1].total_cmp(&b.0[1]))
            .then(a.1.cmp(&b.1))
    });

    let mut region: Vec<Staircase> = (0..k_sets).map(|_| Staircase::new()).collect();
    let mut surface: Vec<Staircase> = (0..k_sets).map(|_| Staircase::new()).collect();
    let mut levels: Vec<Vec<Vec<f64>>> = vec![Vec::new(); k_sets];
    let mut prefix = vec![f64::INFINITY; k_sets];

    for &([px, py, pz], j) in &points {
        if region[j].dominates(px, py) {
            continue;
        }
        region[j].insert(px, py);

        // Sweep events: every set's staircase steps strictly right of px.
        let mut events: Vec<(f64, f64, usize)> = Vec::new();
        for (k, stairs) in region.iter().enumerate() {
            for (sx, sy) in stairs.entries_ge(px) {
                if sx > px {
                    events.push((sx, sy, k));
                }
            }
        }
        events.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.2.cmp(&b.2)));

        let mut minima = OsTree::new();
        for (k, stairs) in region.iter().enumerate() {
            let a = stairs.min_y_le(px);
            prefix[k] = a;
            if a.is_finite() {
                minima.insert(a, a);
            }
        }
        emit_levels(&minima, &mut surface, &mut levels, px, pz);

        let mut idx = 0;
        while idx < events.len() {
            let u = events[idx].0;
            let mut end = idx;
            while end < events.len() && events[end].0.total_cmp(&u) == Ordering::Equal {
                end += 1;
            }
            for &(_, ey, ek) in &events[idx..end] {
                if ey < prefix[ek] {
                    if prefix[ek].is_finite() {
                        minima.remove(prefix[ek]);
                    }
                    minima.insert(ey, ey);
                    prefix[ek] = ey;
                }
            }
            emit_levels(&minima, &mut surface, &mut levels, u, pz);
            // Once every set's prefix minimum sits below py, nothing right
            // of u can have changed with this insertion.
            if minima.len() == k_sets {
                if let Some((max_min, _)) = minima.select(k_sets - 1) {
                    if max_min < py {
                        break;
                    }
                }
            }
            idx = end;
        }
    }
    for pts in &mut levels {
        pts.sort_by(|a, b| {
            a[2].total_cmp(&b[2])
                .then(a[0].total_cmp(&b[0]))
                .then(a[1].total_cmp(&b[1]))
        });
    }
    assemble(levels, k_sets, directions)
}

/// Emit a level-t point at `(u, t-th smallest prefix minimum)` for every
/// level whose surface does not already attain it.
fn emit_levels(
    minima: &OsTree,
    surface: &mut [Staircase],
    levels: &mut [Vec<Vec<f64>>],
    u: f64,
    z: f64,
) {
    for t in 1..=minima.len() {
        if let Some((cur, _)) = minima.select(t - 1) {
            if !surface[t - 1].dominates(u, cur) {
                surface[t - 1].insert(u, cur);
                levels[t - 1].push(vec![u, cur, z]);
            }
        }
    }
}

/// Map minimize-space level lists back to caller orientation and attach
/// level/percentile labels.
#[allow(clippy::cast_precision_loss)]
fn assemble(
    levels: Vec<Vec<Vec<f64>>>,
    k_sets: usize,
    directions: &[Direction],
) -> Vec<AttainmentPoint> {
    let mut out = Vec::new();
    for (li, pts) in levels.into_iter().enumerate() {
        let level = li + 1;
        let percentile = 100.0 * level as f64 / k_sets as f64;
        for p in pts {
            let point: Vec<f64> = p
                .iter()
                .zip(directions)
                .map(|(&v, dir)| dir.to_minimize(v))
                .collect();
            out.push(AttainmentPoint {
                point,
                level,
                percentile,
            });
        }
    }
    out
}
