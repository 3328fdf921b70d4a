//! Exact hypervolume: the measure of objective space dominated by a front.
//!
//! The hypervolume indicator is the Lebesgue measure of the union of boxes
//! spanned between each point and a reference point that every point must
//! weakly dominate. A higher hypervolume means a better front, closer to
//! the ideal and more spread out.
//!
//! Three exact algorithms are dispatched on dimension:
//!
//! | Objectives | Algorithm | Cost |
//! |---|---|---|
//! | 2 | sorted sweep over x, tracking the running minimum y | O(n log n) |
//! | 3 | plane sweep over z maintaining the xy staircase | O(n log n) |
//! | 4+ | recursive slicing on the last objective | exponential in D |
//!
//! # Example
//!
//! ```
//! use mometrics::{hypervolume, Direction, PointSet};
//!
//! let front = PointSet::from_rows(&[vec![1.0, 3.0], vec![2.0, 2.0], vec![3.0, 1.0]]).unwrap();
//! let dirs = [Direction::Minimize, Direction::Minimize];
//! let hv = hypervolume(&front, &[4.0, 4.0], &dirs).unwrap();
//! assert!((hv - 6.0).abs() < 1e-10);
//! ```

use crate::error::{Error, Result};
use crate::pareto::nondominated_min_rows;
use crate::set::{check_directions, check_point, minimized, minimized_point, PointSet};
use crate::staircase::Staircase;
use crate::types::Direction;

/// Hypervolume of `set` relative to `reference`.
///
/// The reference must be weakly dominated by every point; a point that
/// beats the reference in any objective is a usage error, signaled rather
/// than silently clamped. Points equal to the reference in some objective
/// are feasible and contribute zero volume.
///
/// # Errors
///
/// [`Error::InfeasibleReference`] naming the first offending point,
/// [`Error::EmptyInput`] for an empty set, [`Error::DimensionMismatch`] /
/// [`Error::NonFinite`] for a malformed `reference` or `directions`.
pub fn hypervolume(set: &PointSet, reference: &[f64], directions: &[Direction]) -> Result<f64> {
    let (data, reference) = prepare_strict(set, reference, directions)?;
    let value = hv_minimized(&data, set.nobj(), &reference);
    trace_debug!(value, "hypervolume computed");
    Ok(value)
}

/// Hypervolume that silently excludes points outside the reference box.
///
/// Points not strictly better than the reference in every objective
/// contribute nothing and are dropped; use this when fronts may legally
/// extend past the region of interest.
///
/// # Errors
///
/// [`Error::EmptyInput`] for an empty set, [`Error::DimensionMismatch`] /
/// [`Error::NonFinite`] for a malformed `reference` or `directions`.
pub fn hypervolume_filtered(
    set: &PointSet,
    reference: &[f64],
    directions: &[Direction],
) -> Result<f64> {
    let nobj = set.nobj();
    check_directions(directions, nobj)?;
    check_point(reference, nobj)?;
    if set.is_empty() {
        return Err(Error::EmptyInput);
    }
    let data = minimized(set.as_flat(), nobj, directions);
    let reference = minimized_point(reference, directions);
    Ok(hv_minimized(&data, nobj, &reference))
}

/// Exclusive hypervolume contribution of every point, in input order.
///
/// Each contribution is the total hypervolume minus the hypervolume with
/// that point removed, recomputed exactly per point. Points fully covered
/// by others report exactly 0.
///
/// # Errors
///
/// Same conditions as [`hypervolume`].
pub fn hypervolume_contributions(
    set: &PointSet,
    reference: &[f64],
    directions: &[Direction],
) -> Result<Vec<f64>> {
    let (data, reference) = prepare_strict(set, reference, directions)?;
    let nobj = set.nobj();
    let total = hv_minimized(&data, nobj, &reference);
    let n = set.len();
    let mut contributions = Vec::with_capacity(n);
    let mut rest = Vec::with_capacity(data.len().saturating_sub(nobj));
    for i in 0..n {
        rest.clear();
        rest.extend_from_slice(&data[..i * nobj]);
        rest.extend_from_slice(&data[(i + 1) * nobj..]);
        let without = hv_minimized(&rest, nobj, &reference);
        // Exact arithmetic would never go negative; cancellation can.
        contributions.push((total - without).max(0.0));
    }
    Ok(contributions)
}

/// Validate inputs and convert to minimize-space, rejecting points the
/// reference fails to weakly dominate.
fn prepare_strict(
    set: &PointSet,
    reference: &[f64],
    directions: &[Direction],
) -> Result<(Vec<f64>, Vec<f64>)> {
    let nobj = set.nobj();
    check_directions(directions, nobj)?;
    check_point(reference, nobj)?;
    if set.is_empty() {
        return Err(Error::EmptyInput);
    }
    let data = minimized(set.as_flat(), nobj, directions);
    let reference = minimized_point(reference, directions);
    for (i, row) in data.chunks_exact(nobj).enumerate() {
        if row.iter().zip(reference.iter()).any(|(&p, &r)| p > r) {
            return Err(Error::InfeasibleReference { point: i });
        }
    }
    Ok((data, reference))
}

/// Hypervolume of minimize-space rows; zero-contribution points drop out.
fn hv_minimized(data: &[f64], nobj: usize, reference: &[f64]) -> f64 {
    let mut kept = Vec::with_capacity(data.len());
    for row in data.chunks_exact(nobj) {
        if row.iter().zip(reference.iter()).all(|(&p, &r)| p < r) {
            kept.extend_from_slice(row);
        }
    }
    if kept.is_empty() {
        return 0.0;
    }
    hv_any(&kept, nobj, reference)
}

/// Dispatch on dimension. All rows strictly dominate the reference.
fn hv_any(data: &[f64], nobj: usize, reference: &[f64]) -> f64 {
    match nobj {
        2 => hv2d(data, reference),
        3 => hv3d(data, reference),
        _ => hv_sliced(data, nobj, reference),
    }
}

fn hv2d(data: &[f64], reference: &[f64]) -> f64 {
    let mut rows: Vec<(f64, f64)> = data.chunks_exact(2).map(|r| (r[0], r[1])).collect();
    rows.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    let mut hv = 0.0;
    let mut min_y = f64::INFINITY;
    for (i, &(x, y)) in rows.iter().enumerate() {
        let next_x = rows.get(i + 1).map_or(reference[0], |r| r.0);
        min_y = min_y.min(y);
        hv += (next_x - x) * (reference[1] - min_y);
    }
    hv
}

/// Plane sweep over the third coordinate.
///
/// Between consecutive z events the dominated xy area is constant; each
/// surviving point extends the staircase and grows that area by the strip
/// between its own y and the steps it displaces.
fn hv3d(data: &[f64], reference: &[f64]) -> f64 {
    let mut rows: Vec<[f64; 3]> = data.chunks_exact(3).map(|r| [r[0], r[1], r[2]]).collect();
    rows.sort_by(|a, b| {
        a[2].total_cmp(&b[2])
            .then(a[0].total_cmp(&b[0]))
            .then(a[1].total_cmp(&b[1]))
    });
    let (rx, ry, rz) = (reference[0], reference[1], reference[2]);
    let mut stairs = Staircase::new();
    let mut volume = 0.0;
    let mut area = 0.0;
    let mut prev_z = rows[0][2];
    for &[x, y, z] in &rows {
        if stairs.dominates(x, y) {
            continue;
        }
        volume += area * (z - prev_z);
        prev_z = z;
        let update = stairs.insert(x, y);
        let ceiling = update.left_y.min(ry);
        let x_end = update.right_x.min(rx);
        match (update.removed.first(), update.removed.last()) {
            (Some(&(leftmost, _)), Some(&(rightmost, rightmost_y))) => {
                area += (leftmost - x) * (ceiling - y);
                for pair in update.removed.windows(2) {
                    area += (pair[1].0 - pair[0].0) * (pair[0].1 - y);
                }
                area += (x_end - rightmost) * (rightmost_y - y);
            }
            _ => area += (x_end - x) * (ceiling - y),
        }
    }
    volume + area * (rz - prev_z)
}

/// Hypervolume by slicing objectives: sort on the last coordinate and sum
/// slice thickness times the (D-1)-dimensional hypervolume of each prefix.
fn hv_sliced(data: &[f64], nobj: usize, reference: &[f64]) -> f64 {
    debug_assert!(nobj >= 4);
    let n = data.len() / nobj;
    let last = nobj - 1;
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| data[i * nobj + last].total_cmp(&data[j * nobj + last]));

    let sub_ref = &reference[..last];
    let mut prefix: Vec<f64> = Vec::with_capacity(n * last);
    let mut result = 0.0;
    for (i, &pi) in order.iter().enumerate() {
        let row = &data[pi * nobj..(pi + 1) * nobj];
        prefix.extend_from_slice(&row[..last]);
        let height = if i + 1 < n {
            data[order[i + 1] * nobj + last] - row[last]
        } else {
            reference[last] - row[last]
        };
        if height <= 0.0 {
            continue;
        }
        let front = nondominated_min_rows(&prefix, last);
        result += height * hv_any(&front, last, sub_ref);
    }
    result
}
