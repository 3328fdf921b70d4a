//! Epsilon indicators against a reference set.
//!
//! The additive epsilon indicator is the smallest amount by which every
//! point of the approximation set would have to improve, uniformly in
//! all objectives, so that each reference point ends up weakly
//! dominated. The multiplicative variant asks for a factor instead of a
//! shift and therefore requires strictly positive values throughout.
//!
//! Smaller is better for both; the additive value is negative and the
//! multiplicative one below 1 when the approximation set already
//! dominates the whole reference set strictly.
//!
//! # Example
//!
//! ```
//! use mometrics::{epsilon_additive, Direction, PointSet};
//!
//! let set = PointSet::from_rows(&[
//!     vec![3.5, 5.5],
//!     vec![3.6, 4.1],
//!     vec![4.1, 3.2],
//!     vec![5.5, 1.5],
//! ])
//! .unwrap();
//! let reference = PointSet::from_rows(&[
//!     vec![1.0, 6.0],
//!     vec![2.0, 5.0],
//!     vec![3.0, 4.0],
//!     vec![4.0, 3.0],
//!     vec![5.0, 2.0],
//!     vec![6.0, 1.0],
//! ])
//! .unwrap();
//! let dirs = [Direction::Minimize, Direction::Minimize];
//!
//! let eps = epsilon_additive(&set, &reference, &dirs).unwrap();
//! assert!((eps - 2.5).abs() < 1e-12);
//! ```

use crate::error::{Error, Result};
use crate::set::{check_front_pair, PointSet};
use crate::types::Direction;

/// Additive epsilon indicator of `set` relative to `reference`.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] when the sets or `directions` disagree
/// on the objective count, [`Error::EmptyInput`] when either set is
/// empty.
pub fn epsilon_additive(
    set: &PointSet,
    reference: &PointSet,
    directions: &[Direction],
) -> Result<f64> {
    check_front_pair(set, reference, directions)?;
    Ok(worst_shift(set, reference, directions, |a, r, dir| {
        match dir {
            Direction::Minimize => a - r,
            Direction::Maximize => r - a,
        }
    }))
}

/// Multiplicative epsilon indicator of `set` relative to `reference`.
///
/// # Errors
///
/// Everything [`epsilon_additive`] rejects, plus
/// [`Error::NonPositiveValue`] when any coordinate of either set is
/// zero or negative (ratios would be meaningless). Coordinates of `set`
/// are checked before those of `reference`.
pub fn epsilon_multiplicative(
    set: &PointSet,
    reference: &PointSet,
    directions: &[Direction],
) -> Result<f64> {
    check_front_pair(set, reference, directions)?;
    check_positive(set)?;
    check_positive(reference)?;
    Ok(worst_shift(set, reference, directions, |a, r, dir| {
        match dir {
            Direction::Minimize => a / r,
            Direction::Maximize => r / a,
        }
    }))
}

/// Outer maximum over reference points of the inner minimum over set
/// points of the worst per-objective term.
fn worst_shift<F>(
    set: &PointSet,
    reference: &PointSet,
    directions: &[Direction],
    term: F,
) -> f64
where
    F: Fn(f64, f64, Direction) -> f64,
{
    let mut worst = f64::NEG_INFINITY;
    for r in reference.rows() {
        let mut best = f64::INFINITY;
        for a in set.rows() {
            let mut need = f64::NEG_INFINITY;
            for ((&av, &rv), &dir) in a.iter().zip(r).zip(directions) {
                need = need.max(term(av, rv, dir));
            }
            best = best.min(need);
        }
        worst = worst.max(best);
    }
    worst
}

fn check_positive(set: &PointSet) -> Result<()> {
    for (i, row) in set.rows().enumerate() {
        for (d, &v) in row.iter().enumerate() {
            if v <= 0.0 {
                return Err(Error::NonPositiveValue {
                    value: v,
                    point: i,
                    objective: d,
                });
            }
        }
    }
    Ok(())
}
