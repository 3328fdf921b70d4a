//! Distance-based indicators against a reference set.
//!
//! | Function | Measures |
//! |----------|----------|
//! | [`gd`] | mean distance from each set point to its nearest reference point |
//! | [`igd`] | mean distance from each reference point to its nearest set point |
//! | [`igd_plus`] | like [`igd`] but counting only the dominated component of each distance |
//! | [`avg_hausdorff`] | `max(GD_p, IGD_p)`, the averaged Hausdorff distance |
//!
//! GD and IGD use plain Euclidean distance, so they are blind to the
//! optimization direction; IGD+ clamps each coordinate difference to the
//! worsening side and is therefore weakly Pareto compliant. The order-`p`
//! generalizations take the mean of the `p`-th powers before the `p`-th
//! root.
//!
//! # Example
//!
//! ```
//! use mometrics::{igd, Direction, PointSet};
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
//! let value = igd(&set, &reference, &dirs).unwrap();
//! assert!((value - 1.062_790_866_672_246_5).abs() < 1e-9);
//! ```

use core::num::NonZeroU32;

use crate::error::Result;
use crate::set::{check_front_pair, minimized, PointSet};
use crate::types::Direction;

/// Generational distance of `set` relative to `reference` (`p = 1`).
///
/// # Errors
///
/// [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) when
/// the sets or `directions` disagree on the objective count,
/// [`Error::EmptyInput`](crate::Error::EmptyInput) when either set is
/// empty.
pub fn gd(set: &PointSet, reference: &PointSet, directions: &[Direction]) -> Result<f64> {
    check_front_pair(set, reference, directions)?;
    let mdata = minimized(set.as_flat(), set.nobj(), directions);
    let mref = minimized(reference.as_flat(), set.nobj(), directions);
    Ok(mean_min_distance(&mdata, &mref, set.nobj(), 1.0))
}

/// Inverted generational distance of `set` relative to `reference`
/// (`p = 1`).
///
/// # Errors
///
/// Same conditions as [`gd`].
pub fn igd(set: &PointSet, reference: &PointSet, directions: &[Direction]) -> Result<f64> {
    check_front_pair(set, reference, directions)?;
    let mdata = minimized(set.as_flat(), set.nobj(), directions);
    let mref = minimized(reference.as_flat(), set.nobj(), directions);
    Ok(mean_min_distance(&mref, &mdata, set.nobj(), 1.0))
}

/// The IGD+ indicator of `set` relative to `reference`.
///
/// Per reference point, the distance counts only coordinates where the
/// nearest set point is worse, so a set that weakly dominates the whole
/// reference front scores exactly zero.
///
/// # Errors
///
/// Same conditions as [`gd`].
pub fn igd_plus(set: &PointSet, reference: &PointSet, directions: &[Direction]) -> Result<f64> {
    check_front_pair(set, reference, directions)?;
    let nobj = set.nobj();
    let mdata = minimized(set.as_flat(), nobj, directions);
    let mref = minimized(reference.as_flat(), nobj, directions);
    let mut acc = 0.0;
    for r in mref.chunks_exact(nobj) {
        let mut best = f64::INFINITY;
        for a in mdata.chunks_exact(nobj) {
            let d2: f64 = a
                .iter()
                .zip(r)
                .map(|(&av, &rv)| {
                    let worse = (av - rv).max(0.0);
                    worse * worse
                })
                .sum();
            best = best.min(d2);
        }
        acc += best.sqrt();
    }
    Ok(acc / count_of(&mref, nobj))
}

/// Averaged Hausdorff distance, `max(GD_p, IGD_p)`.
///
/// # Errors
///
/// Same conditions as [`gd`].
pub fn avg_hausdorff(
    set: &PointSet,
    reference: &PointSet,
    directions: &[Direction],
    p: NonZeroU32,
) -> Result<f64> {
    check_front_pair(set, reference, directions)?;
    let nobj = set.nobj();
    let mdata = minimized(set.as_flat(), nobj, directions);
    let mref = minimized(reference.as_flat(), nobj, directions);
    let p = f64::from(p.get());
    let forward = mean_min_distance(&mdata, &mref, nobj, p);
    let backward = mean_min_distance(&mref, &mdata, nobj, p);
    Ok(forward.max(backward))
}

/// Order-`p` mean of nearest-neighbor distances from rows of `from` to
/// rows of `to`.
fn mean_min_distance(from: &[f64], to: &[f64], nobj: usize, p: f64) -> f64 {
    let mut acc = 0.0;
    for src in from.chunks_exact(nobj) {
        let mut best = f64::INFINITY;
        for dst in to.chunks_exact(nobj) {
            let d2: f64 = src
                .iter()
                .zip(dst)
                .map(|(&x, &y)| (x - y) * (x - y))
                .sum();
            best = best.min(d2);
        }
        acc += best.sqrt().powf(p);
    }
    (acc / count_of(from, nobj)).powf(1.0 / p)
}

#[allow(clippy::cast_precision_loss)]
fn count_of(flat: &[f64], nobj: usize) -> f64 {
    (flat.len() / nobj) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const MIN2: [Direction; 2] = [Direction::Minimize, Direction::Minimize];

    fn diagonal_fixture() -> (PointSet, PointSet) {
        let set = PointSet::from_rows(&[
            vec![3.5, 5.5],
            vec![3.6, 4.1],
            vec![4.1, 3.2],
            vec![5.5, 1.5],
        ])
        .unwrap();
        let reference = PointSet::from_rows(&[
            vec![1.0, 6.0],
            vec![2.0, 5.0],
            vec![3.0, 4.0],
            vec![4.0, 3.0],
            vec![5.0, 2.0],
            vec![6.0, 1.0],
        ])
        .unwrap();
        (set, reference)
    }

    #[test]
    fn test_gd_diagonal_fixture() {
        let (set, reference) = diagonal_fixture();
        // Nearest squared distances per set point: 2.5, 0.37, 0.05, 0.5.
        let expected = (2.5_f64.sqrt() + 0.37_f64.sqrt() + 0.05_f64.sqrt() + 0.5_f64.sqrt()) / 4.0;
        let value = gd(&set, &reference, &MIN2).unwrap();
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_igd_diagonal_fixture() {
        let (set, reference) = diagonal_fixture();
        let value = igd(&set, &reference, &MIN2).unwrap();
        assert!((value - 1.062_790_866_672_246_5).abs() < 1e-9);
    }

    #[test]
    fn test_igd_plus_diagonal_fixture() {
        let (set, reference) = diagonal_fixture();
        let value = igd_plus(&set, &reference, &MIN2).unwrap();
        assert!((value - 0.985_503_646_810_665_2).abs() < 1e-9);
    }

    #[test]
    fn test_avg_hausdorff_p1_diagonal_fixture() {
        let (set, reference) = diagonal_fixture();
        let p = NonZeroU32::new(1).unwrap();
        let value = avg_hausdorff(&set, &reference, &MIN2, p).unwrap();
        // IGD exceeds GD here, so the maximum is the IGD value.
        assert!((value - 1.062_790_866_672_246_5).abs() < 1e-9);
    }

    #[test]
    fn test_avg_hausdorff_p2_diagonal_fixture() {
        let (set, reference) = diagonal_fixture();
        let p = NonZeroU32::new(2).unwrap();
        let value = avg_hausdorff(&set, &reference, &MIN2, p).unwrap();
        // IGD_2 over squared distances 6.5, 2.5, 0.37, 0.05, 0.5, 0.5.
        let expected = (10.42_f64 / 6.0).sqrt();
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_identical_sets_score_zero() {
        let set = PointSet::from_rows(&[vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();
        assert!(gd(&set, &set, &MIN2).unwrap().abs() < 1e-12);
        assert!(igd(&set, &set, &MIN2).unwrap().abs() < 1e-12);
        assert!(igd_plus(&set, &set, &MIN2).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_distances_invariant_under_negation() {
        let (set, reference) = diagonal_fixture();
        let neg = |ps: &PointSet| {
            let flipped: Vec<f64> = ps.as_flat().iter().map(|v| -v).collect();
            PointSet::from_flat(flipped, 2).unwrap()
        };
        let dirs = [Direction::Maximize, Direction::Maximize];
        let value = igd(&neg(&set), &neg(&reference), &dirs).unwrap();
        assert!((value - 1.062_790_866_672_246_5).abs() < 1e-9);
    }

    #[test]
    fn test_igd_plus_zero_for_dominating_set() {
        // (1, 1) weakly dominates the only reference point, so the
        // clamped distance vanishes while plain IGD does not.
        let set = PointSet::from_rows(&[vec![1.0, 1.0]]).unwrap();
        let reference = PointSet::from_rows(&[vec![2.0, 2.0]]).unwrap();
        assert!(igd_plus(&set, &reference, &MIN2).unwrap().abs() < 1e-12);
        assert!(igd(&set, &reference, &MIN2).unwrap() > 1.0);
    }

    #[test]
    fn test_rejects_dimension_mismatch() {
        let set = PointSet::from_rows(&[vec![1.0, 2.0]]).unwrap();
        let reference = PointSet::from_rows(&[vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(matches!(
            igd(&set, &reference, &MIN2),
            Err(Error::DimensionMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn test_rejects_empty_reference() {
        let set = PointSet::from_rows(&[vec![1.0, 2.0]]).unwrap();
        let reference = PointSet::from_flat(Vec::new(), 2).unwrap();
        assert!(matches!(
            gd(&set, &reference, &MIN2),
            Err(Error::EmptyInput)
        ));
    }
}
