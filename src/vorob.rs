//! Vorob'ev expectation and deviation of a random attained set.
//!
//! Treating each approximation set as one draw of a random closed set,
//! the Vorob'ev expectation is the attainment surface whose hypervolume
//! matches the mean hypervolume of the draws, and the threshold is the
//! attainment percentile at which that surface sits. The deviation then
//! measures spread: the mean hypervolume of the symmetric difference
//! between each draw and the expectation.
//!
//! The threshold is found by bisecting percentiles in `(0, 100)`;
//! because attainment levels are discrete the quantile hypervolume is a
//! step function and the bisection stops as soon as it stops changing.
//!
//! # Example
//!
//! ```
//! use mometrics::{vorobev_threshold, Direction, PointSet, SetCollection};
//!
//! let runs = SetCollection::from_sets(&[
//!     PointSet::from_rows(&[vec![1.0, 1.0]]).unwrap(),
//!     PointSet::from_rows(&[vec![2.0, 2.0]]).unwrap(),
//! ])
//! .unwrap();
//! let dirs = [Direction::Minimize, Direction::Minimize];
//!
//! let result = vorobev_threshold(&runs, &[4.0, 4.0], &dirs).unwrap();
//! // Run hypervolumes are 9 and 4; only the 100% surface stays at or
//! // below the mean of 6.5, so the threshold lands above 50%.
//! assert!((result.avg_hypervolume - 6.5).abs() < 1e-12);
//! assert!(result.threshold > 50.0);
//! ```

use core::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::eaf::eaf_at_percentiles;
use crate::error::{Error, Result};
use crate::hypervolume::hypervolume_filtered;
use crate::set::{check_directions, check_point, PointSet, SetCollection};
use crate::types::Direction;

/// Enough halvings to shrink the percentile bracket below f64 resolution.
const MAX_BISECTION_STEPS: usize = 64;

/// Result of [`vorobev_threshold`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Vorobev {
    /// Attainment percentile of the expectation surface.
    pub threshold: f64,
    /// The Vorob'ev expectation: the attainment surface at `threshold`.
    pub expectation: PointSet,
    /// Mean hypervolume of the individual approximation sets.
    pub avg_hypervolume: f64,
}

/// Vorob'ev threshold and expectation of a collection of sets.
///
/// Hypervolumes are measured against `reference`; points beyond the
/// reference contribute nothing.
///
/// # Errors
///
/// [`Error::EmptyInput`] when the collection holds no sets,
/// [`Error::DimensionMismatch`] for mis-sized `reference` or
/// `directions`, [`Error::NonFinite`] for a non-finite reference, plus
/// the dimension limits of [`eaf`](crate::eaf()).
#[allow(clippy::cast_precision_loss)]
pub fn vorobev_threshold(
    collection: &SetCollection,
    reference: &[f64],
    directions: &[Direction],
) -> Result<Vorobev> {
    let nobj = collection.nobj();
    check_directions(directions, nobj)?;
    check_point(reference, nobj)?;
    if collection.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut acc = 0.0;
    for k in 0..collection.n_sets() {
        acc += hypervolume_filtered(&collection.set_points(k), reference, directions)?;
    }
    let avg_hypervolume = acc / collection.n_sets() as f64;

    let mut lo = 0.0_f64;
    let mut hi = 100.0_f64;
    let mut threshold = 0.5 * (lo + hi);
    let mut expectation = percentile_front(collection, directions, threshold)?;
    let mut hv = hypervolume_filtered(&expectation, reference, directions)?;
    let mut prev_hv = f64::INFINITY;
    for _ in 0..MAX_BISECTION_STEPS {
        if hv > avg_hypervolume {
            lo = threshold;
        } else {
            hi = threshold;
        }
        if hv.total_cmp(&prev_hv) == Ordering::Equal {
            break;
        }
        prev_hv = hv;
        threshold = 0.5 * (lo + hi);
        expectation = percentile_front(collection, directions, threshold)?;
        hv = hypervolume_filtered(&expectation, reference, directions)?;
    }
    trace_info!(threshold, "vorobev threshold bracketed");

    Ok(Vorobev {
        threshold,
        expectation,
        avg_hypervolume,
    })
}

/// Vorob'ev deviation of a collection around an expectation surface.
///
/// Computed as the mean hypervolume of the symmetric difference between
/// each set and `expectation`, via
/// `2 * mean hv(set | expectation) - mean hv(set) - hv(expectation)`.
///
/// # Errors
///
/// Same conditions as [`vorobev_threshold`].
#[allow(clippy::cast_precision_loss)]
pub fn vorobev_deviation(
    collection: &SetCollection,
    expectation: &PointSet,
    reference: &[f64],
    directions: &[Direction],
) -> Result<f64> {
    let nobj = collection.nobj();
    check_directions(directions, nobj)?;
    check_point(reference, nobj)?;
    if expectation.nobj() != nobj {
        return Err(Error::DimensionMismatch {
            expected: nobj,
            got: expectation.nobj(),
        });
    }
    if collection.is_empty() || expectation.is_empty() {
        return Err(Error::EmptyInput);
    }

    let expectation_hv = hypervolume_filtered(expectation, reference, directions)?;
    let mut solo_acc = 0.0;
    let mut union_acc = 0.0;
    for k in 0..collection.n_sets() {
        let set_k = collection.set_points(k);
        solo_acc += hypervolume_filtered(&set_k, reference, directions)?;
        let mut union_data = set_k.as_flat().to_vec();
        union_data.extend_from_slice(expectation.as_flat());
        let union = PointSet::from_validated(union_data, nobj);
        union_acc += hypervolume_filtered(&union, reference, directions)?;
    }
    let n = collection.n_sets() as f64;
    Ok(2.0 * union_acc / n - solo_acc / n - expectation_hv)
}

/// The attainment surface nearest `percentile`, as a point set.
fn percentile_front(
    collection: &SetCollection,
    directions: &[Direction],
    percentile: f64,
) -> Result<PointSet> {
    let surface = eaf_at_percentiles(collection, directions, &[percentile])?;
    let mut data = Vec::with_capacity(surface.len() * collection.nobj());
    for ap in &surface {
        data.extend_from_slice(&ap.point);
    }
    Ok(PointSet::from_validated(data, collection.nobj()))
}
