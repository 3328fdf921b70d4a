//! Validated point storage: single sets, grouped collections, and
//! normalization.
//!
//! Everything downstream (dominance filtering, hypervolume, attainment
//! functions) operates on these containers, so all input validation lives
//! here: consistent dimensions, at least two objectives, finite coordinates,
//! and strictly increasing cumulative set sizes. Rejecting malformed input
//! up front means the geometric code never has to reason about NaN.
//!
//! Points are stored row-major in a flat `Vec<f64>`; a [`SetCollection`]
//! adds the cumulative-size boundaries that identify its constituent
//! approximation sets.

use core::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::Direction;

/// An immutable set of points with a fixed number of objectives.
///
/// # Examples
///
/// ```
/// use mometrics::PointSet;
///
/// let set = PointSet::from_rows(&[vec![1.0, 3.0], vec![2.0, 2.0]]).unwrap();
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.nobj(), 2);
/// assert_eq!(set.row(1), &[2.0, 2.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PointSet {
    data: Vec<f64>,
    nobj: usize,
}

impl PointSet {
    /// Build a point set from a flat row-major buffer.
    ///
    /// An empty buffer is a valid (empty) set; operations that need at
    /// least one point reject it themselves.
    ///
    /// # Errors
    ///
    /// [`Error::TooFewObjectives`] if `nobj < 2`, [`Error::RaggedData`] if
    /// the buffer length is not a multiple of `nobj`, [`Error::NonFinite`]
    /// if any coordinate is NaN or infinite.
    pub fn from_flat(data: Vec<f64>, nobj: usize) -> Result<Self> {
        if nobj < 2 {
            return Err(Error::TooFewObjectives(nobj));
        }
        if data.len() % nobj != 0 {
            return Err(Error::RaggedData {
                len: data.len(),
                nobj,
            });
        }
        for (i, &v) in data.iter().enumerate() {
            if !v.is_finite() {
                return Err(Error::NonFinite {
                    point: i / nobj,
                    objective: i % nobj,
                });
            }
        }
        Ok(Self { data, nobj })
    }

    /// Build a point set from one `Vec` per point.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] if `rows` is empty (the objective count cannot
    /// be inferred), [`Error::DimensionMismatch`] if rows disagree on
    /// length, plus everything [`PointSet::from_flat`] rejects.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(Error::EmptyInput);
        };
        let nobj = first.len();
        let mut data = Vec::with_capacity(rows.len() * nobj);
        for row in rows {
            if row.len() != nobj {
                return Err(Error::DimensionMismatch {
                    expected: nobj,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_flat(data, nobj)
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.nobj == 0 {
            0
        } else {
            self.data.len() / self.nobj
        }
    }

    /// Whether the set holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of objectives per point.
    #[must_use]
    pub fn nobj(&self) -> usize {
        self.nobj
    }

    /// The `i`-th point.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.nobj..(i + 1) * self.nobj]
    }

    /// Iterate over points as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.nobj)
    }

    /// The underlying row-major buffer.
    #[must_use]
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }

    /// Build from data a public constructor has already validated.
    pub(crate) fn from_validated(data: Vec<f64>, nobj: usize) -> Self {
        debug_assert!(nobj >= 2 && data.len() % nobj == 0);
        Self { data, nobj }
    }
}

/// A sequence of approximation sets stored back to back.
///
/// Set `k` occupies the rows `cumulative_sizes[k - 1]..cumulative_sizes[k]`
/// (with an implicit leading 0). The cumulative sizes are strictly
/// increasing, so every constituent set holds at least one point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SetCollection {
    points: PointSet,
    cumsizes: Vec<usize>,
}

impl SetCollection {
    /// Build a collection from a flat buffer and cumulative set sizes.
    ///
    /// # Errors
    ///
    /// Everything [`PointSet::from_flat`] rejects, plus
    /// [`Error::InvalidCumulativeSizes`] when `cumsizes` is not strictly
    /// increasing or its last entry differs from the point count.
    pub fn from_flat(data: Vec<f64>, nobj: usize, cumsizes: Vec<usize>) -> Result<Self> {
        let points = PointSet::from_flat(data, nobj)?;
        let total = points.len();
        let increasing = cumsizes.windows(2).all(|w| w[0] < w[1]);
        let complete = cumsizes.last().copied().unwrap_or(0) == total;
        let starts_positive = cumsizes.first() != Some(&0);
        if !(increasing && complete && starts_positive) {
            return Err(Error::InvalidCumulativeSizes { expected: total });
        }
        Ok(Self { points, cumsizes })
    }

    /// Build a collection by concatenating point sets.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] if any member set is empty,
    /// [`Error::DimensionMismatch`] if members disagree on the objective
    /// count.
    pub fn from_sets(sets: &[PointSet]) -> Result<Self> {
        let Some(first) = sets.first() else {
            return Ok(Self {
                points: PointSet {
                    data: Vec::new(),
                    nobj: 2,
                },
                cumsizes: Vec::new(),
            });
        };
        let nobj = first.nobj();
        let mut data = Vec::new();
        let mut cumsizes = Vec::with_capacity(sets.len());
        for set in sets {
            if set.nobj() != nobj {
                return Err(Error::DimensionMismatch {
                    expected: nobj,
                    got: set.nobj(),
                });
            }
            if set.is_empty() {
                return Err(Error::EmptyInput);
            }
            data.extend_from_slice(set.as_flat());
            cumsizes.push(data.len() / nobj);
        }
        Ok(Self {
            points: PointSet { data, nobj },
            cumsizes,
        })
    }

    /// Number of constituent sets.
    #[must_use]
    pub fn n_sets(&self) -> usize {
        self.cumsizes.len()
    }

    /// Total number of points across all sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the collection holds no sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cumsizes.is_empty()
    }

    /// Number of objectives per point.
    #[must_use]
    pub fn nobj(&self) -> usize {
        self.points.nobj()
    }

    /// The strictly increasing cumulative set sizes.
    #[must_use]
    pub fn cumulative_sizes(&self) -> &[usize] {
        &self.cumsizes
    }

    /// All points of the collection, set boundaries ignored.
    #[must_use]
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Row range of set `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.n_sets()`.
    #[must_use]
    pub fn set_range(&self, k: usize) -> core::ops::Range<usize> {
        let start = if k == 0 { 0 } else { self.cumsizes[k - 1] };
        start..self.cumsizes[k]
    }

    /// Number of points in set `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.n_sets()`.
    #[must_use]
    pub fn set_len(&self, k: usize) -> usize {
        self.set_range(k).len()
    }

    /// Iterate over the points of set `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.n_sets()`.
    pub fn set_rows(&self, k: usize) -> impl Iterator<Item = &[f64]> {
        let range = self.set_range(k);
        let nobj = self.nobj();
        self.points.as_flat()[range.start * nobj..range.end * nobj].chunks_exact(nobj)
    }

    /// Copy set `k` out as an owned [`PointSet`].
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.n_sets()`.
    #[must_use]
    pub fn set_points(&self, k: usize) -> PointSet {
        let range = self.set_range(k);
        let nobj = self.nobj();
        PointSet {
            data: self.points.as_flat()[range.start * nobj..range.end * nobj].to_vec(),
            nobj,
        }
    }
}

/// Rescale every objective onto `to_range`.
///
/// Bounds default to the per-objective minimum and maximum of the data;
/// explicit `lower`/`upper` override them (in the data's own orientation).
/// Maximized objectives map onto the reversed range, so after
/// normalization smaller is better everywhere.
///
/// # Examples
///
/// ```
/// use mometrics::{normalize, Direction, PointSet};
///
/// let set = PointSet::from_rows(&[vec![3.5, 5.5], vec![3.6, 4.1], vec![4.1, 3.2], vec![5.5, 1.5]])
///     .unwrap();
/// let dirs = [Direction::Minimize, Direction::Minimize];
/// let scaled = normalize(&set, (0.0, 1.0), None, None, &dirs).unwrap();
/// assert!((scaled.row(1)[0] - 0.05).abs() < 1e-12);
/// assert!((scaled.row(2)[1] - 0.425).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// [`Error::EmptyInput`] for an empty set, [`Error::DimensionMismatch`] for
/// mis-sized `directions`/`lower`/`upper`, [`Error::NonFinite`] for
/// non-finite bounds or range, [`Error::DegenerateBounds`] when an
/// objective's lower and upper bound coincide.
pub fn normalize(
    set: &PointSet,
    to_range: (f64, f64),
    lower: Option<&[f64]>,
    upper: Option<&[f64]>,
    directions: &[Direction],
) -> Result<PointSet> {
    if set.is_empty() {
        return Err(Error::EmptyInput);
    }
    let nobj = set.nobj();
    check_directions(directions, nobj)?;
    for (d, bound) in [to_range.0, to_range.1].into_iter().enumerate() {
        if !bound.is_finite() {
            return Err(Error::NonFinite {
                point: 0,
                objective: d,
            });
        }
    }
    let lo = resolve_bounds(set, lower, true)?;
    let hi = resolve_bounds(set, upper, false)?;

    let (lb, ub) = to_range;
    let mut data = Vec::with_capacity(set.as_flat().len());
    for row in set.rows() {
        for (d, &v) in row.iter().enumerate() {
            if lo[d].total_cmp(&hi[d]) == Ordering::Equal {
                return Err(Error::DegenerateBounds {
                    objective: d,
                    value: lo[d],
                });
            }
            let t = (v - lo[d]) / (hi[d] - lo[d]);
            let scaled = match directions[d] {
                Direction::Minimize => lb + t * (ub - lb),
                Direction::Maximize => ub - t * (ub - lb),
            };
            data.push(scaled);
        }
    }
    PointSet::from_flat(data, nobj)
}

fn resolve_bounds(set: &PointSet, given: Option<&[f64]>, is_lower: bool) -> Result<Vec<f64>> {
    let nobj = set.nobj();
    if let Some(bounds) = given {
        if bounds.len() != nobj {
            return Err(Error::DimensionMismatch {
                expected: nobj,
                got: bounds.len(),
            });
        }
        for (d, &b) in bounds.iter().enumerate() {
            if !b.is_finite() {
                return Err(Error::NonFinite {
                    point: 0,
                    objective: d,
                });
            }
        }
        return Ok(bounds.to_vec());
    }
    let init = if is_lower {
        f64::INFINITY
    } else {
        f64::NEG_INFINITY
    };
    let mut bounds = vec![init; nobj];
    for row in set.rows() {
        for (d, &v) in row.iter().enumerate() {
            bounds[d] = if is_lower {
                bounds[d].min(v)
            } else {
                bounds[d].max(v)
            };
        }
    }
    Ok(bounds)
}

// ---------------------------------------------------------------------------
// Crate-internal helpers
// ---------------------------------------------------------------------------

/// Validate that `directions` matches the objective count.
pub(crate) fn check_directions(directions: &[Direction], nobj: usize) -> Result<()> {
    if directions.len() == nobj {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            expected: nobj,
            got: directions.len(),
        })
    }
}

/// Validate a set/reference-front pair plus directions for the unary
/// indicators that compare two fronts.
pub(crate) fn check_front_pair(
    set: &PointSet,
    reference: &PointSet,
    directions: &[Direction],
) -> Result<()> {
    check_directions(directions, set.nobj())?;
    if reference.nobj() != set.nobj() {
        return Err(Error::DimensionMismatch {
            expected: set.nobj(),
            got: reference.nobj(),
        });
    }
    if set.is_empty() || reference.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(())
}

/// Validate a caller-supplied single point (reference, ideal, goal).
pub(crate) fn check_point(point: &[f64], nobj: usize) -> Result<()> {
    if point.len() != nobj {
        return Err(Error::DimensionMismatch {
            expected: nobj,
            got: point.len(),
        });
    }
    for (d, &v) in point.iter().enumerate() {
        if !v.is_finite() {
            return Err(Error::NonFinite {
                point: 0,
                objective: d,
            });
        }
    }
    Ok(())
}

/// Copy a flat buffer into minimize-space.
pub(crate) fn minimized(data: &[f64], nobj: usize, directions: &[Direction]) -> Vec<f64> {
    data.iter()
        .enumerate()
        .map(|(i, &v)| directions[i % nobj].to_minimize(v))
        .collect()
}

/// Copy a single point into minimize-space.
pub(crate) fn minimized_point(point: &[f64], directions: &[Direction]) -> Vec<f64> {
    point
        .iter()
        .zip(directions)
        .map(|(&v, dir)| dir.to_minimize(v))
        .collect()
}

/// Lexicographic order on coordinate slices (inputs are validated finite).
pub(crate) fn lex_cmp(a: &[f64], b: &[f64]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.total_cmp(y) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}
