//! Pareto dominance tests, nondominated filtering, and front ranking.
//!
//! All comparisons honor per-objective [`Direction`]s; maximized
//! objectives are negated on the fly so the logic below always reasons in
//! terms of "smaller is better".
//!
//! # Available functions
//!
//! | Function | Purpose |
//! |---|---|
//! | [`strictly_dominates`] | `a` no worse everywhere, strictly better somewhere |
//! | [`weakly_dominates`] | `a` no worse everywhere (equal points qualify) |
//! | [`is_nondominated`] | Per-point keep/drop mask for one set |
//! | [`filter_nondominated`] | The surviving subset as a new [`PointSet`] |
//! | [`filter_nondominated_sets`] | Filter each set of a collection independently |
//! | [`pareto_rank`] | 0-based front index per point |
//!
//! # Example
//!
//! ```
//! use mometrics::{filter_nondominated, Direction, PointSet};
//!
//! let set = PointSet::from_rows(&[
//!     vec![1.0, 5.0], // Pareto-optimal
//!     vec![5.0, 1.0], // Pareto-optimal
//!     vec![3.0, 3.0], // Pareto-optimal
//!     vec![4.0, 4.0], // Dominated by (3, 3)
//! ])
//! .unwrap();
//! let dirs = [Direction::Minimize, Direction::Minimize];
//!
//! let front = filter_nondominated(&set, &dirs, false).unwrap();
//! assert_eq!(front.len(), 3);
//! ```

use core::cmp::Ordering;

use crate::error::Result;
use crate::set::{check_directions, lex_cmp, minimized, PointSet, SetCollection};
use crate::types::Direction;

/// Returns `true` if point `a` Pareto-dominates point `b`.
///
/// `a` dominates `b` if it is at least as good in all objectives and
/// strictly better in at least one, respecting the given directions.
#[must_use]
pub fn strictly_dominates(a: &[f64], b: &[f64], directions: &[Direction]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), directions.len());

    let mut strictly_better = false;
    for ((&av, &bv), dir) in a.iter().zip(b.iter()).zip(directions.iter()) {
        let (av, bv) = (dir.to_minimize(av), dir.to_minimize(bv));
        if av > bv {
            return false;
        }
        if av < bv {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Returns `true` if point `a` weakly dominates point `b`.
///
/// Weak dominance only requires `a` to be at least as good in every
/// objective, so equal points weakly dominate each other.
#[must_use]
pub fn weakly_dominates(a: &[f64], b: &[f64], directions: &[Direction]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), directions.len());

    a.iter()
        .zip(b.iter())
        .zip(directions.iter())
        .all(|((&av, &bv), dir)| dir.to_minimize(av) <= dir.to_minimize(bv))
}

/// Weak dominance on minimize-space rows.
fn weak_min(a: &[f64], b: &[f64]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x <= y)
}

/// Nondominated subset of flat minimize-space rows, duplicates dropped.
///
/// Used by the hypervolume slicing recursion on projected prefixes, where
/// directions are already folded in and input order does not matter.
pub(crate) fn nondominated_min_rows(data: &[f64], nobj: usize) -> Vec<f64> {
    let n = data.len() / nobj;
    let row = |i: usize| &data[i * nobj..(i + 1) * nobj];
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| lex_cmp(row(i), row(j)));
    let mut kept: Vec<usize> = Vec::new();
    for &i in &order {
        if !kept.iter().any(|&a| weak_min(row(a), row(i))) {
            kept.push(i);
        }
    }
    let mut out = Vec::with_capacity(kept.len() * nobj);
    for &i in &kept {
        out.extend_from_slice(row(i));
    }
    out
}

/// Strict dominance on minimize-space rows.
fn strict_min(a: &[f64], b: &[f64]) -> bool {
    let mut strictly_better = false;
    for (x, y) in a.iter().zip(b.iter()) {
        if x > y {
            return false;
        }
        if x < y {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Per-point mask: `true` where the point survives nondominated filtering.
///
/// With `keep_weakly == false`, a point is dropped when any other point
/// weakly dominates it; of several coordinate-equal duplicates only the
/// first in input order survives. With `keep_weakly == true`, only strict
/// dominance drops a point and duplicates all survive.
///
/// Two objectives run as one O(n log n) sweep over the lexicographically
/// sorted points; higher dimensions compare each point against the
/// accepted front, O(n²) worst case.
///
/// # Errors
///
/// [`crate::Error::DimensionMismatch`] if `directions` does not match the
/// objective count.
pub fn is_nondominated(
    set: &PointSet,
    directions: &[Direction],
    keep_weakly: bool,
) -> Result<Vec<bool>> {
    let nobj = set.nobj();
    check_directions(directions, nobj)?;
    let n = set.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let data = minimized(set.as_flat(), nobj, directions);
    let row = |i: usize| &data[i * nobj..(i + 1) * nobj];
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| lex_cmp(row(i), row(j)).then(i.cmp(&j)));

    let mut keep = vec![false; n];
    if nobj == 2 {
        // Any dominating point sorts before its victim, so scanning runs
        // of equal x while tracking accepted minima decides every point.
        let mut min_before = f64::INFINITY;
        let mut at = 0;
        while at < n {
            let run_x = data[order[at] * 2];
            let mut run_end = at;
            while run_end < n && data[order[run_end] * 2].total_cmp(&run_x) == Ordering::Equal {
                run_end += 1;
            }
            let mut min_at = f64::INFINITY;
            for &i in &order[at..run_end] {
                let y = data[i * 2 + 1];
                let rejected = if keep_weakly {
                    min_before <= y || min_at < y
                } else {
                    min_before.min(min_at) <= y
                };
                if !rejected {
                    keep[i] = true;
                    min_at = min_at.min(y);
                }
            }
            min_before = min_before.min(min_at);
            at = run_end;
        }
    } else {
        let mut accepted: Vec<usize> = Vec::new();
        for &i in &order {
            let cand = row(i);
            let dominated = accepted.iter().any(|&acc| {
                if keep_weakly {
                    strict_min(row(acc), cand)
                } else {
                    weak_min(row(acc), cand)
                }
            });
            if !dominated {
                keep[i] = true;
                accepted.push(i);
            }
        }
    }
    Ok(keep)
}

/// The nondominated subset of `set`, in input order.
///
/// # Errors
///
/// Same conditions as [`is_nondominated`].
pub fn filter_nondominated(
    set: &PointSet,
    directions: &[Direction],
    keep_weakly: bool,
) -> Result<PointSet> {
    let keep = is_nondominated(set, directions, keep_weakly)?;
    let mut data = Vec::new();
    for (row, &kept) in set.rows().zip(keep.iter()) {
        if kept {
            data.extend_from_slice(row);
        }
    }
    Ok(PointSet::from_validated(data, set.nobj()))
}

/// Filter each set of a collection independently.
///
/// Set boundaries are preserved. Every set keeps at least one point
/// (its lexicographic minimum is never dominated), so the result has the
/// same number of sets.
///
/// # Errors
///
/// Same conditions as [`is_nondominated`].
pub fn filter_nondominated_sets(
    collection: &SetCollection,
    directions: &[Direction],
    keep_weakly: bool,
) -> Result<SetCollection> {
    check_directions(directions, collection.nobj())?;
    let mut sets = Vec::with_capacity(collection.n_sets());
    for k in 0..collection.n_sets() {
        sets.push(filter_nondominated(
            &collection.set_points(k),
            directions,
            keep_weakly,
        )?);
    }
    SetCollection::from_sets(&sets)
}

/// 0-based Pareto front index per point.
///
/// Rank 0 is the nondominated front; removing it exposes rank 1, and so
/// on. Ranking uses strict dominance, so coordinate-equal duplicates
/// share a rank.
///
/// Complexity: O(M × N²) where M = objectives, N = points.
///
/// # Errors
///
/// [`crate::Error::DimensionMismatch`] if `directions` does not match the
/// objective count.
pub fn pareto_rank(set: &PointSet, directions: &[Direction]) -> Result<Vec<usize>> {
    check_directions(directions, set.nobj())?;
    let n = set.len();

    // S_p: points dominated by p, and n_p: domination count for p.
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut domination_count: Vec<usize> = vec![0; n];
    for i in 0..n {
        for j in (i + 1)..n {
            if strictly_dominates(set.row(i), set.row(j), directions) {
                dominated_by[i].push(j);
                domination_count[j] += 1;
            } else if strictly_dominates(set.row(j), set.row(i), directions) {
                dominated_by[j].push(i);
                domination_count[i] += 1;
            }
        }
    }

    let mut rank = vec![0_usize; n];
    let mut current_front: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();
    let mut level = 0;
    while !current_front.is_empty() {
        let mut next_front: Vec<usize> = Vec::new();
        for &p in &current_front {
            rank[p] = level;
            for &q in &dominated_by[p] {
                domination_count[q] -= 1;
                if domination_count[q] == 0 {
                    next_front.push(q);
                }
            }
        }
        level += 1;
        current_front = next_front;
    }
    Ok(rank)
}
