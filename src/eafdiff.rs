//! Differences between two empirical attainment functions.
//!
//! Given two groups of approximation sets, usually produced by two
//! optimizers run several times each, the difference at a point is the
//! fraction of left-side runs attaining it minus the fraction of
//! right-side runs attaining it, a value in `[-1, 1]`. The signed value
//! is discretized into `intervals` steps per side, so interval `+k`
//! means "attained by at least `k / intervals` more of the left runs"
//! and `-k` the mirror statement about the right runs.
//!
//! Three encodings of the same field are available:
//!
//! | Function | Output |
//! |----------|--------|
//! | [`eafdiff`] | the corner points where the field changes, with raw and discretized values |
//! | [`eafdiff_rectangles`] | axis-aligned rectangles tiling the nonzero region |
//! | [`eafdiff_polygons`] | closed rectilinear outlines of each nonzero region |
//!
//! Rectangles and polygons extend to infinity on unbounded sides. Only
//! two objectives are supported.
//!
//! # Example
//!
//! ```
//! use mometrics::{eafdiff_rectangles, Direction, PointSet, SetCollection};
//!
//! let dirs = [Direction::Minimize, Direction::Minimize];
//! let left = SetCollection::from_sets(&[PointSet::from_rows(&[vec![1.0, 1.0]]).unwrap()]).unwrap();
//! let right = SetCollection::from_sets(&[PointSet::from_rows(&[vec![2.0, 2.0]]).unwrap()]).unwrap();
//!
//! // The left run attains everything above (1, 1); the right run only
//! // the subregion above (2, 2). The difference is the L-shape between.
//! let rects = eafdiff_rectangles(&left, &right, &dirs, 1).unwrap();
//! assert_eq!(rects.len(), 2);
//! assert!(rects.iter().all(|r| r.interval == 1));
//! ```

use core::cmp::Ordering;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{Error, Result};
use crate::ostree::OsTree;
use crate::set::{check_directions, minimized, SetCollection};
use crate::types::Direction;

/// A corner of the difference field.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DiffPoint {
    /// First objective, in the caller's orientation.
    pub x: f64,
    /// Second objective, in the caller's orientation.
    pub y: f64,
    /// Raw attainment difference in `[-1, 1]`.
    pub diff: f64,
    /// Discretized difference in `-intervals ..= intervals`.
    pub interval: i32,
}

/// An axis-aligned piece of the nonzero difference region.
///
/// Closed on the lower edges, open on the upper; an unbounded side is
/// the appropriate infinity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DiffRectangle {
    /// Lower x edge.
    pub xmin: f64,
    /// Lower y edge.
    pub ymin: f64,
    /// Upper x edge.
    pub xmax: f64,
    /// Upper y edge.
    pub ymax: f64,
    /// Discretized difference shared by the whole rectangle.
    pub interval: i32,
}

/// A closed rectilinear outline of one difference region.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DiffPolygon {
    /// Discretized difference of the enclosed region.
    pub interval: i32,
    /// Ring vertices with the first repeated at the end. Outer rings
    /// wind counterclockwise in minimize orientation, holes clockwise.
    pub vertices: Vec<[f64; 2]>,
}

/// The corner points of the difference field.
///
/// Every corner of the joint attainment surfaces is reported, including
/// those where the discretized difference is zero, so the caller sees
/// the full grid. Points are ordered by the sweep: ascending first
/// objective in minimize orientation, ties by the second.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] when the two collections disagree on
/// objective count, [`Error::UnsupportedDimension`] unless both are
/// two-dimensional, [`Error::EmptyInput`] when either holds no sets,
/// [`Error::ZeroIntervals`] for `intervals == 0`.
#[allow(clippy::cast_precision_loss)]
pub fn eafdiff(
    left: &SetCollection,
    right: &SetCollection,
    directions: &[Direction],
    intervals: usize,
) -> Result<Vec<DiffPoint>> {
    let (kl, kr) = validate(left, right, directions, intervals)?;
    let mut events = side_events(left, right, directions);
    events.sort_by(|a, b| {
        a.0.total_cmp(&b.0)
            .then(a.1.total_cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });

    let total = kl + kr;
    let mut set_min = vec![f64::INFINITY; total];
    let mut minima = OsTree::new();
    let mut left_tree = OsTree::new();
    let mut right_tree = OsTree::new();
    let mut last = vec![f64::INFINITY; total + 1];
    let mut out: Vec<DiffPoint> = Vec::new();

    let mut idx = 0;
    while idx < events.len() {
        let x = events[idx].0;
        let mut end = idx;
        while end < events.len() && events[end].0.total_cmp(&x) == Ordering::Equal {
            end += 1;
        }
        for &(_, y, s) in &events[idx..end] {
            if y < set_min[s] {
                let side = if s < kl { &mut left_tree } else { &mut right_tree };
                if set_min[s].is_finite() {
                    minima.remove(set_min[s]);
                    side.remove(set_min[s]);
                }
                minima.insert(y, y);
                side.insert(y, y);
                set_min[s] = y;
            }
        }
        for t in 1..=minima.len() {
            if let Some((cur, _)) = minima.select(t - 1) {
                if cur < last[t] {
                    last[t] = cur;
                    // Adjacent levels that drop to the same height name
                    // the same corner once.
                    let repeat = out.last().is_some_and(|p| {
                        p.x.total_cmp(&x) == Ordering::Equal
                            && p.y.total_cmp(&cur) == Ordering::Equal
                    });
                    if !repeat {
                        let left_count = left_tree.count_le(cur);
                        let right_count = right_tree.count_le(cur);
                        let diff =
                            left_count as f64 / kl as f64 - right_count as f64 / kr as f64;
                        out.push(DiffPoint {
                            x,
                            y: cur,
                            diff,
                            interval: interval_of(diff, intervals),
                        });
                    }
                }
            }
        }
        idx = end;
    }
    for p in &mut out {
        p.x = directions[0].to_minimize(p.x);
        p.y = directions[1].to_minimize(p.y);
    }
    trace_debug!(corners = out.len(), "attainment difference computed");
    Ok(out)
}

/// The nonzero difference region tiled by rectangles.
///
/// Rectangles of equal interval are merged vertically within a grid
/// column and then across columns, so the tiling is disjoint and exact.
/// Output is sorted by `(xmin, ymin)` in the caller's orientation.
///
/// # Errors
///
/// Same conditions as [`eafdiff`].
pub fn eafdiff_rectangles(
    left: &SetCollection,
    right: &SetCollection,
    directions: &[Direction],
    intervals: usize,
) -> Result<Vec<DiffRectangle>> {
    let grid = build_grid(left, right, directions, intervals)?;
    let rows = grid.ys.len();
    let mut open: Vec<DiffRectangle> = Vec::new();
    let mut done: Vec<DiffRectangle> = Vec::new();
    for ci in 0..grid.xs.len() {
        let x0 = grid.xs[ci];
        let x1 = grid.xs.get(ci + 1).copied().unwrap_or(f64::INFINITY);
        let mut next_open = Vec::new();
        let mut rj = 0;
        while rj < rows {
            let v = grid.value(ci, rj);
            let mut rend = rj + 1;
            while rend < rows && grid.value(ci, rend) == v {
                rend += 1;
            }
            if v != 0 {
                let y0 = grid.ys[rj];
                let y1 = grid.ys.get(rend).copied().unwrap_or(f64::INFINITY);
                let carried = open.iter().position(|r| {
                    r.interval == v
                        && r.ymin.total_cmp(&y0) == Ordering::Equal
                        && r.ymax.total_cmp(&y1) == Ordering::Equal
                });
                if let Some(pos) = carried {
                    let mut rect = open.swap_remove(pos);
                    rect.xmax = x1;
                    next_open.push(rect);
                } else {
                    next_open.push(DiffRectangle {
                        xmin: x0,
                        ymin: y0,
                        xmax: x1,
                        ymax: y1,
                        interval: v,
                    });
                }
            }
            rj = rend;
        }
        done.append(&mut open);
        open = next_open;
    }
    done.append(&mut open);

    let mut out: Vec<DiffRectangle> = done
        .into_iter()
        .map(|r| rect_to_user(r, directions))
        .collect();
    out.sort_by(|a, b| {
        a.xmin
            .total_cmp(&b.xmin)
            .then(a.ymin.total_cmp(&b.ymin))
            .then(a.interval.cmp(&b.interval))
    });
    Ok(out)
}

/// The nonzero difference region as closed rectilinear outlines.
///
/// Each connected region of one interval value becomes one or more
/// rings; regions touching only at a corner stay separate rings.
/// Intervals are reported in ascending order.
///
/// # Errors
///
/// Same conditions as [`eafdiff`].
pub fn eafdiff_polygons(
    left: &SetCollection,
    right: &SetCollection,
    directions: &[Direction],
    intervals: usize,
) -> Result<Vec<DiffPolygon>> {
    let grid = build_grid(left, right, directions, intervals)?;
    let cols = grid.xs.len();
    let rows = grid.ys.len();
    let mut values: Vec<i32> = grid.cell.iter().copied().filter(|&v| v != 0).collect();
    values.sort_unstable();
    values.dedup();

    let mut out = Vec::new();
    for v in values {
        let edges = boundary_edges(&grid, v);
        for ring in trace_rings(&edges, cols, rows) {
            let vertices: Vec<[f64; 2]> = ring
                .iter()
                .map(|&id| corner_xy(id, &grid, directions))
                .collect();
            out.push(DiffPolygon {
                interval: v,
                vertices,
            });
        }
    }
    Ok(out)
}

// ---- shared grid ----

/// Piecewise-constant difference field over the joint coordinate grid.
/// Cell `(ci, rj)` covers `[xs[ci], xs[ci+1]) x [ys[rj], ys[rj+1])` with
/// infinite upper tails.
struct DiffGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    cell: Vec<i32>,
}

impl DiffGrid {
    fn value(&self, ci: usize, rj: usize) -> i32 {
        self.cell[ci * self.ys.len() + rj]
    }
}

fn validate(
    left: &SetCollection,
    right: &SetCollection,
    directions: &[Direction],
    intervals: usize,
) -> Result<(usize, usize)> {
    if left.nobj() != right.nobj() {
        return Err(Error::DimensionMismatch {
            expected: left.nobj(),
            got: right.nobj(),
        });
    }
    let nobj = left.nobj();
    if nobj != 2 {
        return Err(Error::UnsupportedDimension {
            operation: "eafdiff",
            supported: "2",
            got: nobj,
        });
    }
    check_directions(directions, 2)?;
    if left.is_empty() || right.is_empty() {
        return Err(Error::EmptyInput);
    }
    if intervals == 0 {
        return Err(Error::ZeroIntervals);
    }
    Ok((left.n_sets(), right.n_sets()))
}

/// All points of both sides as `(x, y, set)` with left sets numbered
/// before right sets, in minimize orientation.
fn side_events(
    left: &SetCollection,
    right: &SetCollection,
    directions: &[Direction],
) -> Vec<(f64, f64, usize)> {
    let kl = left.n_sets();
    let left_data = minimized(left.points().as_flat(), 2, directions);
    let right_data = minimized(right.points().as_flat(), 2, directions);
    let mut events = Vec::with_capacity(left.len() + right.len());
    for k in 0..kl {
        for i in left.set_range(k) {
            events.push((left_data[2 * i], left_data[2 * i + 1], k));
        }
    }
    for k in 0..right.n_sets() {
        for i in right.set_range(k) {
            events.push((right_data[2 * i], right_data[2 * i + 1], kl + k));
        }
    }
    events
}

#[allow(clippy::cast_precision_loss)]
fn build_grid(
    left: &SetCollection,
    right: &SetCollection,
    directions: &[Direction],
    intervals: usize,
) -> Result<DiffGrid> {
    let (kl, kr) = validate(left, right, directions, intervals)?;
    let mut events = side_events(left, right, directions);

    let mut xs: Vec<f64> = events.iter().map(|e| e.0).collect();
    xs.sort_by(|a, b| a.total_cmp(b));
    xs.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);
    let mut ys: Vec<f64> = events.iter().map(|e| e.1).collect();
    ys.sort_by(|a, b| a.total_cmp(b));
    ys.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);
    events.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut set_min = vec![f64::INFINITY; kl + kr];
    let mut cell = vec![0_i32; xs.len() * ys.len()];
    let mut ei = 0;
    for (ci, &x) in xs.iter().enumerate() {
        while ei < events.len() && events[ei].0.total_cmp(&x) != Ordering::Greater {
            let (_, y, s) = events[ei];
            if y < set_min[s] {
                set_min[s] = y;
            }
            ei += 1;
        }
        let mut left_mins: Vec<f64> = set_min[..kl]
            .iter()
            .copied()
            .filter(|m| m.is_finite())
            .collect();
        left_mins.sort_by(|a, b| a.total_cmp(b));
        let mut right_mins: Vec<f64> = set_min[kl..]
            .iter()
            .copied()
            .filter(|m| m.is_finite())
            .collect();
        right_mins.sort_by(|a, b| a.total_cmp(b));
        for (rj, &y) in ys.iter().enumerate() {
            let left_count = left_mins.partition_point(|&m| m <= y);
            let right_count = right_mins.partition_point(|&m| m <= y);
            let diff = left_count as f64 / kl as f64 - right_count as f64 / kr as f64;
            cell[ci * ys.len() + rj] = interval_of(diff, intervals);
        }
    }
    Ok(DiffGrid { xs, ys, cell })
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn interval_of(diff: f64, intervals: usize) -> i32 {
    let steps = intervals as f64;
    // The tolerance keeps exact multiples of 1/intervals in their step.
    let magnitude = (diff.abs() * steps - 1e-9).ceil().clamp(0.0, steps) as i32;
    if diff < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

fn rect_to_user(rect: DiffRectangle, directions: &[Direction]) -> DiffRectangle {
    let (left, right) = match directions[0] {
        Direction::Minimize => (rect.xmin, rect.xmax),
        Direction::Maximize => (-rect.xmax, -rect.xmin),
    };
    let (low, high) = match directions[1] {
        Direction::Minimize => (rect.ymin, rect.ymax),
        Direction::Maximize => (-rect.ymax, -rect.ymin),
    };
    DiffRectangle {
        xmin: left,
        ymin: low,
        xmax: right,
        ymax: high,
        interval: rect.interval,
    }
}

// ---- polygon tracing ----
//
// Corners live on the lattice 0..=cols x 0..=rows, id = j * (cols + 1) + i,
// where i == cols or j == rows stands for the infinite tail. Every cell of
// the target value contributes its four counterclockwise edges; edges
// shared by two such cells cancel, leaving the region boundary.

fn boundary_edges(grid: &DiffGrid, value: i32) -> Vec<(usize, usize)> {
    let cols = grid.xs.len();
    let rows = grid.ys.len();
    let mut paired: HashMap<(usize, usize), (usize, usize)> = HashMap::new();
    for ci in 0..cols {
        for rj in 0..rows {
            if grid.value(ci, rj) != value {
                continue;
            }
            let bl = rj * (cols + 1) + ci;
            let br = bl + 1;
            let tl = bl + cols + 1;
            let tr = tl + 1;
            for (a, b) in [(bl, br), (br, tr), (tr, tl), (tl, bl)] {
                let key = (a.min(b), a.max(b));
                if paired.remove(&key).is_none() {
                    paired.insert(key, (a, b));
                }
            }
        }
    }
    let mut edges: Vec<(usize, usize)> = paired.into_values().collect();
    edges.sort_unstable();
    edges
}

fn trace_rings(edges: &[(usize, usize)], cols: usize, rows: usize) -> Vec<Vec<usize>> {
    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();
    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let (first, mut cur) = edges[start];
        let mut walk = vec![first, cur];
        let mut dir = dir_between(first, cur, cols);
        while cur != first {
            let mut advanced = false;
            // Leftmost turn first, so regions touching at a corner stay
            // separate rings.
            for cand in [(-dir.1, dir.0), dir, (dir.1, -dir.0), (-dir.0, -dir.1)] {
                let Some(next) = step(cur, cand, cols, rows) else {
                    continue;
                };
                if let Ok(pos) = edges.binary_search(&(cur, next)) {
                    if !used[pos] {
                        used[pos] = true;
                        dir = cand;
                        cur = next;
                        walk.push(next);
                        advanced = true;
                        break;
                    }
                }
            }
            debug_assert!(advanced, "boundary walk left an open ring");
            if !advanced {
                break;
            }
        }
        rings.push(simplify_ring(&walk, cols));
    }
    rings
}

/// Neighbor corner id one lattice step away, or `None` at the border.
fn step(id: usize, dir: (i8, i8), cols: usize, rows: usize) -> Option<usize> {
    let i = id % (cols + 1);
    let j = id / (cols + 1);
    let ni = match dir.0 {
        -1 => i.checked_sub(1)?,
        1 if i < cols => i + 1,
        1 => return None,
        _ => i,
    };
    let nj = match dir.1 {
        -1 => j.checked_sub(1)?,
        1 if j < rows => j + 1,
        1 => return None,
        _ => j,
    };
    Some(nj * (cols + 1) + ni)
}

fn dir_between(from: usize, to: usize, cols: usize) -> (i8, i8) {
    let fi = from % (cols + 1);
    let fj = from / (cols + 1);
    let ti = to % (cols + 1);
    let tj = to / (cols + 1);
    (order_sign(fi, ti), order_sign(fj, tj))
}

fn order_sign(a: usize, b: usize) -> i8 {
    match b.cmp(&a) {
        Ordering::Greater => 1,
        Ordering::Less => -1,
        Ordering::Equal => 0,
    }
}

/// Drop corners where the walk continues straight, keep the closure.
fn simplify_ring(walk: &[usize], cols: usize) -> Vec<usize> {
    let n = walk.len() - 1;
    let mut ring = Vec::new();
    for k in 0..n {
        let prev = walk[if k == 0 { n - 1 } else { k - 1 }];
        let next = walk[k + 1];
        if dir_between(prev, walk[k], cols) != dir_between(walk[k], next, cols) {
            ring.push(walk[k]);
        }
    }
    if let Some(&head) = ring.first() {
        ring.push(head);
    }
    ring
}

fn corner_xy(id: usize, grid: &DiffGrid, directions: &[Direction]) -> [f64; 2] {
    let cols = grid.xs.len();
    let col = id % (cols + 1);
    let row = id / (cols + 1);
    let x = grid.xs.get(col).copied().unwrap_or(f64::INFINITY);
    let y = grid.ys.get(row).copied().unwrap_or(f64::INFINITY);
    [directions[0].to_minimize(x), directions[1].to_minimize(y)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::PointSet;

    const MIN2: [Direction; 2] = [Direction::Minimize, Direction::Minimize];
    const MAX2: [Direction; 2] = [Direction::Maximize, Direction::Maximize];

    fn one_run(points: &[Vec<f64>]) -> SetCollection {
        SetCollection::from_sets(&[PointSet::from_rows(points).unwrap()]).unwrap()
    }

    fn runs(sets: &[Vec<Vec<f64>>]) -> SetCollection {
        let sets: Vec<PointSet> = sets
            .iter()
            .map(|rows| PointSet::from_rows(rows).unwrap())
            .collect();
        SetCollection::from_sets(&sets).unwrap()
    }

    #[test]
    fn test_interval_of_rounding() {
        assert_eq!(interval_of(0.0, 5), 0);
        assert_eq!(interval_of(0.5, 2), 1);
        assert_eq!(interval_of(1.0, 2), 2);
        assert_eq!(interval_of(0.26, 4), 2);
        assert_eq!(interval_of(-0.5, 2), -1);
        assert_eq!(interval_of(-1.0, 3), -3);
    }

    #[test]
    fn test_points_single_runs() {
        let left = one_run(&[vec![1.0, 1.0]]);
        let right = one_run(&[vec![2.0, 2.0]]);
        let points = eafdiff(&left, &right, &MIN2, 1).unwrap();
        // The joint surfaces change at (1, 1), left only, and at (2, 2),
        // where both sides attain and the difference returns to zero.
        assert_eq!(points.len(), 2);
        assert_eq!((points[0].x, points[0].y), (1.0, 1.0));
        assert!((points[0].diff - 1.0).abs() < 1e-12);
        assert_eq!(points[0].interval, 1);
        assert_eq!((points[1].x, points[1].y), (2.0, 2.0));
        assert!(points[1].diff.abs() < 1e-12);
        assert_eq!(points[1].interval, 0);
    }

    #[test]
    fn test_points_antisymmetric() {
        let left = runs(&[
            vec![vec![1.0, 3.0], vec![3.0, 1.0]],
            vec![vec![2.0, 2.0]],
        ]);
        let right = one_run(&[vec![2.5, 0.5]]);
        let forward = eafdiff(&left, &right, &MIN2, 4).unwrap();
        let backward = eafdiff(&right, &left, &MIN2, 4).unwrap();
        assert_eq!(forward.len(), backward.len());
        for (f, b) in forward.iter().zip(&backward) {
            assert_eq!((f.x, f.y), (b.x, b.y));
            assert!((f.diff + b.diff).abs() < 1e-12);
            assert_eq!(f.interval, -b.interval);
        }
    }

    #[test]
    fn test_rectangles_l_shape() {
        let left = one_run(&[vec![1.0, 1.0]]);
        let right = one_run(&[vec![2.0, 2.0]]);
        let rects = eafdiff_rectangles(&left, &right, &MIN2, 1).unwrap();
        assert_eq!(
            rects,
            vec![
                DiffRectangle {
                    xmin: 1.0,
                    ymin: 1.0,
                    xmax: 2.0,
                    ymax: f64::INFINITY,
                    interval: 1
                },
                DiffRectangle {
                    xmin: 2.0,
                    ymin: 1.0,
                    xmax: f64::INFINITY,
                    ymax: 2.0,
                    interval: 1
                },
            ]
        );
    }

    #[test]
    fn test_rectangles_agree_with_points() {
        let left = runs(&[
            vec![vec![1.0, 3.0], vec![3.0, 1.0]],
            vec![vec![2.0, 2.0]],
        ]);
        let right = one_run(&[vec![2.5, 0.5]]);
        let points = eafdiff(&left, &right, &MIN2, 3).unwrap();
        let rects = eafdiff_rectangles(&left, &right, &MIN2, 3).unwrap();
        let covering = |x: f64, y: f64| {
            rects
                .iter()
                .find(|r| r.xmin <= x && x < r.xmax && r.ymin <= y && y < r.ymax)
        };
        for p in &points {
            match covering(p.x, p.y) {
                Some(r) => assert_eq!(r.interval, p.interval),
                None => assert_eq!(p.interval, 0),
            }
        }
    }

    #[test]
    fn test_polygons_l_shape() {
        let left = one_run(&[vec![1.0, 1.0]]);
        let right = one_run(&[vec![2.0, 2.0]]);
        let polygons = eafdiff_polygons(&left, &right, &MIN2, 1).unwrap();
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].interval, 1);
        let inf = f64::INFINITY;
        assert_eq!(
            polygons[0].vertices,
            vec![
                [1.0, 1.0],
                [inf, 1.0],
                [inf, 2.0],
                [2.0, 2.0],
                [2.0, inf],
                [1.0, inf],
                [1.0, 1.0],
            ]
        );
    }

    #[test]
    fn test_polygons_split_by_interval() {
        let left = runs(&[vec![vec![1.0, 1.0]], vec![vec![2.0, 2.0]]]);
        let right = one_run(&[vec![4.0, 4.0]]);
        let polygons = eafdiff_polygons(&left, &right, &MIN2, 2).unwrap();
        // Interval 1 covers two regions that do not touch; interval 2 is
        // one L-shape.
        assert_eq!(
            polygons.iter().filter(|p| p.interval == 1).count(),
            2,
        );
        assert_eq!(
            polygons.iter().filter(|p| p.interval == 2).count(),
            1,
        );
        for poly in &polygons {
            let verts = &poly.vertices;
            assert!(verts.len() >= 5);
            assert_eq!(verts.first(), verts.last());
            for pair in verts.windows(2) {
                let vertical = pair[0][0].total_cmp(&pair[1][0]) == Ordering::Equal;
                let horizontal = pair[0][1].total_cmp(&pair[1][1]) == Ordering::Equal;
                assert!(vertical != horizontal, "edges must be axis-aligned");
            }
        }
    }

    #[test]
    fn test_identical_sides_cancel() {
        let side = runs(&[
            vec![vec![1.0, 3.0], vec![3.0, 1.0]],
            vec![vec![2.0, 2.0]],
        ]);
        assert!(eafdiff_rectangles(&side, &side, &MIN2, 5)
            .unwrap()
            .is_empty());
        assert!(eafdiff_polygons(&side, &side, &MIN2, 5).unwrap().is_empty());
        let points = eafdiff(&side, &side, &MIN2, 5).unwrap();
        assert!(!points.is_empty());
        assert!(points.iter().all(|p| p.interval == 0));
    }

    #[test]
    fn test_rectangles_maximize_orientation() {
        let left = one_run(&[vec![1.0, 1.0]]);
        let right = one_run(&[vec![2.0, 2.0]]);
        let rects = eafdiff_rectangles(&left, &right, &MAX2, 1).unwrap();
        // Under maximization the right run attains the larger region, so
        // the difference favors the right side below (2, 2).
        let inf = f64::INFINITY;
        assert_eq!(
            rects,
            vec![
                DiffRectangle {
                    xmin: -inf,
                    ymin: 1.0,
                    xmax: 1.0,
                    ymax: 2.0,
                    interval: -1
                },
                DiffRectangle {
                    xmin: 1.0,
                    ymin: -inf,
                    xmax: 2.0,
                    ymax: 2.0,
                    interval: -1
                },
            ]
        );
    }

    #[test]
    fn test_validation_errors() {
        let flat = one_run(&[vec![1.0, 2.0]]);
        let cube = one_run(&[vec![1.0, 2.0, 3.0]]);
        assert!(matches!(
            eafdiff(&flat, &cube, &MIN2, 2),
            Err(Error::DimensionMismatch { expected: 2, got: 3 })
        ));
        assert!(matches!(
            eafdiff(&cube, &cube, &[Direction::Minimize; 3], 2),
            Err(Error::UnsupportedDimension { got: 3, .. })
        ));
        assert!(matches!(
            eafdiff(&flat, &flat, &MIN2, 0),
            Err(Error::ZeroIntervals)
        ));
        let empty = SetCollection::from_sets(&[]).unwrap();
        assert!(matches!(
            eafdiff(&flat, &empty, &MIN2, 2),
            Err(Error::EmptyInput)
        ));
    }
}
