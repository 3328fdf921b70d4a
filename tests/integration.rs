//! End-to-end tests across the public indicator API.

use mometrics::{
    epsilon_additive, filter_nondominated, hypervolume, hypervolume_contributions,
    hypervolume_filtered, is_nondominated, normalize, pareto_rank, Direction, Error, PointSet,
    SetCollection,
};

const MIN2: [Direction; 2] = [Direction::Minimize, Direction::Minimize];

fn mixed_front() -> PointSet {
    PointSet::from_rows(&[
        vec![2.0, 4.0],
        vec![3.0, 3.0],
        vec![4.0, 2.0],
        vec![3.0, 4.0],
        vec![5.0, 5.0],
    ])
    .unwrap()
}

// ---------------------------------------------------------------------------
// Filtering and hypervolume pipeline
// ---------------------------------------------------------------------------

#[test]
fn test_filter_then_hypervolume() {
    let set = mixed_front();
    let front = filter_nondominated(&set, &MIN2, false).unwrap();
    assert_eq!(front.len(), 3);

    let hv = hypervolume(&front, &[6.0, 6.0], &MIN2).unwrap();
    assert!((hv - 13.0).abs() < 1e-10);
}

#[test]
fn test_dominated_points_add_no_hypervolume() {
    let set = mixed_front();
    let front = filter_nondominated(&set, &MIN2, false).unwrap();
    let hv_full = hypervolume(&set, &[6.0, 6.0], &MIN2).unwrap();
    let hv_front = hypervolume(&front, &[6.0, 6.0], &MIN2).unwrap();
    assert!((hv_full - hv_front).abs() < 1e-10);
}

#[test]
fn test_filtered_matches_strict_on_feasible_input() {
    let set = mixed_front();
    let strict = hypervolume(&set, &[6.0, 6.0], &MIN2).unwrap();
    let relaxed = hypervolume_filtered(&set, &[6.0, 6.0], &MIN2).unwrap();
    assert!((strict - relaxed).abs() < 1e-10);
}

#[test]
fn test_filtered_ignores_points_beyond_reference() {
    let set = mixed_front();
    // (7, 7) lies outside the reference box; the strict API rejects it,
    // the filtered API drops it.
    let mut rows: Vec<Vec<f64>> = set.rows().map(<[f64]>::to_vec).collect();
    rows.push(vec![7.0, 7.0]);
    let widened = PointSet::from_rows(&rows).unwrap();

    assert!(matches!(
        hypervolume(&widened, &[6.0, 6.0], &MIN2),
        Err(Error::InfeasibleReference { point: 5 })
    ));
    let hv = hypervolume_filtered(&widened, &[6.0, 6.0], &MIN2).unwrap();
    assert!((hv - 13.0).abs() < 1e-10);
}

#[test]
fn test_contributions_on_filtered_front() {
    let front = filter_nondominated(&mixed_front(), &MIN2, false).unwrap();
    let contrib = hypervolume_contributions(&front, &[6.0, 6.0], &MIN2).unwrap();
    let expected = [2.0, 1.0, 2.0];
    assert_eq!(contrib.len(), expected.len());
    for (got, want) in contrib.iter().zip(expected.iter()) {
        assert!((got - want).abs() < 1e-10, "contributions {contrib:?}");
    }
    let total = hypervolume(&front, &[6.0, 6.0], &MIN2).unwrap();
    assert!(contrib.iter().sum::<f64>() <= total + 1e-10);
}

#[test]
fn test_maximize_mirrors_minimize() {
    let set = mixed_front();
    let negated: Vec<Vec<f64>> = set
        .rows()
        .map(|row| row.iter().map(|v| -v).collect())
        .collect();
    let flipped = PointSet::from_rows(&negated).unwrap();
    let dirs = [Direction::Maximize, Direction::Maximize];

    let hv_min = hypervolume(&set, &[6.0, 6.0], &MIN2).unwrap();
    let hv_max = hypervolume(&flipped, &[-6.0, -6.0], &dirs).unwrap();
    assert!((hv_min - hv_max).abs() < 1e-10);

    let keep_min = is_nondominated(&set, &MIN2, false).unwrap();
    let keep_max = is_nondominated(&flipped, &dirs, false).unwrap();
    assert_eq!(keep_min, keep_max);
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

#[test]
fn test_rank_layers_on_mixed_front() {
    let rank = pareto_rank(&mixed_front(), &MIN2).unwrap();
    assert_eq!(rank, vec![0, 0, 0, 1, 2]);
}

#[test]
fn test_rank_zero_matches_weak_filter() {
    let set = PointSet::from_rows(&[
        vec![1.0, 5.0],
        vec![1.0, 5.0],
        vec![2.0, 2.0],
        vec![3.0, 3.0],
        vec![5.0, 1.0],
    ])
    .unwrap();
    let rank = pareto_rank(&set, &MIN2).unwrap();
    // Duplicates never strictly dominate each other, so keeping weakly
    // dominated points reproduces the rank-0 layer.
    let keep = is_nondominated(&set, &MIN2, true).unwrap();
    for (level, kept) in rank.iter().zip(keep.iter()) {
        assert_eq!(*level == 0, *kept);
    }
}

// ---------------------------------------------------------------------------
// Normalization feeding indicators
// ---------------------------------------------------------------------------

#[test]
fn test_normalized_epsilon_stays_in_unit_scale() {
    let set = PointSet::from_rows(&[
        vec![3.5, 5.5],
        vec![3.6, 4.1],
        vec![4.1, 3.2],
        vec![5.5, 1.5],
    ])
    .unwrap();
    let scaled = normalize(&set, (0.0, 1.0), None, None, &MIN2).unwrap();
    let front = filter_nondominated(&scaled, &MIN2, false).unwrap();
    // Every objective now lives in [0, 1], so the additive epsilon of
    // the set against its own front cannot exceed 1.
    let eps = epsilon_additive(&scaled, &front, &MIN2).unwrap();
    assert!(eps.abs() < 1e-12);
    for row in scaled.rows() {
        for &v in row {
            assert!((0.0..=1.0).contains(&v));
        }
    }
}

#[test]
fn test_normalize_with_maximize_flips_orientation() {
    let set = PointSet::from_rows(&[vec![1.0, 10.0], vec![2.0, 30.0]]).unwrap();
    let dirs = [Direction::Minimize, Direction::Maximize];
    let scaled = normalize(&set, (0.0, 1.0), None, None, &dirs).unwrap();
    // The best raw value per objective lands at 0 after rescaling.
    assert_eq!(scaled.row(0), &[0.0, 1.0]);
    assert_eq!(scaled.row(1), &[1.0, 0.0]);
    // In the scaled space everything minimizes.
    let keep = is_nondominated(&scaled, &MIN2, false).unwrap();
    assert_eq!(keep, vec![true, true]);
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[test]
fn test_collection_round_trip() {
    let a = PointSet::from_rows(&[vec![1.0, 4.0], vec![4.0, 1.0]]).unwrap();
    let b = PointSet::from_rows(&[vec![2.0, 2.0]]).unwrap();
    let col = SetCollection::from_sets(&[a.clone(), b.clone()]).unwrap();

    assert_eq!(col.n_sets(), 2);
    assert_eq!(col.len(), 3);
    assert_eq!(col.set_points(0), a);
    assert_eq!(col.set_points(1), b);
    assert_eq!(col.cumulative_sizes(), &[2, 3]);
}

#[test]
fn test_collection_flat_and_sets_agree() {
    let flat = SetCollection::from_flat(vec![1.0, 4.0, 4.0, 1.0, 2.0, 2.0], 2, vec![2, 3]).unwrap();
    let a = PointSet::from_rows(&[vec![1.0, 4.0], vec![4.0, 1.0]]).unwrap();
    let b = PointSet::from_rows(&[vec![2.0, 2.0]]).unwrap();
    let built = SetCollection::from_sets(&[a, b]).unwrap();
    assert_eq!(flat, built);
}

// ---------------------------------------------------------------------------
// Error propagation
// ---------------------------------------------------------------------------

#[test]
fn test_direction_mismatch_surfaces_everywhere() {
    let set = PointSet::from_rows(&[vec![1.0, 2.0]]).unwrap();
    let one = [Direction::Minimize];
    assert!(is_nondominated(&set, &one, false).is_err());
    assert!(pareto_rank(&set, &one).is_err());
    assert!(hypervolume(&set, &[3.0], &one).is_err());
    assert!(epsilon_additive(&set, &set, &one).is_err());
    assert!(normalize(&set, (0.0, 1.0), None, None, &one).is_err());
}

#[test]
fn test_invalid_input_reported_with_location() {
    let err = PointSet::from_flat(vec![1.0, 2.0, 3.0, f64::INFINITY], 2).unwrap_err();
    assert!(matches!(
        err,
        Error::NonFinite {
            point: 1,
            objective: 1
        }
    ));
    let message = err.to_string();
    assert!(message.contains("point 1"), "unexpected message: {message}");
}

#[test]
fn test_error_messages_are_stable() {
    let err = PointSet::from_flat(vec![1.0, 2.0, 3.0], 2).unwrap_err();
    assert_eq!(
        err.to_string(),
        "flat data length 3 is not a multiple of 2 objectives"
    );
}
