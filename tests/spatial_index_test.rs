//! Integration tests for CandidateIndex

use nodestitch::geo_utils::{chord_distance, to_unit_sphere};
use nodestitch::{
    AtomicProgressTracker, CandidateIndex, SphericalPoint, build_indices,
    build_indices_with_progress,
};
use std::sync::atomic::Ordering;

fn points(coords: &[(f64, f64)]) -> Vec<SphericalPoint> {
    coords
        .iter()
        .map(|&(lat, lon)| to_unit_sphere(lat, lon))
        .collect()
}

#[test]
fn test_nearest_returns_candidate_index() {
    let pts = points(&[(0.0, 0.0), (10.0, 10.0), (-20.0, 100.0), (45.0, -60.0)]);
    let index = CandidateIndex::build(&pts);
    assert_eq!(index.len(), 4);

    let query = to_unit_sphere(-19.0, 101.0);
    let (idx, distance) = index.nearest(&query).unwrap();
    assert_eq!(idx, 2);
    assert!((distance - chord_distance(&query, &pts[2])).abs() < 1e-12);
}

#[test]
fn test_nearest_exact_hit_has_zero_distance() {
    let pts = points(&[(5.0, 5.0), (6.0, 6.0)]);
    let index = CandidateIndex::build(&pts);
    let (idx, distance) = index.nearest(&pts[1]).unwrap();
    assert_eq!(idx, 1);
    assert!(distance < 1e-12);
}

#[test]
fn test_nearest_across_dateline() {
    // Planar lat/lon distance would pick the second point; on the sphere the
    // first is closer.
    let pts = points(&[(0.0, -179.5), (0.0, 175.0)]);
    let index = CandidateIndex::build(&pts);
    let (idx, _) = index.nearest(&to_unit_sphere(0.0, 179.5)).unwrap();
    assert_eq!(idx, 0);
}

#[test]
fn test_tie_returns_one_of_the_equidistant_points() {
    let pts = points(&[(0.0, -2.0), (0.0, 2.0), (30.0, 0.0)]);
    let index = CandidateIndex::build(&pts);
    let query = to_unit_sphere(0.0, 0.0);
    let (idx, distance) = index.nearest(&query).unwrap();
    assert!(idx == 0 || idx == 1);
    assert!((distance - chord_distance(&query, &pts[0])).abs() < 1e-12);
}

#[test]
fn test_empty_index() {
    let index = CandidateIndex::build(&[]);
    assert!(index.is_empty());
    assert!(index.nearest(&to_unit_sphere(0.0, 0.0)).is_none());
    assert!(CandidateIndex::for_time_step(&[]).is_none());
}

#[test]
fn test_build_indices_skips_empty_steps() {
    let positions = vec![points(&[(0.0, 0.0)]), Vec::new(), points(&[(1.0, 1.0), (2.0, 2.0)])];
    let indices = build_indices(&positions);
    assert_eq!(indices.len(), 3);
    assert_eq!(indices[0].as_ref().map(CandidateIndex::len), Some(1));
    assert!(indices[1].is_none());
    assert_eq!(indices[2].as_ref().map(CandidateIndex::len), Some(2));
}

#[test]
fn test_build_indices_ticks_every_time_step() {
    let tracker = AtomicProgressTracker::new();
    let positions = vec![points(&[(0.0, 0.0)]), Vec::new(), points(&[(1.0, 1.0)])];
    let indices = build_indices_with_progress(&positions, &tracker);
    assert_eq!(indices.len(), 3);
    assert_eq!(tracker.completed.load(Ordering::SeqCst), 3);
}
