//! Tests for geo_utils module

use nodestitch::geo_utils::*;

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_great_circle_same_point() {
    let p = to_unit_sphere(23.4, 141.2);
    assert_eq!(great_circle_degrees(&p, &p), 0.0);
}

#[test]
fn test_great_circle_along_equator() {
    let a = to_unit_sphere(0.0, 0.0);
    let b = to_unit_sphere(0.0, 4.0);
    assert!(approx_eq(great_circle_degrees(&a, &b), 4.0, 1e-9));
}

#[test]
fn test_great_circle_along_meridian() {
    let a = to_unit_sphere(10.0, 80.0);
    let b = to_unit_sphere(13.0, 80.0);
    assert!(approx_eq(great_circle_degrees(&a, &b), 3.0, 1e-9));
}

#[test]
fn test_great_circle_across_dateline() {
    let a = to_unit_sphere(0.0, 179.0);
    let b = to_unit_sphere(0.0, -179.0);
    assert!(approx_eq(great_circle_degrees(&a, &b), 2.0, 1e-9));
}

#[test]
fn test_great_circle_antipodes() {
    let a = to_unit_sphere(0.0, 0.0);
    let b = to_unit_sphere(0.0, 180.0);
    assert!(approx_eq(great_circle_degrees(&a, &b), 180.0, 1e-9));
}

#[test]
fn test_chord_monotonic_in_arc() {
    let origin = to_unit_sphere(30.0, 60.0);
    let near = to_unit_sphere(31.0, 61.0);
    let far = to_unit_sphere(40.0, 75.0);
    assert!(great_circle_degrees(&origin, &near) < great_circle_degrees(&origin, &far));
    assert!(chord_distance(&origin, &near) < chord_distance(&origin, &far));
}

#[test]
fn test_radian_conversions() {
    assert!(approx_eq(to_radians(180.0), std::f64::consts::PI, 1e-12));
    assert!(approx_eq(to_degrees(std::f64::consts::FRAC_PI_2), 90.0, 1e-12));
}
