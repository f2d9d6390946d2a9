//! Geographic utilities on the unit sphere.

use crate::SphericalPoint;

/// Convert degrees to radians.
#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Convert radians to degrees.
#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Project a latitude/longitude pair (degrees) onto the unit sphere.
///
/// Uses `x = sin(lon)·cos(lat)`, `y = cos(lon)·cos(lat)`, `z = sin(lat)`.
pub fn to_unit_sphere(lat_deg: f64, lon_deg: f64) -> SphericalPoint {
    let lat = to_radians(lat_deg);
    let lon = to_radians(lon_deg);
    SphericalPoint {
        x: lon.sin() * lat.cos(),
        y: lon.cos() * lat.cos(),
        z: lat.sin(),
        lat,
        lon,
    }
}

/// Great-circle distance in degrees between two points, via the
/// spherical law of cosines.
///
/// The cosine is clamped to `[-1, 1]` so that identical points give
/// exactly zero instead of NaN from rounding.
pub fn great_circle_degrees(a: &SphericalPoint, b: &SphericalPoint) -> f64 {
    let cos_angle = b.lat.sin() * a.lat.sin() + b.lat.cos() * a.lat.cos() * (a.lon - b.lon).cos();
    to_degrees(cos_angle.clamp(-1.0, 1.0).acos())
}

/// Straight-line (chord) distance between two points in the Cartesian
/// embedding.
pub fn chord_distance(a: &SphericalPoint, b: &SphericalPoint) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}
