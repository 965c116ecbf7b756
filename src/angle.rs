//! Angle utilities used by the heading estimator and the rotation helper.

/// Normalizes an angle in degrees into the range [0, 360).
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let norm = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if norm >= 360.0 {
        0.0
    } else {
        norm
    }
}

/// Bearing in degrees of `point` seen from `center`, in image coordinates.
///
/// Image rows grow downwards, so the vertical offset is flipped before the
/// two-argument arctangent: a point straight above the centre is 90°, one to
/// the right is 0°. The result lies in [0, 360).
#[inline]
pub fn bearing_degrees(center: (f64, f64), point: (f64, f64)) -> f64 {
    let dx = point.0 - center.0;
    let dy = center.1 - point.1;
    normalize_degrees(dy.atan2(dx).to_degrees())
}

/// Smallest unsigned difference between two bearings in degrees, in [0, 180].
#[inline]
pub fn angular_difference_deg(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}
