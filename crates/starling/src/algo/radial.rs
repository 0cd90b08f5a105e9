//! Degree-derived radii and visual sizes.

use crate::geom::Point;

/// Lower bound of the radial band, relative to a node's target radius.
pub const BAND_MIN: f64 = 0.4;
/// Upper bound of the radial band, relative to a node's target radius.
pub const BAND_MAX: f64 = 1.6;

/// `max_radius * (1 - degree / max_degree)`; every node gets `max_radius` when `max_degree` is 0.
pub fn target_radius(degree: usize, max_degree: usize, max_radius: f64) -> f64 {
    if max_degree == 0 {
        return max_radius;
    }
    let ratio = (degree as f64 / max_degree as f64).min(1.0);
    max_radius * (1.0 - ratio)
}

pub fn target_radii(degrees: &[usize], max_radius: f64) -> Vec<f64> {
    let max_degree = degrees.iter().copied().max().unwrap_or(0);
    degrees
        .iter()
        .map(|&d| target_radius(d, max_degree, max_radius))
        .collect()
}

/// Presentation-independent node size used for collision thresholds.
pub fn visual_size(degree: usize) -> f64 {
    10.0 + (degree as f64 * 0.5).min(40.0)
}

/// Rescales `p` so that its distance from the origin lies in `[0.4, 1.6] * target`.
/// Points at the origin have no direction and are returned unchanged.
pub(crate) fn clamp_to_band(p: Point, target: f64) -> Point {
    let r = p.length();
    if r <= f64::EPSILON {
        return p;
    }
    let clamped = r.clamp(target * BAND_MIN, target * BAND_MAX);
    if clamped == r { p } else { p * (clamped / r) }
}

/// Radial range a connected node may occupy once collisions are resolved: the band around
/// `target`, lifted to at least `floor` and never past `ceiling`.
pub(crate) fn band_limits(target: f64, floor: f64, ceiling: f64) -> (f64, f64) {
    let lo = (target * BAND_MIN).max(floor).min(ceiling);
    let hi = (target * BAND_MAX).max(lo).min(ceiling);
    (lo, hi)
}
