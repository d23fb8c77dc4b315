//! Corridor membership test for points near a route polyline.

use crate::models::LatLng;
use crate::spatial::{distance_to_segment_m, EARTH_RADIUS_M};

/// Scale factor converting a meter offset into the degree-of-arc tolerance
/// used by the edge test, matching the mapping SDK convention this test is
/// compatible with: the accepted band around the polyline is
/// `max_offset_m / 1_000_000` degrees of arc, not `max_offset_m` meters.
pub const EDGE_TOLERANCE_SCALE: f64 = 1_000_000.0;

/// Decide whether `point` lies within the corridor around `path`.
///
/// The corridor half-width is `max_offset_m / EDGE_TOLERANCE_SCALE` degrees
/// of arc. Distances are measured geodesically to the nearest polyline
/// segment and converted to degrees of arc for the comparison. A point
/// exactly on a segment is accepted for any non-negative offset.
///
/// Paths with fewer than two points have no segments and never match.
pub fn is_within_corridor(point: LatLng, path: &[LatLng], max_offset_m: f64) -> bool {
    if path.len() < 2 {
        return false;
    }

    let tolerance_deg = max_offset_m / EDGE_TOLERANCE_SCALE;
    min_distance_to_path_deg(point, path) <= tolerance_deg
}

/// Minimum distance from a point to any segment of the path, in degrees of
/// arc on the sphere.
fn min_distance_to_path_deg(point: LatLng, path: &[LatLng]) -> f64 {
    let mut best = f64::INFINITY;
    for pair in path.windows(2) {
        let dist_m = distance_to_segment_m(point, pair[0], pair[1]);
        let dist_deg = (dist_m / EARTH_RADIUS_M).to_degrees();
        if dist_deg < best {
            best = dist_deg;
        }
    }
    best
}
