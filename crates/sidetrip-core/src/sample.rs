//! Search anchor sampling along a route path.

use crate::models::{LatLng, SearchAnchor};

/// One anchor per this many meters of route length.
pub const ANCHOR_SPACING_M: f64 = 10_000.0;

/// Anchor count floor, regardless of route length.
pub const MIN_ANCHORS: usize = 3;

/// Number of anchors for a route of the given total length.
pub fn anchor_count(total_distance_m: f64) -> usize {
    let scaled = (total_distance_m / ANCHOR_SPACING_M).floor();
    if scaled.is_finite() && scaled > MIN_ANCHORS as f64 {
        scaled as usize
    } else {
        MIN_ANCHORS
    }
}

/// Choose anchors spread evenly along the path by fractional point index
/// (not by arc length). Anchor `i` of `n` maps to
/// `path[floor((i / (n - 1)) * (len - 1))]`.
///
/// An empty path yields no anchors.
pub fn sample_anchors(path: &[LatLng], total_distance_m: f64) -> Vec<SearchAnchor> {
    if path.is_empty() {
        return Vec::new();
    }

    let count = anchor_count(total_distance_m);
    let mut anchors = Vec::with_capacity(count);
    for i in 0..count {
        // count is never 1 given the floor of MIN_ANCHORS, but guard the
        // division anyway.
        let fraction = if count > 1 {
            i as f64 / (count - 1) as f64
        } else {
            0.0
        };
        let index = (fraction * (path.len() - 1) as f64).floor() as usize;
        anchors.push(SearchAnchor {
            fraction,
            position: path[index],
        });
    }
    anchors
}
