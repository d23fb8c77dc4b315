//! Route geometry flattening.

use crate::models::{LatLng, Route};

/// Minimum number of detailed path points required before the corridor test
/// uses the detailed path instead of the overview polyline. Short or simple
/// routes yield sparse step paths.
pub const SPINE_DETAIL_THRESHOLD: usize = 10;

/// Flatten every step's path points from every leg, in leg order then step
/// order. Duplicate points at step boundaries are preserved.
pub fn flatten_route_path(route: &Route) -> Vec<LatLng> {
    let mut points = Vec::new();
    for leg in &route.legs {
        for step in &leg.steps {
            points.extend_from_slice(&step.path);
        }
    }
    points
}

/// Pick the polyline used as the corridor spine: the detailed flattened path
/// when it carries enough points, otherwise the coarse overview path.
pub fn corridor_spine<'a>(route: &'a Route, detailed: &'a [LatLng]) -> &'a [LatLng] {
    if detailed.len() > SPINE_DETAIL_THRESHOLD {
        detailed
    } else {
        &route.overview_path
    }
}
