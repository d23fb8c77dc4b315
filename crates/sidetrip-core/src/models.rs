//! Core data models for route-corridor POI discovery.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
///
/// Equality is exact numeric match on both fields. That is only used for
/// identity bookkeeping; proximity decisions always go through geodesic
/// distance in [`crate::spatial`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A single step of a route leg, carrying the traveled polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub path: Vec<LatLng>,
}

/// An ordered run of steps between two route waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub steps: Vec<RouteStep>,
    /// Leg length in meters as reported by the routing provider.
    pub distance_m: f64,
}

/// An origin-to-destination route returned by the routing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub legs: Vec<RouteLeg>,
    /// Coarse fallback polyline covering the whole route.
    pub overview_path: Vec<LatLng>,
}

impl Route {
    /// Total route length in meters, summed over leg distances.
    pub fn total_distance_m(&self) -> f64 {
        self.legs.iter().map(|leg| leg.distance_m).sum()
    }
}

/// A point along the route path at which a proximity search is issued.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchAnchor {
    /// Fractional position along the path's point index, 0.0 to 1.0.
    pub fraction: f64,
    pub position: LatLng,
}

/// A POI record returned by the nearby-search provider.
///
/// Identity for deduplication is `place_id`. Optional fields are absent when
/// the provider did not supply them; absence is distinct from zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub vicinity: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<u32>,
    #[serde(default)]
    pub icon: Option<String>,
    /// Resolved location, if the provider supplied one. Candidates without a
    /// location are never admitted to a result set.
    #[serde(default)]
    pub location: Option<LatLng>,
}
