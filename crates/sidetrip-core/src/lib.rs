pub mod corridor;
pub mod models;
pub mod path;
pub mod provider;
pub mod sample;
pub mod spatial;

pub use corridor::{is_within_corridor, EDGE_TOLERANCE_SCALE};
pub use models::{Candidate, LatLng, Route, RouteLeg, RouteStep, SearchAnchor};
pub use path::{corridor_spine, flatten_route_path, SPINE_DETAIL_THRESHOLD};
pub use provider::{
    NearbySearchProvider, ProviderError, ProviderStatus, RouteResponse, RoutingProvider,
    SearchResponse, TravelMode,
};
pub use sample::{anchor_count, sample_anchors, ANCHOR_SPACING_M, MIN_ANCHORS};
pub use spatial::haversine_distance;
