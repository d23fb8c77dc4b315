//! Directions service wire types and the routing port implementation.

use async_trait::async_trait;
use serde::Deserialize;

use sidetrip_core::{
    LatLng, ProviderError, ProviderStatus, Route, RouteLeg, RouteResponse, RouteStep,
    RoutingProvider, TravelMode,
};

use crate::MapsClient;

/// Directions API response.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

#[derive(Debug, Deserialize)]
pub struct RouteDto {
    #[serde(default)]
    pub legs: Vec<LegDto>,
    #[serde(default)]
    pub overview_path: Vec<PointDto>,
}

#[derive(Debug, Deserialize)]
pub struct LegDto {
    #[serde(default)]
    pub steps: Vec<StepDto>,
    /// Leg length; absent for degenerate legs.
    pub distance: Option<TextValueDto>,
}

#[derive(Debug, Deserialize)]
pub struct StepDto {
    #[serde(default)]
    pub path: Vec<PointDto>,
}

#[derive(Debug, Deserialize)]
pub struct TextValueDto {
    pub value: f64,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PointDto {
    pub lat: f64,
    pub lng: f64,
}

impl From<PointDto> for LatLng {
    fn from(p: PointDto) -> Self {
        Self::new(p.lat, p.lng)
    }
}

impl From<RouteDto> for Route {
    fn from(dto: RouteDto) -> Self {
        Self {
            legs: dto
                .legs
                .into_iter()
                .map(|leg| RouteLeg {
                    steps: leg
                        .steps
                        .into_iter()
                        .map(|step| RouteStep {
                            path: step.path.into_iter().map(LatLng::from).collect(),
                        })
                        .collect(),
                    distance_m: leg.distance.map(|d| d.value).unwrap_or(0.0),
                })
                .collect(),
            overview_path: dto.overview_path.into_iter().map(LatLng::from).collect(),
        }
    }
}

#[async_trait]
impl RoutingProvider for MapsClient {
    async fn route(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> Result<RouteResponse, ProviderError> {
        let response: DirectionsResponse = self
            .get_json(
                "/directions/json",
                &[
                    ("origin", origin),
                    ("destination", destination),
                    ("mode", mode.as_str()),
                ],
            )
            .await?;

        Ok(RouteResponse {
            status: ProviderStatus::from_code(&response.status),
            routes: response.routes.into_iter().map(Route::from).collect(),
        })
    }
}
