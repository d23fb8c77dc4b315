//! Place-search wire types and the nearby-search port implementation.

use async_trait::async_trait;
use serde::Deserialize;

use sidetrip_core::{
    Candidate, LatLng, NearbySearchProvider, ProviderError, ProviderStatus, SearchResponse,
};

use crate::directions::PointDto;
use crate::MapsClient;

/// Nearby-search API response.
#[derive(Debug, Deserialize)]
pub struct PlacesResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceDto>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceDto {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub vicinity: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub geometry: Option<GeometryDto>,
}

#[derive(Debug, Deserialize)]
pub struct GeometryDto {
    #[serde(default)]
    pub location: Option<PointDto>,
}

impl From<PlaceDto> for Candidate {
    fn from(dto: PlaceDto) -> Self {
        Self {
            place_id: dto.place_id,
            name: dto.name,
            vicinity: dto.vicinity,
            rating: dto.rating,
            rating_count: dto.user_ratings_total,
            icon: dto.icon,
            location: dto
                .geometry
                .and_then(|g| g.location)
                .map(LatLng::from),
        }
    }
}

#[async_trait]
impl NearbySearchProvider for MapsClient {
    async fn nearby_search(
        &self,
        location: LatLng,
        radius_m: f64,
        category: &str,
    ) -> Result<SearchResponse, ProviderError> {
        let location_param = format!("{},{}", location.lat, location.lng);
        let radius_param = format!("{}", radius_m);

        let response: PlacesResponse = self
            .get_json(
                "/place/nearbysearch/json",
                &[
                    ("location", location_param.as_str()),
                    ("radius", radius_param.as_str()),
                    ("type", category),
                ],
            )
            .await?;

        Ok(SearchResponse {
            status: ProviderStatus::from_code(&response.status),
            results: response.results.into_iter().map(Candidate::from).collect(),
        })
    }
}
