//! CLI configuration from environment.

use std::env;

use sidetrip_engine::DiscoveryConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub maps_base_url: String,
    pub maps_api_key: String,
    pub search_radius_m: f64,
    pub corridor_offset_m: f64,
    pub poi_category: String,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = DiscoveryConfig::default();
        Self {
            maps_base_url: env::var("SIDETRIP_MAPS_URL")
                .unwrap_or_else(|_| sidetrip_maps::DEFAULT_BASE_URL.to_string()),
            maps_api_key: env::var("SIDETRIP_MAPS_KEY").unwrap_or_default(),
            search_radius_m: env::var("SIDETRIP_SEARCH_RADIUS_M")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.search_radius_m),
            corridor_offset_m: env::var("SIDETRIP_CORRIDOR_OFFSET_M")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.corridor_offset_m),
            poi_category: env::var("SIDETRIP_POI_CATEGORY").unwrap_or(defaults.category),
        }
    }

    pub fn discovery(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            search_radius_m: self.search_radius_m,
            corridor_offset_m: self.corridor_offset_m,
            category: self.poi_category.clone(),
            ..DiscoveryConfig::default()
        }
    }
}
