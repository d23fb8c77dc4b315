//! Ports for the external routing and nearby-search collaborators.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Candidate, LatLng, Route};

/// Travel mode for route requests. Only walking routes are exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walking,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walking => "walking",
        }
    }
}

/// Wire status codes shared by the mapping web services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    Ok,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    UnknownError,
    /// Status code this client does not recognize, passed through verbatim.
    Other(String),
}

impl ProviderStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "OK" => Self::Ok,
            "ZERO_RESULTS" => Self::ZeroResults,
            "OVER_QUERY_LIMIT" => Self::OverQueryLimit,
            "REQUEST_DENIED" => Self::RequestDenied,
            "INVALID_REQUEST" => Self::InvalidRequest,
            "UNKNOWN_ERROR" => Self::UnknownError,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            Self::Ok => "OK",
            Self::ZeroResults => "ZERO_RESULTS",
            Self::OverQueryLimit => "OVER_QUERY_LIMIT",
            Self::RequestDenied => "REQUEST_DENIED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::Other(code) => code,
        }
    }

    pub fn is_ok(&self) -> bool {
        *self == Self::Ok
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Failure reaching or decoding a provider response.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("request timed out")]
    Timeout,
}

/// Route lookup result: a status code plus zero or more routes.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub status: ProviderStatus,
    pub routes: Vec<Route>,
}

/// Nearby-search result: a status code plus zero or more candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub status: ProviderStatus,
    pub results: Vec<Candidate>,
}

/// Port for the external routing service.
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn route(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> Result<RouteResponse, ProviderError>;
}

/// Port for the external proximity-search service.
#[async_trait]
pub trait NearbySearchProvider: Send + Sync {
    async fn nearby_search(
        &self,
        location: LatLng,
        radius_m: f64,
        category: &str,
    ) -> Result<SearchResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for code in [
            "OK",
            "ZERO_RESULTS",
            "OVER_QUERY_LIMIT",
            "REQUEST_DENIED",
            "INVALID_REQUEST",
            "UNKNOWN_ERROR",
        ] {
            assert_eq!(ProviderStatus::from_code(code).as_code(), code);
        }
        let unknown = ProviderStatus::from_code("NOT_FOUND");
        assert_eq!(unknown, ProviderStatus::Other("NOT_FOUND".to_string()));
        assert_eq!(unknown.as_code(), "NOT_FOUND");
    }

    #[test]
    fn only_ok_is_ok() {
        assert!(ProviderStatus::Ok.is_ok());
        assert!(!ProviderStatus::ZeroResults.is_ok());
        assert!(!ProviderStatus::Other("NOT_FOUND".to_string()).is_ok());
    }

    #[test]
    fn status_displays_as_wire_code() {
        assert_eq!(ProviderStatus::OverQueryLimit.to_string(), "OVER_QUERY_LIMIT");
    }
}
