//! Mapping API HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use sidetrip_core::ProviderError;

/// Default public endpoint for the mapping web services.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// HTTP client for the directions and place-search services.
///
/// One instance serves both ports; the underlying connection pool is shared.
pub struct MapsClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
}

impl MapsClient {
    /// Create a new client against the given base URL.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// GET a JSON document from `path` under the base URL, with the API key
    /// appended to the query string.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "maps request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}
