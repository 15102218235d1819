//! Direct geocoding: free-text place name to coordinates.

use super::types::{GeocodingMatch, Place};
use super::{build_http, decode};
use crate::error::ToolError;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenWeather direct geocoding client.
#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    timeout: Duration,
}

impl GeocodingClient {
    /// Create a new geocoding client.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ToolError> {
        Ok(Self {
            client: build_http(timeout)?,
            base_url: base_url.into(),
            api_key: SecretString::new(api_key.into()),
            timeout,
        })
    }

    /// Resolve a place name to its single best match.
    ///
    /// An empty result set is `ToolError::NotFound`, distinct from
    /// transport and API failures.
    #[instrument(skip(self))]
    pub async fn resolve(&self, query: &str) -> Result<Place, ToolError> {
        let timeout_secs = self.timeout.as_secs();
        let response = self
            .client
            .get(format!("{}/geo/1.0/direct", self.base_url))
            .query(&[
                ("q", query),
                ("limit", "1"),
                ("appid", self.api_key.expose_secret().as_str()),
            ])
            .send()
            .await
            .map_err(|e| ToolError::from_reqwest(e, timeout_secs))?;

        let matches: Vec<GeocodingMatch> = decode(response, timeout_secs).await?;
        let place = matches
            .into_iter()
            .next()
            .map(|m| m.into_place(query))
            .ok_or_else(|| ToolError::NotFound(query.to_string()))?;

        debug!(name = %place.name, lat = place.latitude, lon = place.longitude, "Geocoded");
        Ok(place)
    }
}
