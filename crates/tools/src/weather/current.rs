//! Current conditions for a coordinate pair.

use super::types::{CurrentWeatherResponse, Units, WeatherReading};
use super::{build_http, decode};
use crate::error::ToolError;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenWeather current weather client.
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
    timeout: Duration,
}

impl WeatherClient {
    /// Create a new weather client.
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

    /// Fetch current conditions. Coordinates are assumed valid.
    #[instrument(skip(self))]
    pub async fn fetch_current(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
    ) -> Result<WeatherReading, ToolError> {
        let timeout_secs = self.timeout.as_secs();
        let response = self
            .client
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.expose_secret().clone()),
                ("units", units.as_str().to_string()),
            ])
            .send()
            .await
            .map_err(|e| ToolError::from_reqwest(e, timeout_secs))?;

        let payload: CurrentWeatherResponse = decode(response, timeout_secs).await?;
        let reading = WeatherReading::from(payload);

        debug!(temp = ?reading.temperature, "Fetched current weather");
        Ok(reading)
    }
}
