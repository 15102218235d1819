//! OpenWeather clients: direct geocoding and current conditions.

mod current;
mod geocoding;
mod types;

pub use current::WeatherClient;
pub use geocoding::GeocodingClient;
pub use types::*;

use crate::error::ToolError;
use reqwest::{Client, Response};
use std::time::Duration;

/// Default OpenWeather API host.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Default request timeout for both endpoints.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

fn build_http(timeout: Duration) -> Result<Client, ToolError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Map non-success responses to `ToolError::Api`, then decode the body.
async fn decode<T: serde::de::DeserializeOwned>(
    response: Response,
    timeout_secs: u64,
) -> Result<T, ToolError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ToolError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ToolError::from_reqwest(e, timeout_secs))?;
    Ok(serde_json::from_slice(&body)?)
}
