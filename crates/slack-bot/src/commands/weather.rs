//! Weather command - geocode, fetch current conditions, format.

use crate::commands::{required_args, CommandHandler};
use crate::error::CommandError;
use crate::format::weather_reply;
use async_trait::async_trait;
use slack_client::{CommandEvent, Reply};
use tools::{GeocodingClient, Units, WeatherClient};
use tracing::{info, instrument};

pub const USAGE: &str = "Usage: `/weather <city>`  e.g., `/weather delhi`";

/// The geocode-then-fetch pipeline behind `/weather`.
#[derive(Clone)]
pub struct WeatherService {
    geocoder: GeocodingClient,
    weather: WeatherClient,
}

impl WeatherService {
    pub fn new(geocoder: GeocodingClient, weather: WeatherClient) -> Self {
        Self { geocoder, weather }
    }

    /// Resolve the query and render its current weather.
    #[instrument(skip(self))]
    pub async fn lookup(&self, query: &str) -> Result<Reply, CommandError> {
        let place = self.geocoder.resolve(query).await?;
        info!(place = %place.name, country = %place.country, "Resolved location");

        let reading = self
            .weather
            .fetch_current(place.latitude, place.longitude, Units::Metric)
            .await?;

        Ok(weather_reply(&place, &reading))
    }
}

pub struct WeatherHandler {
    service: Option<WeatherService>,
}

impl WeatherHandler {
    /// `None` when no API key was configured.
    pub fn new(service: Option<WeatherService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CommandHandler for WeatherHandler {
    fn command(&self) -> &str {
        "/weather"
    }

    async fn execute(&self, event: &CommandEvent) -> Result<Reply, CommandError> {
        let query = required_args(event, USAGE)?;
        let service = self
            .service
            .as_ref()
            .ok_or(CommandError::NotConfigured("weather"))?;
        service.lookup(query).await
    }
}
