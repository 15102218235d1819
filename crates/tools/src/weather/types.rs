//! OpenWeather payloads and the domain types built from them.

use serde::Deserialize;

/// Unit system passed to the weather endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }
}

/// A geocoded location.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    /// ISO country code, empty when the geocoder omits it.
    pub country: String,
    pub state: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions. Any field may be missing from the payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherReading {
    pub description: Option<String>,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

/// One entry of the direct geocoding response array.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodingMatch {
    pub name: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl GeocodingMatch {
    pub(crate) fn into_place(self, query: &str) -> Place {
        Place {
            name: self.name.unwrap_or_else(|| query.to_string()),
            country: self.country.unwrap_or_default(),
            state: self.state,
            latitude: self.lat,
            longitude: self.lon,
        }
    }
}

/// Current weather response (`/data/2.5/weather`).
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentWeatherResponse {
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub main: MainMetrics,
    #[serde(default)]
    pub wind: Wind,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Condition {
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MainMetrics {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Wind {
    pub speed: Option<f64>,
}

impl From<CurrentWeatherResponse> for WeatherReading {
    fn from(resp: CurrentWeatherResponse) -> Self {
        Self {
            description: resp
                .weather
                .into_iter()
                .next()
                .and_then(|c| c.description)
                .filter(|d| !d.is_empty()),
            temperature: resp.main.temp,
            feels_like: resp.main.feels_like,
            humidity: resp.main.humidity,
            wind_speed: resp.wind.speed,
        }
    }
}
