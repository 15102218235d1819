//! Command backends for the Slack bot: safe arithmetic, OpenWeather
//! lookups and zone clocks.

pub mod calculator;
pub mod clock;
mod error;
pub mod weather;

pub use calculator::{evaluate, format_number, Number};
pub use error::{EvalError, ToolError, UnknownZone};
pub use weather::{GeocodingClient, Place, Units, WeatherClient, WeatherReading};
