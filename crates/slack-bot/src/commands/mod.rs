//! Slash command handlers.

mod calc;
mod echo;
mod hello;
mod help;
mod reverse;
mod time;
mod weather;

pub use calc::CalcHandler;
pub use echo::EchoHandler;
pub use hello::HelloHandler;
pub use help::HelpHandler;
pub use reverse::ReverseHandler;
pub use time::TimeHandler;
pub use weather::{WeatherHandler, WeatherService};

use crate::config::Config;
use crate::error::{AppResult, CommandError};
use async_trait::async_trait;
use slack_client::{CommandEvent, Reply};
use std::sync::Arc;
use tools::{GeocodingClient, WeatherClient};
use tracing::warn;

/// Command handler trait.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Slash command served, including the slash (e.g. "/calc").
    fn command(&self) -> &str;

    /// Execute the command. Errors are turned into replies by the
    /// dispatcher.
    async fn execute(&self, event: &CommandEvent) -> Result<Reply, CommandError>;
}

/// Trimmed argument text, or a usage error when it is blank.
pub(crate) fn required_args<'a>(
    event: &'a CommandEvent,
    usage: &str,
) -> Result<&'a str, CommandError> {
    match event.args() {
        "" => Err(CommandError::Usage(usage.to_string())),
        args => Ok(args),
    }
}

/// Build the full handler set from configuration.
pub fn default_handlers(config: &Config) -> AppResult<Vec<Arc<dyn CommandHandler>>> {
    let weather = match config.weather_api_key() {
        Some(key) => Some(WeatherService::new(
            GeocodingClient::new(key, &config.weather.base_url, config.weather.timeout)?,
            WeatherClient::new(key, &config.weather.base_url, config.weather.timeout)?,
        )),
        None => {
            warn!("OPENWEATHER_API_KEY not set - /weather will be unavailable");
            None
        }
    };

    Ok(vec![
        Arc::new(HelloHandler::new()),
        Arc::new(EchoHandler::new()),
        Arc::new(ReverseHandler::new()),
        Arc::new(CalcHandler::new()),
        Arc::new(TimeHandler::new(config.default_timezone.clone())),
        Arc::new(WeatherHandler::new(weather)),
        Arc::new(HelpHandler::new(config.default_timezone.clone())),
    ])
}

#[cfg(test)]
pub(crate) fn test_event(command: &str, text: &str) -> CommandEvent {
    CommandEvent {
        envelope_id: "env-test".into(),
        command: command.into(),
        text: text.into(),
        user_id: "U123".into(),
        user_name: Some("alice".into()),
        channel_id: "C123".into(),
        response_url: "http://localhost/hook".into(),
    }
}
