//! Application configuration loaded from environment variables.

use anyhow::{bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Application configuration.
///
/// The four top-level fields use flat variable names (`SLACK_BOT_TOKEN`,
/// `SLACK_APP_TOKEN`, `OPENWEATHER_API_KEY`, `DEFAULT_TIMEZONE`); the
/// sections use `SECTION__FIELD`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bot token (`xoxb-...`)
    pub slack_bot_token: SecretString,

    /// Socket Mode app token (`xapp-...`)
    pub slack_app_token: SecretString,

    /// OpenWeather API key; `/weather` is unavailable without it
    #[serde(default)]
    pub openweather_api_key: Option<SecretString>,

    /// IANA zone used by `/time` when no argument is given
    #[serde(default = "default_timezone")]
    pub default_timezone: String,

    /// Slack connection configuration
    #[serde(default)]
    pub slack: SlackConfig,

    /// OpenWeather configuration
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    /// Slack Web API base URL
    #[serde(default = "default_slack_api_url")]
    pub api_url: String,

    /// Web API request timeout
    #[serde(default = "default_http_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Consecutive socket reconnect failures before giving up
    #[serde(default = "default_max_reconnects")]
    pub max_reconnects: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeather API base URL
    #[serde(default = "default_weather_url")]
    pub base_url: String,

    /// Request timeout for geocoding and weather calls
    #[serde(default = "default_http_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upper bound on a single command invocation
    #[serde(default = "default_handler_timeout", with = "humantime_serde")]
    pub handler_timeout: Duration,
}

// Default implementations
impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_url: default_slack_api_url(),
            timeout: default_http_timeout(),
            max_reconnects: default_max_reconnects(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
            timeout: default_http_timeout(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            handler_timeout: default_handler_timeout(),
        }
    }
}

// Default value functions
fn default_timezone() -> String {
    "Asia/Kolkata".into()
}

fn default_slack_api_url() -> String {
    slack_client::DEFAULT_API_URL.into()
}

fn default_weather_url() -> String {
    tools::weather::DEFAULT_BASE_URL.into()
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_max_reconnects() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".into()
}

fn default_handler_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();
        Self::from_environment(config::Environment::default())
    }

    /// Load configuration from an explicit variable map instead of the
    /// process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::from_environment(config::Environment::default().source(Some(vars)))
    }

    fn from_environment(env: config::Environment) -> Result<Self> {
        let config: Config = config::Config::builder()
            .add_source(env.separator("__").try_parsing(false))
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration (SLACK_BOT_TOKEN and SLACK_APP_TOKEN are required)")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.slack_bot_token.expose_secret().trim().is_empty() {
            bail!("SLACK_BOT_TOKEN is empty");
        }
        if self.slack_app_token.expose_secret().trim().is_empty() {
            bail!("SLACK_APP_TOKEN is empty");
        }
        tools::clock::parse_zone(&self.default_timezone)
            .with_context(|| format!("DEFAULT_TIMEZONE is invalid: {}", self.default_timezone))?;
        Ok(())
    }

    /// OpenWeather key, if one is set and non-empty.
    pub fn weather_api_key(&self) -> Option<&str> {
        self.openweather_api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .filter(|key| !key.trim().is_empty())
    }
}
