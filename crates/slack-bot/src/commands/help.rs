//! Help command - lists available commands.

use crate::commands::CommandHandler;
use crate::error::CommandError;
use async_trait::async_trait;
use slack_client::{CommandEvent, Reply, Visibility};

pub struct HelpHandler {
    default_zone: String,
}

impl HelpHandler {
    pub fn new(default_zone: impl Into<String>) -> Self {
        Self {
            default_zone: default_zone.into(),
        }
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    fn command(&self) -> &str {
        "/help"
    }

    async fn execute(&self, _event: &CommandEvent) -> Result<Reply, CommandError> {
        Ok(Reply::section(
            Visibility::Ephemeral,
            format!(
                "*Available commands:*\n\
                 • `/hello` – sanity check\n\
                 • `/echo <text>` – echo back (ephemeral)\n\
                 • `/reverse <text>` – reverse text\n\
                 • `/calc <expr>` – safe math (e.g., `12.5*3+2`, `-4.5**2`)\n\
                 • `/time [IANA_TZ]` – current time (default {})\n\
                 • `/weather <city>` – current weather via OpenWeather\n\
                 • `/help` – this menu",
                self.default_zone
            ),
        ))
    }
}
