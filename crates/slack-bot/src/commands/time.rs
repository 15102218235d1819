//! Time command - current time in an IANA zone.

use crate::commands::CommandHandler;
use crate::error::CommandError;
use crate::format::time_reply;
use async_trait::async_trait;
use slack_client::{CommandEvent, Reply};

pub struct TimeHandler {
    default_zone: String,
}

impl TimeHandler {
    pub fn new(default_zone: impl Into<String>) -> Self {
        Self {
            default_zone: default_zone.into(),
        }
    }
}

#[async_trait]
impl CommandHandler for TimeHandler {
    fn command(&self) -> &str {
        "/time"
    }

    async fn execute(&self, event: &CommandEvent) -> Result<Reply, CommandError> {
        let zone = match event.args() {
            "" => self.default_zone.as_str(),
            zone => zone,
        };
        let now = tools::clock::now_in(zone)?;
        Ok(time_reply(zone, &now))
    }
}
