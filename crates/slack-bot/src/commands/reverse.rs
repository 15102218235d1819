//! Reverse command.

use crate::commands::{required_args, CommandHandler};
use crate::error::CommandError;
use async_trait::async_trait;
use slack_client::{CommandEvent, Reply};

pub const USAGE: &str = "Usage: `/reverse your text`";

pub struct ReverseHandler;

impl ReverseHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReverseHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for ReverseHandler {
    fn command(&self) -> &str {
        "/reverse"
    }

    async fn execute(&self, event: &CommandEvent) -> Result<Reply, CommandError> {
        let text = required_args(event, USAGE)?;
        Ok(Reply::ephemeral(text.chars().rev().collect::<String>()))
    }
}
