//! Echo command - repeats the argument back to the caller.

use crate::commands::{required_args, CommandHandler};
use crate::error::CommandError;
use async_trait::async_trait;
use slack_client::{CommandEvent, Reply};

pub const USAGE: &str = "Usage: `/echo your text`";

pub struct EchoHandler;

impl EchoHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EchoHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for EchoHandler {
    fn command(&self) -> &str {
        "/echo"
    }

    async fn execute(&self, event: &CommandEvent) -> Result<Reply, CommandError> {
        let text = required_args(event, USAGE)?;
        Ok(Reply::ephemeral(format!("you said: {}", text)))
    }
}
