//! Hello command - liveness check.

use crate::commands::CommandHandler;
use crate::error::CommandError;
use async_trait::async_trait;
use slack_client::{CommandEvent, Reply};

pub struct HelloHandler;

impl HelloHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HelloHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for HelloHandler {
    fn command(&self) -> &str {
        "/hello"
    }

    async fn execute(&self, event: &CommandEvent) -> Result<Reply, CommandError> {
        let user = event.user_name.as_deref().unwrap_or("there");
        Ok(Reply::ephemeral(format!(
            "👋 Hey, {}! I'm alive. Try `/help`",
            user
        )))
    }
}
