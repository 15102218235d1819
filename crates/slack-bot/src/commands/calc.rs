//! Calc command - safe arithmetic.

use crate::commands::{required_args, CommandHandler};
use crate::error::CommandError;
use crate::format::calc_reply;
use async_trait::async_trait;
use slack_client::{CommandEvent, Reply};
use tracing::debug;

pub const USAGE: &str = "Usage: `/calc 12.5 * 3 + 2`";

pub struct CalcHandler;

impl CalcHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CalcHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandHandler for CalcHandler {
    fn command(&self) -> &str {
        "/calc"
    }

    async fn execute(&self, event: &CommandEvent) -> Result<Reply, CommandError> {
        let expression = required_args(event, USAGE)?;
        let result = tools::evaluate(expression).map_err(|e| {
            debug!(error = %e, "Rejected expression");
            e
        })?;
        Ok(calc_reply(expression, result))
    }
}
