//! Application error types.

use slack_client::Reply;
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Slack error: {0}")]
    Slack(#[from] slack_client::SlackError),

    #[error("Tool error: {0}")]
    Tool(#[from] tools::ToolError),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;

pub const WEATHER_RETRY: &str = "Sorry, I couldn't fetch the weather right now. Please try again.";
pub const CALC_HELP: &str =
    "Sorry, I only support basic numeric expressions like `2+2*3`, `-4.5**2`, `7%3`";
pub const UNKNOWN_ZONE: &str =
    "Unknown timezone. Try `/time Asia/Kolkata` or `/time Europe/London`";
pub const APOLOGY: &str = "Sorry, something went wrong. Please try again.";

/// Per-invocation failure. Every variant maps to exactly one user-facing
/// reply; none of the wrapped detail is shown to the user.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Missing or malformed argument. Carries the usage hint.
    #[error("usage: {0}")]
    Usage(String),

    #[error("evaluation failed: {0}")]
    Evaluation(#[from] tools::EvalError),

    /// Geocoding found no match for the query.
    #[error("no match for '{0}'")]
    NotFound(String),

    /// External API failure (network, timeout, status, payload).
    #[error("client error: {0}")]
    Client(tools::ToolError),

    #[error("{0}")]
    UnknownZone(#[from] tools::UnknownZone),

    /// A command whose backing service was not configured at startup.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Anything else: panics, timeouts, unknown commands.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<tools::ToolError> for CommandError {
    fn from(err: tools::ToolError) -> Self {
        match err {
            tools::ToolError::NotFound(query) => CommandError::NotFound(query),
            other => CommandError::Client(other),
        }
    }
}

impl CommandError {
    /// Whether the operator should hear about this one.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CommandError::Client(_) | CommandError::NotConfigured(_) | CommandError::Internal(_)
        )
    }

    /// The reply shown to the user in place of the error.
    pub fn user_reply(&self) -> Reply {
        match self {
            CommandError::Usage(usage) => Reply::ephemeral(usage.clone()),
            CommandError::Evaluation(_) => Reply::ephemeral(CALC_HELP),
            CommandError::NotFound(query) => Reply::ephemeral(format!("Couldn't find `{}`.", query)),
            CommandError::Client(_) | CommandError::NotConfigured("weather") => {
                Reply::ephemeral(WEATHER_RETRY)
            }
            CommandError::UnknownZone(_) => Reply::ephemeral(UNKNOWN_ZONE),
            CommandError::NotConfigured(_) | CommandError::Internal(_) => Reply::ephemeral(APOLOGY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_split_from_client_errors() {
        let not_found = CommandError::from(tools::ToolError::NotFound("atlantis".into()));
        assert!(matches!(not_found, CommandError::NotFound(ref q) if q == "atlantis"));
        assert_eq!(not_found.user_reply().text(), "Couldn't find `atlantis`.");

        let client = CommandError::from(tools::ToolError::Timeout(10));
        assert!(client.is_internal());
        assert_eq!(client.user_reply().text(), WEATHER_RETRY);
    }

    #[test]
    fn test_replies_do_not_leak_detail() {
        let errors = [
            CommandError::Evaluation(tools::EvalError::Syntax("unexpected `)` at 4".into())),
            CommandError::Client(tools::ToolError::Api {
                status: 500,
                message: "stack trace here".into(),
            }),
            CommandError::Internal("panicked at src/lib.rs:1".into()),
        ];

        for err in errors {
            let text = err.user_reply().text();
            assert!(!text.contains("unexpected"));
            assert!(!text.contains("stack trace"));
            assert!(!text.contains("panicked"));
        }
    }

    #[test]
    fn test_unknown_zone_reply() {
        let err = CommandError::from(tools::UnknownZone("Not/AZone".into()));
        assert_eq!(err.user_reply().text(), UNKNOWN_ZONE);
        assert!(!err.is_internal());
    }
}
