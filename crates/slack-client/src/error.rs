//! Slack client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Socket error: {0}")]
    Socket(String),

    #[error("Socket not connected")]
    NotConnected,

    #[error("Send failed: {0}")]
    SendFailed(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for SlackError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        SlackError::Socket(err.to_string())
    }
}
