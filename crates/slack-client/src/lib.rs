//! Slack Web API and Socket Mode client.

mod client;
mod error;
mod socket;
mod types;

pub use client::{SlackClient, DEFAULT_API_URL};
pub use error::SlackError;
pub use socket::{CommandTransport, ReconnectPolicy, SocketModeReceiver, SocketModeTransport};
pub use types::*;
