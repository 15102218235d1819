//! Slack slash-command bot: handlers, dispatch and configuration.

pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod format;

pub use dispatcher::{Dispatcher, InvocationState};
