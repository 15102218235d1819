//! Slack command bot - Main entry point.

use anyhow::Context;
use secrecy::ExposeSecret;
use slack_bot::commands::default_handlers;
use slack_bot::config::Config;
use slack_bot::error::AppResult;
use slack_bot::Dispatcher;
use slack_client::{ReconnectPolicy, SlackClient, SocketModeReceiver, SocketModeTransport};
use std::sync::Arc;
use tokio::signal;
use tokio_stream::StreamExt;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.bot.log_level);

    info!("Starting Slack command bot...");

    let slack = SlackClient::new(
        &config.slack.api_url,
        config.slack_app_token.expose_secret(),
        config.slack_bot_token.expose_secret(),
        config.slack.timeout,
    )
    .context("Failed to create Slack client")?;

    // Health check
    if slack.health_check().await {
        info!("Slack API healthy");
    } else {
        warn!("Slack auth.test failed - check SLACK_BOT_TOKEN");
    }

    let transport = SocketModeTransport::new(slack);

    // Create command handlers
    let handlers = default_handlers(&config)?;
    let dispatcher = Arc::new(Dispatcher::new(
        handlers,
        Arc::new(transport.clone()),
        config.bot.handler_timeout,
    ));

    info!("Registered commands: {}", dispatcher.commands().join(", "));
    info!("Default timezone: {}", config.default_timezone);

    // Start Socket Mode receiver
    let policy = ReconnectPolicy {
        max_retries: config.slack.max_reconnects,
        ..Default::default()
    };
    let receiver = SocketModeReceiver::new(transport, policy);
    let mut stream = Box::pin(receiver.stream());

    info!("Listening for commands...");

    // Main event loop
    loop {
        tokio::select! {
            next = stream.next() => match next {
                Some(event) => {
                    let dispatcher = dispatcher.clone();
                    tokio::spawn(async move {
                        dispatcher.dispatch(event).await;
                    });
                }
                None => {
                    warn!("Socket Mode stream ended");
                    break;
                }
            },
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
