//! Socket Mode connection: command events in, acknowledgments out.

use crate::client::SlackClient;
use crate::error::SlackError;
use crate::types::*;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::time::sleep;
use tokio_stream::Stream;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// The two primitives a command handler needs from the platform.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Tell Slack the event was received. Must happen within the
    /// platform's ack deadline (3 seconds).
    async fn acknowledge(&self, event: &CommandEvent) -> Result<(), SlackError>;

    /// Deliver the reply for an event.
    async fn reply(&self, event: &CommandEvent, reply: &Reply) -> Result<(), SlackError>;
}

/// Transport backed by a live Socket Mode connection.
///
/// Acks go out on whichever socket is currently attached; replies are
/// posted to the event's `response_url`.
#[derive(Clone)]
pub struct SocketModeTransport {
    slack: SlackClient,
    outbound: Arc<RwLock<Option<mpsc::UnboundedSender<String>>>>,
}

impl SocketModeTransport {
    pub fn new(slack: SlackClient) -> Self {
        Self {
            slack,
            outbound: Arc::new(RwLock::new(None)),
        }
    }

    /// The underlying Web API client.
    pub fn client(&self) -> &SlackClient {
        &self.slack
    }

    /// Attach a fresh outbound channel, replacing any previous socket.
    /// Frames to write arrive on the returned receiver.
    pub async fn attach(&self) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.outbound.write().await = Some(tx);
        rx
    }

    /// Drop the current outbound channel.
    pub async fn detach(&self) {
        *self.outbound.write().await = None;
    }

    /// Write an ack frame for an envelope.
    pub async fn ack_envelope(&self, envelope_id: &str) -> Result<(), SlackError> {
        let frame = serde_json::to_string(&AckFrame { envelope_id })?;
        let guard = self.outbound.read().await;
        let tx = guard.as_ref().ok_or(SlackError::NotConnected)?;
        tx.send(frame).map_err(|_| SlackError::NotConnected)
    }
}

#[async_trait]
impl CommandTransport for SocketModeTransport {
    async fn acknowledge(&self, event: &CommandEvent) -> Result<(), SlackError> {
        self.ack_envelope(&event.envelope_id).await
    }

    async fn reply(&self, event: &CommandEvent, reply: &Reply) -> Result<(), SlackError> {
        self.slack.respond(&event.response_url, reply).await
    }
}

/// Exponential backoff between reconnect attempts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Consecutive failures tolerated before the stream ends.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl ReconnectPolicy {
    pub fn backoff(&self, attempt: u32) -> Duration {
        let multiplier = 1u32 << attempt.min(16);
        self.base_delay.saturating_mul(multiplier).min(self.max_delay)
    }
}

/// Receives slash commands from a Socket Mode websocket.
pub struct SocketModeReceiver {
    transport: SocketModeTransport,
    policy: ReconnectPolicy,
}

impl SocketModeReceiver {
    /// Create a new receiver sharing the transport's ack channel.
    pub fn new(transport: SocketModeTransport, policy: ReconnectPolicy) -> Self {
        Self { transport, policy }
    }

    /// Connect and yield slash commands as an async stream.
    ///
    /// Slash command envelopes are not acked here; the consumer acks
    /// through `CommandTransport`. Other envelopes are acked and dropped.
    /// A server `disconnect` triggers an immediate reconnect. The stream
    /// ends once `max_retries` consecutive connects fail.
    pub fn stream(self) -> impl Stream<Item = CommandEvent> {
        async_stream::stream! {
            let mut failures = 0u32;

            loop {
                if failures > 0 {
                    if failures > self.policy.max_retries {
                        error!(failures, "Socket mode reconnects exhausted");
                        break;
                    }
                    let delay = self.policy.backoff(failures - 1);
                    warn!(failures, ?delay, "Reconnecting to socket mode");
                    sleep(delay).await;
                }

                let url = match self.transport.client().open_connection().await {
                    Ok(url) => url,
                    Err(e) => {
                        error!("apps.connections.open failed: {}", e);
                        failures += 1;
                        continue;
                    }
                };

                let ws = match connect_async(url.as_str()).await {
                    Ok((ws, _)) => ws,
                    Err(e) => {
                        error!("Websocket connect failed: {}", e);
                        failures += 1;
                        continue;
                    }
                };

                let (mut sink, mut frames) = ws.split();
                let mut outbound = self.transport.attach().await;
                let writer = tokio::spawn(async move {
                    while let Some(text) = outbound.recv().await {
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            warn!("Socket write failed: {}", e);
                            break;
                        }
                    }
                });

                let mut handoff = false;
                while let Some(message) = frames.next().await {
                    let text = match message {
                        Ok(Message::Text(text)) => text,
                        Ok(Message::Close(_)) => {
                            info!("Socket closed by server");
                            break;
                        }
                        Ok(_) => continue,
                        Err(e) => {
                            warn!("Socket read failed: {}", e);
                            failures += 1;
                            break;
                        }
                    };

                    let frame: SocketFrame = match serde_json::from_str(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            warn!("Unparseable socket frame: {}", e);
                            continue;
                        }
                    };

                    match frame {
                        SocketFrame::Hello { num_connections } => {
                            failures = 0;
                            info!(?num_connections, "Socket mode connected");
                        }
                        SocketFrame::Disconnect { reason } => {
                            info!(?reason, "Server requested reconnect");
                            handoff = true;
                            break;
                        }
                        SocketFrame::SlashCommands { envelope_id, payload } => {
                            debug!(%envelope_id, command = %payload.command, "Received slash command");
                            yield CommandEvent::from_payload(envelope_id, payload);
                        }
                        other => {
                            if let Some(envelope_id) = other.envelope_id() {
                                if let Err(e) = self.transport.ack_envelope(envelope_id).await {
                                    warn!(%envelope_id, "Failed to ack envelope: {}", e);
                                }
                            }
                        }
                    }
                }

                // After a `disconnect` the old socket stays writable for
                // in-flight acks; its writer ends once the next socket
                // attaches and drops the old sender.
                if !handoff {
                    self.transport.detach().await;
                    writer.abort();
                }
            }
        }
    }
}
