//! Slack Web API client.

use crate::error::SlackError;
use crate::types::*;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default Slack Web API base URL.
pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Slack Web API client.
///
/// Holds the Socket Mode app token and the bot token as `SecretString`
/// so neither shows up in debug output.
#[derive(Clone)]
pub struct SlackClient {
    client: Client,
    api_url: String,
    app_token: SecretString,
    bot_token: SecretString,
}

impl SlackClient {
    /// Create a new Slack client.
    pub fn new(
        api_url: impl Into<String>,
        app_token: impl Into<String>,
        bot_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SlackError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            app_token: SecretString::new(app_token.into()),
            bot_token: SecretString::new(bot_token.into()),
        })
    }

    /// Check that the bot token is accepted.
    pub async fn health_check(&self) -> bool {
        match self.auth_test().await {
            Ok(auth) => auth.ok,
            Err(e) => {
                warn!("auth.test failed: {}", e);
                false
            }
        }
    }

    /// Call `auth.test` with the bot token.
    #[instrument(skip(self))]
    pub async fn auth_test(&self) -> Result<AuthTestResponse, SlackError> {
        let response = self
            .client
            .post(format!("{}/auth.test", self.api_url))
            .bearer_auth(self.bot_token.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            return Err(SlackError::Api(msg));
        }

        Ok(response.json().await?)
    }

    /// Request a Socket Mode websocket URL with the app token.
    #[instrument(skip(self))]
    pub async fn open_connection(&self) -> Result<String, SlackError> {
        let response = self
            .client
            .post(format!("{}/apps.connections.open", self.api_url))
            .bearer_auth(self.app_token.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            return Err(SlackError::Api(msg));
        }

        let open: ConnectionsOpenResponse = response.json().await?;
        match (open.ok, open.url) {
            (true, Some(url)) => {
                debug!("Opened socket mode connection");
                Ok(url)
            }
            _ => Err(SlackError::Api(
                open.error.unwrap_or_else(|| "missing socket url".into()),
            )),
        }
    }

    /// Post a reply to a slash command's `response_url`.
    #[instrument(skip_all)]
    pub async fn respond(&self, response_url: &str, reply: &Reply) -> Result<(), SlackError> {
        let response = self
            .client
            .post(response_url)
            .json(&reply.to_payload())
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            warn!("Respond failed: {}", msg);
            return Err(SlackError::SendFailed(msg));
        }

        debug!("Posted reply");
        Ok(())
    }
}
