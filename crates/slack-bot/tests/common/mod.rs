//! Common test utilities for integration tests.

use slack_bot::commands::default_handlers;
use slack_bot::config::Config;
use slack_bot::Dispatcher;
use slack_client::{CommandEvent, SlackClient, SocketModeTransport};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A dispatcher wired to mock Slack and OpenWeather servers, plus the
/// receiving end of its socket so acks can be inspected.
pub struct Harness {
    pub slack: MockServer,
    pub weather: MockServer,
    pub dispatcher: Dispatcher,
    pub acks: mpsc::UnboundedReceiver<String>,
}

impl Harness {
    pub async fn start() -> Self {
        Self::start_with(&[]).await
    }

    /// Start with extra configuration variables.
    pub async fn start_with(extra: &[(&str, &str)]) -> Self {
        let slack = MockServer::start().await;
        let weather = MockServer::start().await;

        let mut vars: HashMap<String, String> = [
            ("SLACK_BOT_TOKEN", "xoxb-test"),
            ("SLACK_APP_TOKEN", "xapp-test"),
            ("OPENWEATHER_API_KEY", "owm-test"),
            ("WEATHER__TIMEOUT", "500ms"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        vars.insert("SLACK__API_URL".into(), slack.uri());
        vars.insert("WEATHER__BASE_URL".into(), weather.uri());
        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }

        let config = Config::from_vars(vars).unwrap();
        let client = SlackClient::new(
            &config.slack.api_url,
            "xapp-test",
            "xoxb-test",
            Duration::from_secs(2),
        )
        .unwrap();
        let transport = SocketModeTransport::new(client);
        let acks = transport.attach().await;

        let dispatcher = Dispatcher::new(
            default_handlers(&config).unwrap(),
            Arc::new(transport),
            config.bot.handler_timeout,
        );

        Self {
            slack,
            weather,
            dispatcher,
            acks,
        }
    }

    /// A slash command whose `response_url` points at the mock Slack server.
    pub fn event(&self, command: &str, text: &str) -> CommandEvent {
        CommandEvent {
            envelope_id: format!("env{}", command.replace('/', "-")),
            command: command.into(),
            text: text.into(),
            user_id: "U123".into(),
            user_name: Some("alice".into()),
            channel_id: "C123".into(),
            response_url: format!("{}/hook", self.slack.uri()),
        }
    }

    /// Bodies posted to the response URL, in order.
    pub async fn replies(&self) -> Vec<serde_json::Value> {
        self.slack
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == "/hook")
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

/// Accept every reply on the response URL.
pub async fn mount_hook(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(server)
        .await;
}

/// OpenWeather geocoding answering with the given matches.
pub async fn mount_geocode(server: &MockServer, matches: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(matches))
        .mount(server)
        .await;
}
