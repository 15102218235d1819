//! Slack Socket Mode and Web API types.

use serde::{Deserialize, Serialize};

/// A frame received on the Socket Mode websocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SocketFrame {
    Hello {
        num_connections: Option<u32>,
    },
    Disconnect {
        reason: Option<String>,
    },
    SlashCommands {
        envelope_id: String,
        payload: SlashCommandPayload,
    },
    EventsApi {
        envelope_id: String,
    },
    Interactive {
        envelope_id: String,
    },
    #[serde(other)]
    Unknown,
}

impl SocketFrame {
    /// Envelope id to acknowledge, if the frame carries one.
    pub fn envelope_id(&self) -> Option<&str> {
        match self {
            SocketFrame::SlashCommands { envelope_id, .. }
            | SocketFrame::EventsApi { envelope_id }
            | SocketFrame::Interactive { envelope_id } => Some(envelope_id),
            _ => None,
        }
    }
}

/// Slash command payload as delivered inside a `slash_commands` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SlashCommandPayload {
    pub command: String,
    #[serde(default)]
    pub text: String,
    pub user_id: String,
    pub user_name: Option<String>,
    #[serde(default)]
    pub channel_id: String,
    pub response_url: String,
    pub trigger_id: Option<String>,
    pub team_id: Option<String>,
}

/// Acknowledgment written back on the socket.
#[derive(Debug, Clone, Serialize)]
pub struct AckFrame<'a> {
    pub envelope_id: &'a str,
}

/// Parsed slash command for bot processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEvent {
    /// Socket Mode envelope that delivered the command.
    pub envelope_id: String,
    /// Command name including the slash, e.g. `/calc`.
    pub command: String,
    /// Raw argument text.
    pub text: String,
    /// Invoking user id.
    pub user_id: String,
    /// Invoking user's handle, when Slack provides it.
    pub user_name: Option<String>,
    pub channel_id: String,
    /// Where the reply is posted.
    pub response_url: String,
}

impl CommandEvent {
    /// Build a command event from a socket envelope.
    pub fn from_payload(envelope_id: impl Into<String>, payload: SlashCommandPayload) -> Self {
        Self {
            envelope_id: envelope_id.into(),
            command: payload.command,
            text: payload.text,
            user_id: payload.user_id,
            user_name: payload.user_name,
            channel_id: payload.channel_id,
            response_url: payload.response_url,
        }
    }

    /// Argument text with surrounding whitespace removed.
    pub fn args(&self) -> &str {
        self.text.trim()
    }
}

/// Who can see a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Only the invoking user.
    Ephemeral,
    /// Everyone in the channel.
    InChannel,
}

/// Block Kit text object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl TextObject {
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            kind: "mrkdwn".into(),
            text: text.into(),
        }
    }
}

/// Block Kit layout block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section { text: TextObject },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyContent {
    Text(String),
    Blocks(Vec<Block>),
}

/// Reply to a single command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub visibility: Visibility,
    pub content: ReplyContent,
}

impl Reply {
    /// Plain text visible only to the invoking user.
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::Ephemeral,
            content: ReplyContent::Text(text.into()),
        }
    }

    /// Plain text visible to the channel.
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::InChannel,
            content: ReplyContent::Text(text.into()),
        }
    }

    /// A single mrkdwn section block.
    pub fn section(visibility: Visibility, mrkdwn: impl Into<String>) -> Self {
        Self {
            visibility,
            content: ReplyContent::Blocks(vec![Block::Section {
                text: TextObject::mrkdwn(mrkdwn),
            }]),
        }
    }

    /// Flattened text of the reply (block sections joined by newlines).
    pub fn text(&self) -> String {
        match &self.content {
            ReplyContent::Text(text) => text.clone(),
            ReplyContent::Blocks(blocks) => blocks
                .iter()
                .map(|Block::Section { text }| text.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Wire payload for a `response_url` POST.
    pub fn to_payload(&self) -> ResponsePayload {
        ResponsePayload {
            response_type: self.visibility,
            text: self.text(),
            blocks: match &self.content {
                ReplyContent::Text(_) => None,
                ReplyContent::Blocks(blocks) => Some(blocks.clone()),
            },
        }
    }
}

/// Body posted to a slash command `response_url`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsePayload {
    pub response_type: Visibility,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
}

/// `apps.connections.open` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionsOpenResponse {
    pub ok: bool,
    pub url: Option<String>,
    pub error: Option<String>,
}

/// `auth.test` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTestResponse {
    pub ok: bool,
    pub user_id: Option<String>,
    pub team: Option<String>,
    pub error: Option<String>,
}
