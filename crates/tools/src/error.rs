//! Tool errors.

use thiserror::Error;

/// Errors from the external weather and geocoding APIs.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Request exceeded the configured timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// External service returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Geocoding returned no match for the query.
    #[error("Location '{0}' not found")]
    NotFound(String),
}

impl ToolError {
    /// Whether this is the "no match" outcome rather than a client failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else {
            Self::Http(err)
        }
    }
}

/// Expression evaluation errors.
///
/// The variants are for operator logs. Users only ever see a generic
/// help message, whatever the kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("disallowed construct: {0}")]
    Disallowed(String),

    #[error("expression nested too deeply")]
    TooDeep,

    #[error("expression has too many tokens")]
    TooLong,

    #[error("division by zero")]
    DivideByZero,

    #[error("numeric overflow")]
    Overflow,

    #[error("result is undefined")]
    Undefined,
}

/// Unknown IANA timezone identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown timezone: {0}")]
pub struct UnknownZone(pub String);
