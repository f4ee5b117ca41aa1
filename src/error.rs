//! Error taxonomy for tool registration, validation and remote calls.
//!
//! HTTP-level failures are not errors here: the client reports them as
//! [`CallOutcome::Failure`](crate::types::CallOutcome) so that the raw body
//! reaches the caller untouched.

use thiserror::Error;

/// Name the remote service is referred to by in user-facing messages.
pub const SERVICE_NAME: &str = "Deepself";

pub type Result<T> = std::result::Result<T, ToolError>;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid type for parameter '{name}': expected {expected}")]
    InvalidType { name: String, expected: &'static str },

    #[error("Invalid value for parameter '{name}'. Allowed values: {}", .allowed.join(", "))]
    InvalidEnumValue {
        name: String,
        allowed: Vec<String>,
    },

    #[error("Invalid basic_facts key: {key}. Allowed keys: {}", .allowed.join(", "))]
    InvalidKey { key: String, allowed: Vec<String> },

    #[error(
        "Deepself API key not configured. Set `api_key` in deepself.toml, the \
         DEEPSELF_API_KEY environment variable, or plugins.entries.deepself.config.apiKey \
         in your host config."
    )]
    MissingCredentials,

    #[error("Deepself API key contains characters that are not allowed in an HTTP header")]
    InvalidCredentials,

    #[error("Invalid header override: {0}")]
    InvalidHeader(String),

    #[error("{}", transport_message(.cancelled, .source))]
    Transport {
        cancelled: bool,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Deepself API returned an unreadable response ({status}): {source}")]
    InvalidResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl ToolError {
    pub fn cancelled() -> Self {
        Self::Transport {
            cancelled: true,
            source: None,
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            cancelled: false,
            source: Some(err),
        }
    }
}

fn transport_message(cancelled: &bool, source: &Option<reqwest::Error>) -> String {
    match (*cancelled, source) {
        (true, _) => format!("{SERVICE_NAME} request cancelled"),
        (false, Some(err)) => format!("{SERVICE_NAME} request failed: {}", error_chain(err)),
        (false, None) => format!("{SERVICE_NAME} request failed"),
    }
}

/// reqwest hides the interesting part (DNS, refused, ...) in its source chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        cause = inner.source();
    }
    msg
}
