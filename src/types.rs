//! Shared types used across the deepself tools.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Remote calls
// ---------------------------------------------------------------------------

/// HTTP methods the Deepself API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Intention to call the remote service, built fresh per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCallSpec {
    pub method: HttpMethod,
    /// Path relative to the configured base URL, with a leading `/`.
    pub path: String,
    pub body: Option<Value>,
    /// Header overrides; these win over the default headers.
    pub headers: BTreeMap<String, String>,
}

impl RemoteCallSpec {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: None,
            headers: BTreeMap::new(),
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(path)
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Classified result of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    /// 2xx status with the JSON-decoded body (`null` when the body was empty).
    Success { status: u16, body: Value },
    /// Any other status, with the body text exactly as received.
    Failure { status: u16, body_text: String },
}

// ---------------------------------------------------------------------------
// Tool output
// ---------------------------------------------------------------------------

/// Which result convention a tool reports in. Fixed per tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    /// A single human-readable text block.
    Text,
    /// A flat `{success, error?, ...}` envelope.
    Structured,
}

impl fmt::Display for OutputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Structured => write!(f, "structured"),
        }
    }
}

/// One content block of a text result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".into(),
            text: text.into(),
        }
    }
}

/// Value handed back to the host for every tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Text {
        content: Vec<ContentBlock>,
        /// Set by the normalizer; never inferred from the text.
        #[serde(rename = "isError", default, skip_serializing_if = "is_false")]
        is_error: bool,
    },
    Structured(Map<String, Value>),
}

impl ToolOutput {
    /// Whether this output reports a failure.
    pub fn is_error(&self) -> bool {
        match self {
            Self::Text { is_error, .. } => *is_error,
            Self::Structured(map) => map.get("success") != Some(&Value::Bool(true)),
        }
    }

    /// The human-readable part of the output.
    pub fn text(&self) -> &str {
        match self {
            Self::Text { content, .. } => content.first().map(|b| b.text.as_str()).unwrap_or(""),
            Self::Structured(map) => map
                .get("error")
                .or_else(|| map.get("message"))
                .and_then(Value::as_str)
                .unwrap_or(""),
        }
    }

    pub fn shape(&self) -> OutputShape {
        match self {
            Self::Text { .. } => OutputShape::Text,
            Self::Structured(_) => OutputShape::Structured,
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// A message in a chat completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}
