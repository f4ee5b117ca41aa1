//! Renders successes and every kind of failure into a tool's output shape.

use crate::error::{ToolError, SERVICE_NAME};
use crate::tools::traits::Summary;
use crate::types::{ContentBlock, OutputShape, ToolOutput};
use serde_json::{Map, Value};

/// Message for a non-2xx response. The raw body is kept verbatim.
pub fn http_failure_message(status: u16, body_text: &str) -> String {
    format!("{SERVICE_NAME} API error ({status}): {body_text}")
}

pub fn failure_message(err: &ToolError) -> String {
    err.to_string()
}

pub fn render_success(shape: OutputShape, summary: Summary) -> ToolOutput {
    match shape {
        OutputShape::Text => ToolOutput::Text {
            content: vec![ContentBlock::text(summary.text)],
            is_error: false,
        },
        OutputShape::Structured => {
            let mut map = Map::new();
            map.insert("success".into(), Value::Bool(true));
            map.extend(summary.fields);
            map.insert("message".into(), Value::String(summary.message));
            ToolOutput::Structured(map)
        }
    }
}

pub fn render_failure(shape: OutputShape, message: &str) -> ToolOutput {
    match shape {
        OutputShape::Text => ToolOutput::Text {
            content: vec![ContentBlock::text(format!("Error: {message}"))],
            is_error: true,
        },
        OutputShape::Structured => {
            let mut map = Map::new();
            map.insert("success".into(), Value::Bool(false));
            map.insert("error".into(), Value::String(message.to_string()));
            ToolOutput::Structured(map)
        }
    }
}
