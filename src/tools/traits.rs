//! Tool definition and the operation trait behind each tool.

use crate::error::Result;
use crate::tools::schema::ParameterSchema;
use crate::tools::validate::ValidatedArgs;
use crate::types::{OutputShape, RemoteCallSpec};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Both renderings of a successful call; the normalizer picks one by shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Full multi-line text for text-shaped tools.
    pub text: String,
    /// One-line `message` field for structured envelopes.
    pub message: String,
    /// Operation-specific fields for structured envelopes.
    pub fields: Map<String, Value>,
}

impl Summary {
    pub fn new(text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            message: message.into(),
            fields: Map::new(),
        }
    }

    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Like [`field`](Self::field), but absent or `null` values are left out.
    pub fn field_opt(mut self, name: &str, value: Option<&Value>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_null()) {
            self.fields.insert(name.to_string(), value.clone());
        }
        self
    }

    /// Copy `key` from a response body when the service sent it.
    pub fn field_from(self, body: &Value, key: &str) -> Self {
        self.field_opt(key, body.get(key))
    }
}

/// What a tool does: turn validated arguments into a remote call, and a
/// decoded response into a summary.
pub trait Operation: Send + Sync {
    /// Build the request. Must not perform I/O.
    fn build(&self, args: &ValidatedArgs) -> Result<RemoteCallSpec>;

    /// Describe a successful response body.
    fn summarize(&self, args: &ValidatedArgs, body: &Value) -> Summary;
}

/// A registered tool. Immutable once created.
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
    pub output_shape: OutputShape,
    pub operation: Arc<dyn Operation>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ParameterSchema,
        output_shape: OutputShape,
        operation: impl Operation + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            output_shape,
            operation: Arc::new(operation),
        }
    }

    /// The payload a host needs to advertise this tool.
    pub fn descriptor(&self) -> HostTool {
        HostTool {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.to_json_schema(),
            output_shape: self.output_shape,
        }
    }
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("output_shape", &self.output_shape)
            .finish_non_exhaustive()
    }
}

/// Definition of a tool as advertised to the host runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostTool {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    pub output_shape: OutputShape,
}
