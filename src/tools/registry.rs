//! Name-unique, insertion-ordered tool registry.

use crate::error::{Result, ToolError};
use crate::tools::traits::ToolDefinition;
use crate::tools::validate::{validate, ValidatedArgs};
use crate::types::RemoteCallSpec;
use indexmap::IndexMap;
use serde_json::Value;

/// A resolved invocation: the tool, its checked arguments and the request to send.
#[derive(Debug)]
pub struct Dispatch<'a> {
    pub definition: &'a ToolDefinition,
    pub args: ValidatedArgs,
    pub spec: RemoteCallSpec,
}

#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, ToolDefinition>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A duplicate name is rejected and the existing entry kept.
    pub fn register(&mut self, definition: ToolDefinition) -> Result<()> {
        if self.tools.contains_key(&definition.name) {
            return Err(ToolError::DuplicateTool(definition.name));
        }
        self.tools.insert(definition.name.clone(), definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// All definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up `name`, validate `args` and build the remote call.
    pub fn dispatch(&self, name: &str, args: &Value) -> Result<Dispatch<'_>> {
        let definition = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let args = validate(&definition.parameters, args)?;
        let spec = definition.operation.build(&args)?;
        Ok(Dispatch {
            definition,
            args,
            spec,
        })
    }
}
