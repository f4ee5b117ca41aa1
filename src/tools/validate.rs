//! Up-front argument validation against a [`ParameterSchema`].
//!
//! Runs synchronously before any request is built; nothing reaches the
//! network unless this succeeds.

use crate::error::{Result, ToolError};
use crate::tools::schema::{Constraint, ParamSpec, ParameterSchema};
use serde_json::{Map, Value};

/// Arguments that passed validation, with defaults applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArgs {
    values: Map<String, Value>,
}

impl ValidatedArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    /// A string parameter; `None` when absent.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Like [`str`](Self::str) but treats the empty string as absent.
    pub fn opt_str(&self, name: &str) -> Option<&str> {
        self.str(name).filter(|s| !s.is_empty())
    }

    /// A string parameter the schema marks as required.
    pub fn required_str(&self, name: &str) -> Result<&str> {
        self.str(name)
            .ok_or_else(|| ToolError::MissingParameter(name.to_string()))
    }
}

/// Validate raw host arguments. `null` is accepted as "no arguments".
pub fn validate(schema: &ParameterSchema, raw: &Value) -> Result<ValidatedArgs> {
    let mut values = match raw {
        Value::Null => Map::new(),
        Value::Object(map) => map.clone(),
        _ => {
            return Err(ToolError::InvalidType {
                name: "arguments".into(),
                expected: "object",
            })
        }
    };

    for spec in schema.params() {
        match values.get(spec.name).filter(|v| !v.is_null()) {
            None if spec.required => return Err(ToolError::MissingParameter(spec.name.into())),
            None => {
                if let Some(default) = &spec.default {
                    values.insert(spec.name.to_string(), default.clone());
                }
            }
            Some(value) => check_value(spec, value)?,
        }
    }

    Ok(ValidatedArgs { values })
}

fn check_value(spec: &ParamSpec, value: &Value) -> Result<()> {
    if !spec.kind.matches(value) {
        return Err(ToolError::InvalidType {
            name: spec.name.into(),
            expected: spec.kind.as_str(),
        });
    }

    match spec.constraint {
        Some(Constraint::Enum(allowed)) => {
            let ok = match value {
                Value::Array(items) => items.iter().all(|item| is_member(item, allowed)),
                other => is_member(other, allowed),
            };
            if !ok {
                return Err(ToolError::InvalidEnumValue {
                    name: spec.name.into(),
                    allowed: to_owned_list(allowed),
                });
            }
        }
        Some(Constraint::AllowedKeys(keys)) => {
            if let Some(map) = value.as_object() {
                // First offender in input order; unknown keys are never dropped silently.
                if let Some(bad) = map.keys().find(|k| !keys.contains(&k.as_str())) {
                    return Err(ToolError::InvalidKey {
                        key: bad.clone(),
                        allowed: to_owned_list(keys),
                    });
                }
            }
        }
        None => {}
    }
    Ok(())
}

fn is_member(value: &Value, allowed: &[&str]) -> bool {
    value.as_str().is_some_and(|s| allowed.contains(&s))
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
