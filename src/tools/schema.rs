//! Flat parameter schemas for tool definitions.

use serde_json::{json, Map, Value};

/// JSON type a parameter must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Array,
    Object,
}

impl ParamType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

/// Closed-set constraint on a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// String value (or every array element) must be one of these.
    Enum(&'static [&'static str]),
    /// Every key of an object value must be one of these.
    AllowedKeys(&'static [&'static str]),
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub required: bool,
    pub constraint: Option<Constraint>,
    pub default: Option<Value>,
    pub description: &'static str,
}

impl ParamSpec {
    fn new(name: &'static str, kind: ParamType, required: bool, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required,
            constraint: None,
            default: None,
            description,
        }
    }

    pub fn required(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self::new(name, kind, true, description)
    }

    pub fn optional(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self::new(name, kind, false, description)
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.constraint = Some(Constraint::Enum(allowed));
        self
    }

    pub fn allowed_keys(mut self, keys: &'static [&'static str]) -> Self {
        self.constraint = Some(Constraint::AllowedKeys(keys));
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    fn json_schema(&self) -> Value {
        let mut prop = Map::new();
        prop.insert("type".into(), json!(self.kind.as_str()));
        match (self.kind, self.constraint) {
            (ParamType::Array, Some(Constraint::Enum(allowed))) => {
                prop.insert("items".into(), json!({"type": "string", "enum": allowed}));
            }
            (_, Some(Constraint::Enum(allowed))) => {
                prop.insert("enum".into(), json!(allowed));
            }
            (_, Some(Constraint::AllowedKeys(keys))) => {
                let props: Map<String, Value> = keys
                    .iter()
                    .map(|k| (k.to_string(), json!({"type": "string"})))
                    .collect();
                prop.insert("properties".into(), Value::Object(props));
                prop.insert("additionalProperties".into(), json!(false));
            }
            (_, None) => {}
        }
        prop.insert("description".into(), json!(self.description));
        Value::Object(prop)
    }
}

/// Ordered list of parameters accepted by a tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSchema {
    params: Vec<ParamSpec>,
}

impl ParameterSchema {
    pub fn new(params: Vec<ParamSpec>) -> Self {
        Self { params }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// JSON-schema object handed to hosts at registration time.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.json_schema()))
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }
}
