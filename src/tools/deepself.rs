//! The six Deepself tools: persona models, training data, training rooms and chat.

use crate::error::Result;
use crate::tools::registry::ToolRegistry;
use crate::tools::schema::{ParamSpec, ParamType, ParameterSchema};
use crate::tools::traits::{Operation, Summary, ToolDefinition};
use crate::tools::validate::ValidatedArgs;
use crate::types::{ChatMessage, ChatRole, OutputShape, RemoteCallSpec};
use chrono::{DateTime, SecondsFormat};
use serde_json::{json, Map, Value};

pub const CREATE_MODEL: &str = "deepself_create_model";
pub const LIST_MODELS: &str = "deepself_list";
pub const TRAIN_DOCUMENT: &str = "deepself_train_document";
pub const START_ROOM: &str = "deepself_start_room";
pub const FINALIZE_ROOM: &str = "deepself_finalize_room";
pub const CHAT: &str = "deepself_chat";

/// The only demographic keys the service accepts in `basic_facts`.
pub const BASIC_FACT_KEYS: &[&str] = &[
    "age",
    "gender",
    "location",
    "birth_location",
    "occupation",
    "marital_status",
    "ethnicity",
    "religion",
    "sexual_orientation",
    "education_level",
    "field_of_study",
];

pub const DEFAULT_TOOLS: &[&str] = &["web_search", "memory"];
pub const PERSPECTIVES: &[&str] = &["first-person", "third-person"];
pub const DEFAULT_PERSPECTIVE: &str = "first-person";

const PLATFORM_MODELS: &[&str] = &[
    "socrates - Socratic questioning for values exploration",
    "tony-robbins - Motivational coaching and peak performance",
    "oprah - Empathetic guidance and life wisdom",
];

/// Build every Deepself tool definition, in registration order.
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        create_model(),
        list_models(),
        train_document(),
        start_room(),
        finalize_room(),
        chat(),
    ]
}

/// Register every Deepself tool.
pub fn register_all(registry: &mut ToolRegistry) -> Result<()> {
    for definition in definitions() {
        registry.register(definition)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// deepself_create_model
// ---------------------------------------------------------------------------

struct CreateModel;

fn create_model() -> ToolDefinition {
    ToolDefinition::new(
        CREATE_MODEL,
        "Create a new deepself model. Use this to create a new persona (higher self, bad cop, \
         specialist, etc.). The 'username' must be unique and will be used to identify this \
         deepself in all future operations.",
        ParameterSchema::new(vec![
            ParamSpec::required(
                "name",
                ParamType::String,
                "Display name for the model (e.g., 'My Higher Self', 'Bad Cop')",
            ),
            ParamSpec::required(
                "username",
                ParamType::String,
                "Unique username identifier (e.g., 'clawdbot-higher-001', 'clawdbot-badcop-001')",
            ),
            ParamSpec::optional(
                "basic_facts",
                ParamType::Object,
                "Optional: Key demographic facts. ONLY these keys are allowed: age, gender, \
                 location, birth_location, occupation, marital_status, ethnicity, religion, \
                 sexual_orientation, education_level, field_of_study. Values must be strings.",
            )
            .allowed_keys(BASIC_FACT_KEYS),
            ParamSpec::optional(
                "default_tools",
                ParamType::Array,
                "Optional: Built-in tools to enable for this model (e.g., [\"web_search\", \"memory\"])",
            )
            .one_of(DEFAULT_TOOLS),
        ]),
        OutputShape::Text,
        CreateModel,
    )
}

impl Operation for CreateModel {
    fn build(&self, args: &ValidatedArgs) -> Result<RemoteCallSpec> {
        let mut body = Map::new();
        body.insert("name".into(), json!(args.required_str("name")?));
        body.insert("username".into(), json!(args.required_str("username")?));

        let facts: Map<String, Value> = args
            .get("basic_facts")
            .and_then(Value::as_object)
            .map(|facts| {
                facts
                    .iter()
                    .map(|(k, v)| (k.clone(), json!({"value": stringify(v), "status": "stated"})))
                    .collect()
            })
            .unwrap_or_default();
        if !facts.is_empty() {
            body.insert("basic_facts".into(), Value::Object(facts));
        }
        if let Some(tools) = args.get("default_tools") {
            body.insert("default_tools".into(), tools.clone());
        }

        Ok(RemoteCallSpec::post("/models").with_body(Value::Object(body)))
    }

    fn summarize(&self, args: &ValidatedArgs, body: &Value) -> Summary {
        let username = args.str("username").unwrap_or_default();
        let id = str_field(body, "id");
        let created = body.get("created").and_then(Value::as_i64);
        let created_iso = created.map(iso_timestamp).unwrap_or_else(|| "unknown".into());

        let text = format!(
            "Created deepself model: {username}\n\
             Model ID: {id}\n\
             Created: {created_iso}\n\n\
             You can now train it with {TRAIN_DOCUMENT} or {START_ROOM}."
        );
        Summary::new(text, format!("Created deepself model: {username}"))
            .field_opt("model_id", body.get("id"))
            .field("username", json!(username))
            .field_opt("created", created.map(|c| json!(iso_timestamp(c))).as_ref())
    }
}

// ---------------------------------------------------------------------------
// deepself_list
// ---------------------------------------------------------------------------

struct ListModels;

fn list_models() -> ToolDefinition {
    ToolDefinition::new(
        LIST_MODELS,
        "List available deepself models. Returns all models owned by you.",
        ParameterSchema::empty(),
        OutputShape::Text,
        ListModels,
    )
}

/// One entry of the remote model collection.
#[derive(Debug, Clone, PartialEq)]
struct ModelEntry {
    id: String,
    owner: Option<String>,
    created: Option<i64>,
    tools: Vec<String>,
}

impl ModelEntry {
    fn from_value(value: &Value) -> Self {
        Self {
            id: str_field(value, "id"),
            owner: value.get("owned_by").and_then(Value::as_str).map(String::from),
            created: value.get("created").and_then(Value::as_i64),
            tools: value
                .get("default_tools")
                .and_then(Value::as_array)
                .map(|tools| {
                    tools
                        .iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    fn line(&self) -> String {
        let tools = if self.tools.is_empty() {
            String::new()
        } else {
            format!(" (tools: {})", self.tools.join(", "))
        };
        let created = self
            .created
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".into());
        format!("- {}{} [created: {}]", self.id, tools, created)
    }

    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "username": self.owner,
            "created": self.created.map(iso_timestamp),
            "default_tools": self.tools,
        })
    }
}

impl Operation for ListModels {
    fn build(&self, _args: &ValidatedArgs) -> Result<RemoteCallSpec> {
        Ok(RemoteCallSpec::get("/models"))
    }

    fn summarize(&self, _args: &ValidatedArgs, body: &Value) -> Summary {
        let models: Vec<ModelEntry> = body
            .get("data")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(ModelEntry::from_value).collect())
            .unwrap_or_default();

        let count = models.len();
        let mut text = format!(
            "Found {} deepself model{}.\n\n",
            count,
            if count == 1 { "" } else { "s" }
        );
        if models.is_empty() {
            text.push_str(&format!(
                "No models found. Use {CREATE_MODEL} to create your first deepself."
            ));
        } else {
            text.push_str("Available Models:\n");
            for model in &models {
                text.push_str(&model.line());
                text.push('\n');
            }
        }

        let message = format!(
            "Found {} of your models. Platform models available: {}",
            count,
            PLATFORM_MODELS.len()
        );
        Summary::new(text, message)
            .field(
                "your_models",
                Value::Array(models.iter().map(ModelEntry::to_json).collect()),
            )
            .field("platform_models", json!(PLATFORM_MODELS))
    }
}

// ---------------------------------------------------------------------------
// deepself_train_document
// ---------------------------------------------------------------------------

struct TrainDocument;

fn train_document() -> ToolDefinition {
    ToolDefinition::new(
        TRAIN_DOCUMENT,
        "Add training data to a deepself model. Use this to train your deepself with documents, \
         quotes, or content you identify with. The content demonstrates who you are through your \
         words or those you identify with. The 'model' parameter is the username of the deepself \
         to train (e.g., 'clawdbot-higher-001').",
        ParameterSchema::new(vec![
            ParamSpec::required(
                "model",
                ParamType::String,
                "Username of the deepself model to train (e.g., 'clawdbot-higher-001')",
            ),
            ParamSpec::required(
                "content",
                ParamType::String,
                "The training content (your words or content you identify with)",
            ),
            ParamSpec::required(
                "label",
                ParamType::String,
                "Title for this training data (e.g., 'My Core Values', 'Career Journey')",
            ),
            ParamSpec::optional(
                "perspective",
                ParamType::String,
                "Perspective of the content (default: first-person)",
            )
            .one_of(PERSPECTIVES)
            .default_value(json!(DEFAULT_PERSPECTIVE)),
            ParamSpec::optional(
                "context",
                ParamType::String,
                "Optional context about this content",
            ),
        ]),
        OutputShape::Structured,
        TrainDocument,
    )
}

impl Operation for TrainDocument {
    fn build(&self, args: &ValidatedArgs) -> Result<RemoteCallSpec> {
        let model = args.required_str("model")?;
        let mut body = json!({
            "label": args.required_str("label")?,
            "content": args.required_str("content")?,
            "perspective": args.opt_str("perspective").unwrap_or(DEFAULT_PERSPECTIVE),
        });
        if let Some(context) = args.opt_str("context") {
            body["context"] = json!(context);
        }
        Ok(RemoteCallSpec::post(format!("/models/{model}/training/documents")).with_body(body))
    }

    fn summarize(&self, args: &ValidatedArgs, body: &Value) -> Summary {
        let model = args.str("model").unwrap_or_default();
        let stats = Stats::from_body(body);
        let text = format!(
            "Training data added to {model}\n\
             Document ID: {}\n\
             Status: {}\n\
             Processed: {}",
            str_field(body, "document_id"),
            str_field(body, "status"),
            stats.line(),
        );
        let message = format!(
            "Training data added to {model}. Processed {} insights.",
            stats.epsilons
        );
        Summary::new(text, message)
            .field_from(body, "document_id")
            .field_from(body, "status")
            .field_from(body, "stats")
    }
}

// ---------------------------------------------------------------------------
// deepself_start_room
// ---------------------------------------------------------------------------

struct StartRoom;

fn start_room() -> ToolDefinition {
    ToolDefinition::new(
        START_ROOM,
        "Create a training room for conversational training. Use this to have a conversation \
         with a platform deepself (like Socrates or Tony Robbins) where YOUR responses train YOUR \
         deepself. The 'user_model' is the username of YOUR deepself being trained, and \
         'interviewer_model' is the username of the platform deepself to converse with.",
        ParameterSchema::new(vec![
            ParamSpec::required(
                "user_model",
                ParamType::String,
                "Username of YOUR deepself being trained (e.g., 'clawdbot-higher-001')",
            ),
            ParamSpec::required(
                "interviewer_model",
                ParamType::String,
                "Username of platform deepself to converse with (e.g., 'socrates', 'tony-robbins')",
            ),
            ParamSpec::required(
                "label",
                ParamType::String,
                "Session name (e.g., 'Values Exploration Session', 'Career Reflection')",
            ),
        ]),
        OutputShape::Structured,
        StartRoom,
    )
}

impl Operation for StartRoom {
    fn build(&self, args: &ValidatedArgs) -> Result<RemoteCallSpec> {
        let user_model = args.required_str("user_model")?;
        // interviewer_model is required from the caller but only echoed back in
        // the result; the service is not told about it.
        let body = json!({
            "label": args.required_str("label")?,
            "user_model": user_model,
        });
        Ok(RemoteCallSpec::post(format!("/models/{user_model}/training/rooms")).with_body(body))
    }

    fn summarize(&self, args: &ValidatedArgs, body: &Value) -> Summary {
        let user_model = args.str("user_model").unwrap_or_default();
        let interviewer = args.str("interviewer_model").unwrap_or_default();
        let room_id = str_field(body, "room_id");

        let text = format!(
            "Training room created!\n\
             Room ID: {room_id}\n\
             Training: {user_model}\n\
             Interviewer: {interviewer}\n\n\
             Use {CHAT} with room_id=\"{room_id}\" to continue the conversation."
        );
        let message = format!(
            "Training room created. Room ID: {room_id}. Use {CHAT} with this room_id to continue the conversation."
        );
        Summary::new(text, message)
            .field_from(body, "room_id")
            .field_from(body, "status")
            .field("user_model", json!(user_model))
            .field("interviewer_model", json!(interviewer))
    }
}

// ---------------------------------------------------------------------------
// deepself_finalize_room
// ---------------------------------------------------------------------------

struct FinalizeRoom;

fn finalize_room() -> ToolDefinition {
    ToolDefinition::new(
        FINALIZE_ROOM,
        "Finalize a training room to commit extracted insights to your deepself's knowledge \
         graph. Call this when the conversation is complete and you want to save the training.",
        ParameterSchema::new(vec![ParamSpec::required(
            "room_id",
            ParamType::String,
            "The room_id returned from deepself_start_room",
        )]),
        OutputShape::Structured,
        FinalizeRoom,
    )
}

impl Operation for FinalizeRoom {
    fn build(&self, args: &ValidatedArgs) -> Result<RemoteCallSpec> {
        let room_id = args.required_str("room_id")?;
        Ok(RemoteCallSpec::post(format!("/training/rooms/{room_id}/finalize")))
    }

    fn summarize(&self, _args: &ValidatedArgs, body: &Value) -> Summary {
        let stats = Stats::from_body(body);
        let text = format!(
            "Training room finalized!\n\
             Status: {}\n\
             Processed: {}\n\n\
             Insights have been committed to your deepself's knowledge graph.",
            str_field(body, "status"),
            stats.line(),
        );
        let message = format!(
            "Training room finalized. Processed {} insights.",
            stats.epsilons
        );
        Summary::new(text, message)
            .field_from(body, "status")
            .field_from(body, "stats")
    }
}

// ---------------------------------------------------------------------------
// deepself_chat
// ---------------------------------------------------------------------------

struct Chat;

fn chat() -> ToolDefinition {
    ToolDefinition::new(
        CHAT,
        "Chat with any deepself for consultation or delegation. For consultation: ask your \
         higher self or a platform deepself for advice. For delegation: have a specialist \
         deepself (like 'legal-beagle') respond to a message. The 'model' parameter is the \
         username of the deepself. If 'room_id' is provided, this continues a training \
         conversation.",
        ParameterSchema::new(vec![
            ParamSpec::required(
                "model",
                ParamType::String,
                "Username of the deepself to chat with (e.g., 'clawdbot-higher-001', 'socrates')",
            ),
            ParamSpec::required("message", ParamType::String, "Your message or question"),
            ParamSpec::optional(
                "room_id",
                ParamType::String,
                "Optional: room_id if continuing a training conversation",
            ),
            ParamSpec::optional(
                "context",
                ParamType::String,
                "Optional context to include in the conversation",
            ),
        ]),
        OutputShape::Text,
        Chat,
    )
}

impl Operation for Chat {
    fn build(&self, args: &ValidatedArgs) -> Result<RemoteCallSpec> {
        let mut messages = Vec::with_capacity(2);
        if let Some(context) = args.opt_str("context") {
            messages.push(ChatMessage {
                role: ChatRole::System,
                content: context.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: ChatRole::User,
            content: args.required_str("message")?.to_string(),
        });

        let mut body = json!({
            "model": args.required_str("model")?,
            "messages": messages,
            "stream": false,
        });
        if let Some(room_id) = args.opt_str("room_id") {
            body["room_id"] = json!(room_id);
        }
        Ok(RemoteCallSpec::post("/chat/completions").with_body(body))
    }

    fn summarize(&self, args: &ValidatedArgs, body: &Value) -> Summary {
        let reply = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Summary::new(reply.clone(), reply.clone())
            .field("response", json!(reply))
            .field("model", json!(args.str("model")))
            .field("room_id", json!(args.opt_str("room_id")))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Processing counters reported by training endpoints.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Stats {
    epsilons: u64,
    betas: u64,
    deltas: u64,
    alphas: u64,
}

impl Stats {
    fn from_body(body: &Value) -> Self {
        let count = |key: &str| {
            body.get("stats")
                .and_then(|s| s.get(key))
                .and_then(Value::as_u64)
                .unwrap_or(0)
        };
        Self {
            epsilons: count("epsilons_processed"),
            betas: count("betas_processed"),
            deltas: count("deltas_processed"),
            alphas: count("alphas_processed"),
        }
    }

    fn line(&self) -> String {
        format!(
            "{} epsilons, {} betas, {} deltas, {} alphas",
            self.epsilons, self.betas, self.deltas, self.alphas
        )
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn str_field(body: &Value, key: &str) -> String {
    match body.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "unknown".into(),
        Some(other) => other.to_string(),
    }
}

/// Epoch seconds as an RFC 3339 UTC timestamp with milliseconds.
fn iso_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| secs.to_string())
}
