//! Configuration schema for deepself.toml.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.hw1.deepself.me/v1";

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepselfConfig {
    /// Bearer token for the Deepself API. Empty means "not configured".
    pub api_key: String,

    /// Deepself API base URL; request paths are appended to it verbatim.
    pub base_url: String,

    /// Log level (debug, info, warn, error).
    pub log_level: String,
}

impl Default for DeepselfConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.into(),
            log_level: "info".into(),
        }
    }
}

/// The credential view handed to the HTTP client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
}

impl Credentials {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &if self.is_configured() { "<set>" } else { "<unset>" })
            .finish()
    }
}

impl DeepselfConfig {
    /// Resolve the plugin section of a host configuration tree
    /// (`plugins.entries.deepself.config`). Missing nodes fall back to defaults.
    pub fn from_host_tree(tree: &Value) -> Self {
        let section = tree
            .pointer("/plugins/entries/deepself/config")
            .cloned()
            .unwrap_or(Value::Null);

        let mut config = Self::default();
        if let Some(key) = section.get("apiKey").and_then(Value::as_str) {
            config.api_key = key.to_string();
        }
        if let Some(url) = section
            .get("baseUrl")
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
        {
            config.base_url = url.to_string();
        }
        config
    }

    /// Apply `DEEPSELF_API_KEY` / `DEEPSELF_BASE_URL` when set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("DEEPSELF_API_KEY").ok(),
            std::env::var("DEEPSELF_BASE_URL").ok(),
        )
    }

    fn with_overrides(mut self, api_key: Option<String>, base_url: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.api_key = key;
        }
        if let Some(url) = base_url.filter(|u| !u.is_empty()) {
            self.base_url = url;
        }
        self
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            api_key: self.api_key.clone(),
        }
    }
}
