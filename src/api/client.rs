//! Deepself API client: one shared HTTP client, bearer auth, and outcome classification.

use crate::config::{Credentials, DeepselfConfig};
use crate::error::{Result, ToolError};
use crate::types::{CallOutcome, HttpMethod, RemoteCallSpec};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Deepself API client.
#[derive(Debug, Clone)]
pub struct DeepselfClient {
    base_url: String,
    credentials: Credentials,
    http: reqwest::Client,
}

impl DeepselfClient {
    /// Create a new client from an immutable configuration snapshot.
    pub fn new(config: &DeepselfConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: config.credentials(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_configured()
    }

    /// Perform exactly one request for `spec`.
    ///
    /// Non-2xx responses come back as [`CallOutcome::Failure`], not as errors.
    /// Errors are reserved for missing or unusable credentials, invalid
    /// header overrides, transport faults and cancellation through `cancel`.
    pub async fn call(
        &self,
        spec: &RemoteCallSpec,
        cancel: &CancellationToken,
    ) -> Result<CallOutcome> {
        if !self.credentials.is_configured() {
            return Err(ToolError::MissingCredentials);
        }

        let headers = self.headers(spec)?;
        let url = format!("{}{}", self.base_url, spec.path);
        info!("Deepself API call: {} {}", spec.method, spec.path);

        let mut request = match spec.method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
        }
        .headers(headers);

        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let exchange = async {
            let resp = request.send().await?;
            let status = resp.status().as_u16();
            // Read as text first: error bodies are not guaranteed to be JSON.
            let text = resp.text().await?;
            Ok::<_, ToolError>((status, text))
        };

        let (status, text) = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Deepself API call cancelled: {} {}", spec.method, spec.path);
                return Err(ToolError::cancelled());
            }
            result = exchange => result?,
        };

        debug!("Deepself API response: {} ({} bytes)", status, text.len());
        classify(status, text)
    }

    /// Default headers plus overrides. Fails rather than sending a request
    /// without auth or with an override silently dropped.
    fn headers(&self, spec: &RemoteCallSpec) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.credentials.api_key.trim()))
            .map_err(|_| ToolError::InvalidCredentials)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &spec.headers {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ToolError::InvalidHeader(name.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| ToolError::InvalidHeader(name.clone()))?;
            headers.insert(header, value);
        }
        Ok(headers)
    }
}

/// Split a finished exchange into success or failure by status code.
pub(crate) fn classify(status: u16, text: String) -> Result<CallOutcome> {
    if !(200..300).contains(&status) {
        return Ok(CallOutcome::Failure {
            status,
            body_text: text,
        });
    }

    if text.trim().is_empty() {
        return Ok(CallOutcome::Success {
            status,
            body: Value::Null,
        });
    }

    let body = serde_json::from_str(&text)
        .map_err(|source| ToolError::InvalidResponse { status, source })?;
    Ok(CallOutcome::Success { status, body })
}
