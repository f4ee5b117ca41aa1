//! Host-facing plugin: registration with an agent runtime and the
//! invocation boundary that turns every outcome into tool output.

use crate::api::DeepselfClient;
use crate::config::DeepselfConfig;
use crate::error::Result;
use crate::tools::deepself;
use crate::tools::normalize::{failure_message, http_failure_message, render_failure, render_success};
use crate::tools::{HostTool, ToolRegistry};
use crate::types::{CallOutcome, OutputShape, ToolOutput};
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Instrument};

/// Capability object a host runtime hands to the plugin at load time.
pub trait ToolHost {
    /// The host's read-only configuration tree.
    fn config_tree(&self) -> &Value;

    /// Advertise a tool. Invocations come back through [`DeepselfPlugin::invoke`].
    fn register_tool(&mut self, tool: HostTool);
}

/// Registry plus client; shared read-only across concurrent invocations.
#[derive(Debug)]
pub struct DeepselfPlugin {
    registry: ToolRegistry,
    client: DeepselfClient,
}

impl DeepselfPlugin {
    pub fn new(config: &DeepselfConfig) -> Result<Self> {
        let mut registry = ToolRegistry::new();
        deepself::register_all(&mut registry)?;
        Ok(Self {
            registry,
            client: DeepselfClient::new(config),
        })
    }

    pub fn client(&self) -> &DeepselfClient {
        &self.client
    }

    /// Descriptors for every registered tool, in registration order.
    pub fn host_tools(&self) -> Vec<HostTool> {
        self.registry.definitions().map(|d| d.descriptor()).collect()
    }

    /// Run one tool call end to end. Never fails: errors are rendered into
    /// the tool's declared output shape.
    pub async fn invoke(&self, name: &str, args: &Value, cancel: &CancellationToken) -> ToolOutput {
        let call_id = ulid::Ulid::new().to_string();
        let span = tracing::info_span!("tool", tool = %name, call_id = %call_id);
        self.invoke_inner(name, args, cancel).instrument(span).await
    }

    async fn invoke_inner(&self, name: &str, args: &Value, cancel: &CancellationToken) -> ToolOutput {
        // Unknown tools have no declared shape; report them as text.
        let shape = self
            .registry
            .get(name)
            .map(|d| d.output_shape)
            .unwrap_or(OutputShape::Text);

        let dispatch = match self.registry.dispatch(name, args) {
            Ok(dispatch) => dispatch,
            Err(e) => return self.fail(name, shape, &failure_message(&e)),
        };

        match self.client.call(&dispatch.spec, cancel).await {
            Ok(CallOutcome::Success { body, .. }) => {
                let summary = dispatch.definition.operation.summarize(&dispatch.args, &body);
                render_success(shape, summary)
            }
            Ok(CallOutcome::Failure { status, body_text }) => {
                self.fail(name, shape, &http_failure_message(status, &body_text))
            }
            Err(e) => self.fail(name, shape, &failure_message(&e)),
        }
    }

    fn fail(&self, name: &str, shape: OutputShape, message: &str) -> ToolOutput {
        error!("Deepself {} error: {}", name, message);
        render_failure(shape, message)
    }
}

/// Load the plugin into a host: resolve config from the host tree and
/// advertise every tool.
pub fn register(host: &mut dyn ToolHost) -> Result<Arc<DeepselfPlugin>> {
    info!("Deepself plugin loaded");

    let config = DeepselfConfig::from_host_tree(host.config_tree());
    if !config.credentials().is_configured() {
        warn!("Deepself API key not configured; tool calls will fail until it is set");
    }

    let plugin = Arc::new(DeepselfPlugin::new(&config)?);
    let tools = plugin.host_tools();
    let count = tools.len();
    for tool in tools {
        host.register_tool(tool);
    }

    info!("Deepself plugin registered {} tools successfully", count);
    Ok(plugin)
}
