//! One initialized tool-server session.

use serde_json::Value;

use crate::manager::McpError;
use crate::protocol::{self, ToolDescriptor, ToolsListResult};
use crate::transport::{McpTransport, StdioTransport};
use aegis_domain::config::ToolServerConfig;

/// A connected tool-server session: the handshake has completed and the
/// tool list has been discovered.
pub struct McpClient {
    /// Tools discovered via `tools/list`.
    tools: Vec<ToolDescriptor>,
    /// Handle to the running process.
    transport: Box<dyn McpTransport>,
}

impl McpClient {
    /// Spawn the tool server and perform the MCP handshake.
    pub async fn connect(config: &ToolServerConfig) -> Result<Self, McpError> {
        let transport = StdioTransport::spawn(config).map_err(McpError::Transport)?;
        Self::handshake(Box::new(transport)).await
    }

    /// Perform the handshake over an already-built transport:
    /// `initialize`, then `notifications/initialized`, then `tools/list`.
    pub async fn handshake(transport: Box<dyn McpTransport>) -> Result<Self, McpError> {
        let init_params = protocol::initialize_params();
        let params_value = serde_json::to_value(&init_params)
            .map_err(|e| McpError::Protocol(format!("failed to serialize initialize params: {e}")))?;

        let resp = transport
            .send_request("initialize", Some(params_value))
            .await
            .map_err(McpError::Transport)?;

        if let Some(err) = resp.error {
            return Err(McpError::Protocol(format!("initialize failed: {err}")));
        }

        tracing::debug!("tool server initialize response received");

        transport
            .send_notification("notifications/initialized")
            .await
            .map_err(McpError::Transport)?;

        let tools_resp = transport
            .send_request("tools/list", None)
            .await
            .map_err(McpError::Transport)?;

        let tools = if tools_resp.is_error() {
            tracing::warn!("tools/list returned error, server will have no tools");
            Vec::new()
        } else {
            let result_value = tools_resp.result.unwrap_or(Value::Null);
            match serde_json::from_value::<ToolsListResult>(result_value) {
                Ok(r) => r.tools,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse tools/list result");
                    Vec::new()
                }
            }
        };

        tracing::info!(tool_count = tools.len(), "tool server session initialized");

        Ok(Self { tools, transport })
    }

    /// The tools discovered during the handshake.
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Check if the session's transport is still alive.
    pub fn is_alive(&self) -> bool {
        self.transport.is_alive()
    }

    /// Call a tool and return the raw result value.
    ///
    /// The result is left unparsed on purpose: servers answer with a
    /// bare string, a content envelope, or an arbitrary object, and the
    /// caller normalizes via [`crate::ToolOutput`].
    pub async fn call_tool(&self, tool_name: &str, arguments: Value) -> Result<Value, McpError> {
        if !self.transport.is_alive() {
            return Err(McpError::ServerDown);
        }

        let params = serde_json::json!({
            "name": tool_name,
            "arguments": arguments
        });

        let resp = self
            .transport
            .send_request("tools/call", Some(params))
            .await
            .map_err(McpError::Transport)?;

        if let Some(err) = resp.error {
            return Err(McpError::Protocol(format!("tools/call failed: {err}")));
        }

        Ok(resp.result.unwrap_or(Value::Null))
    }

    /// Gracefully shut down the session.
    pub async fn shutdown(&self) {
        tracing::info!("shutting down tool server session");
        self.transport.shutdown().await;
    }
}
