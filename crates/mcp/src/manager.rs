//! Tool-server manager — owns the persistent session and respawns the
//! child process when it dies.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::client::McpClient;
use crate::protocol::ToolDescriptor;
use crate::transport::TransportError;
use aegis_domain::config::ToolServerConfig;

/// Persistent handle to the tool server.
///
/// The session is created lazily on first use and reused across calls,
/// so the spawn + handshake cost is paid once per process lifetime. If
/// the child dies, the next operation respawns it.
pub struct McpManager {
    config: ToolServerConfig,
    session: Mutex<Option<Arc<McpClient>>>,
}

impl McpManager {
    /// Create a manager. No process is spawned until the first call
    /// (or an explicit [`McpManager::connect`]).
    pub fn new(config: ToolServerConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
        }
    }

    /// Build a manager around an existing session. The connection is
    /// still respawned from `config` if it dies.
    pub fn with_client(config: ToolServerConfig, client: McpClient) -> Self {
        Self {
            config,
            session: Mutex::new(Some(Arc::new(client))),
        }
    }

    /// Eagerly establish the session. Useful at startup so the first
    /// user request doesn't pay the spawn cost; failure here is not
    /// fatal, the next call retries.
    pub async fn connect(&self) -> Result<(), McpError> {
        self.client().await.map(|_| ())
    }

    /// Get the live session, (re)connecting when there is none or the
    /// child has exited.
    async fn client(&self) -> Result<Arc<McpClient>, McpError> {
        let mut slot = self.session.lock().await;
        if let Some(client) = slot.as_ref() {
            if client.is_alive() {
                return Ok(Arc::clone(client));
            }
            tracing::warn!(command = %self.config.command, "tool server is down, respawning");
        }

        let client = Arc::new(McpClient::connect(&self.config).await?);
        *slot = Some(Arc::clone(&client));
        Ok(client)
    }

    /// The tools the server advertised during the handshake.
    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpError> {
        let client = self.client().await?;
        Ok(client.tools().to_vec())
    }

    /// Call a tool and return the raw result value.
    pub async fn call_tool(&self, tool_name: &str, arguments: Value) -> Result<Value, McpError> {
        let client = self.client().await?;
        client.call_tool(tool_name, arguments).await
    }

    /// Gracefully shut down the session, if any.
    pub async fn shutdown(&self) {
        let slot = self.session.lock().await;
        if let Some(client) = slot.as_ref() {
            client.shutdown().await;
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Errors specific to tool-server operations.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("tool server is down")]
    ServerDown,
}

impl From<McpError> for aegis_domain::Error {
    fn from(e: McpError) -> Self {
        match e {
            McpError::Transport(TransportError::Timeout) => {
                aegis_domain::Error::Timeout("tool server response".into())
            }
            other => aegis_domain::Error::ToolServer(other.to_string()),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
