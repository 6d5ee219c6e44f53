//! Tool-server configuration for the domain layer.
//!
//! These are lightweight config structs used to deserialize the
//! `[toolsrv]` section of the gateway config. The actual JSON-RPC
//! client logic lives in the `aegis-mcp` crate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for the backing tool-server process.
///
/// The gateway spawns this command and speaks newline-delimited
/// JSON-RPC over its stdin/stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolServerConfig {
    /// The command to spawn.
    #[serde(default = "d_command")]
    pub command: String,

    /// Arguments to pass to the command.
    #[serde(default)]
    pub args: Vec<String>,

    /// Optional environment variables to set on the spawned process.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Default for ToolServerConfig {
    fn default() -> Self {
        Self {
            command: d_command(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }
}

fn d_command() -> String {
    "aegis-toolsrv".into()
}
