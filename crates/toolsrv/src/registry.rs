//! Tool registry.
//!
//! Holds the set of insurance tools and adapts them to the JSON-RPC server
//! loop. Tool failures are reported in-band as error results so the caller
//! sees the failure text instead of a broken connection.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use aegis_domain::Error;
use aegis_mcp::{ToolCallResult, ToolDescriptor, ToolHandler};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tool trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A single callable insurance tool.
#[async_trait]
pub trait InsuranceTool: Send + Sync + 'static {
    /// Name and input schema advertised through `tools/list`.
    fn descriptor(&self) -> ToolDescriptor;

    /// Prefix prepended to the error message when a call fails.
    fn failure_prefix(&self) -> &'static str;

    /// Run the tool. The returned string is the user-facing result text.
    async fn call(&self, args: Value) -> aegis_domain::Result<String>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Registry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Ordered collection of tools, exposed to the server loop as a
/// [`ToolHandler`]. Listing preserves registration order.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn InsuranceTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(mut self, tool: impl InsuranceTool) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn InsuranceTool>> {
        self.tools.iter().find(|t| t.descriptor().name == name)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolHandler for ToolRegistry {
    fn name(&self) -> &str {
        "aegis-toolsrv"
    }

    fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    async fn call(&self, name: &str, arguments: Value) -> aegis_domain::Result<ToolCallResult> {
        let Some(tool) = self.find(name) else {
            return Err(Error::Other(format!("Unknown tool: {name}")));
        };

        match tool.call(arguments).await {
            Ok(text) => Ok(ToolCallResult::text(text)),
            Err(e) => {
                tracing::warn!(tool = %name, error = %e, "tool call failed");
                Ok(ToolCallResult::error(format!(
                    "{} {e}",
                    tool.failure_prefix()
                )))
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
