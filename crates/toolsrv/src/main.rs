//! Aegis tool server.
//!
//! Serves the three insurance tools over newline-delimited JSON-RPC on
//! stdin/stdout. The gateway spawns this binary and drives it through
//! `aegis-mcp`; it can also be run by hand for debugging:
//!
//!   GOOGLE_GENERATIVE_AI_API_KEY=... aegis-toolsrv
//!
//! Env vars:
//!   AEGIS_PROVIDER_API_KEY_ENV — env var holding the Gemini API key
//!                                (default: GOOGLE_GENERATIVE_AI_API_KEY)
//!   AEGIS_PROVIDER_BASE_URL    — Gemini API base URL
//!   AEGIS_PROVIDER_MODEL       — model name (default: gemini-2.0-flash-exp)
//!   AEGIS_TOOLSRV_LOG          — log filter (default: info)
//!
//! All logging goes to stderr; stdout is the protocol channel.

mod registry;
mod tools;

#[cfg(test)]
mod testutil;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use aegis_domain::config::ProviderConfig;
use aegis_providers::{CompletionRequest, GoogleProvider, LlmProvider};
use registry::ToolRegistry;
use tools::{AnalyzeTool, ClaimTool, QuoteTool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("AEGIS_TOOLSRV_LOG")
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = provider_config_from_env();
    let provider: Arc<dyn LlmProvider> = match GoogleProvider::from_config(&config) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            // Still serve tools/list so discovery works; calls report the
            // missing credentials as soft failures.
            tracing::warn!(error = %e, "LLM provider unavailable, tool calls will fail");
            Arc::new(UnconfiguredProvider(e.to_string()))
        }
    };

    let registry = ToolRegistry::new()
        .register(QuoteTool::new(Arc::clone(&provider)))
        .register(AnalyzeTool::new(Arc::clone(&provider)))
        .register(ClaimTool::new(provider));

    aegis_mcp::serve(registry).await?;
    Ok(())
}

/// Build the provider config from env, falling back to the defaults the
/// gateway config uses.
fn provider_config_from_env() -> ProviderConfig {
    let mut config = ProviderConfig::default();
    if let Ok(v) = std::env::var("AEGIS_PROVIDER_API_KEY_ENV") {
        config.api_key_env = v;
    }
    if let Ok(v) = std::env::var("AEGIS_PROVIDER_BASE_URL") {
        config.base_url = v;
    }
    if let Ok(v) = std::env::var("AEGIS_PROVIDER_MODEL") {
        config.model = v;
    }
    config
}

/// Stand-in used when the real provider failed to initialize. Every
/// completion fails with the original config error.
struct UnconfiguredProvider(String);

#[async_trait::async_trait]
impl LlmProvider for UnconfiguredProvider {
    async fn complete(&self, _req: CompletionRequest) -> aegis_domain::Result<String> {
        Err(aegis_domain::Error::Config(self.0.clone()))
    }

    fn provider_id(&self) -> &str {
        "unconfigured"
    }
}
