//! AppState construction extracted from `main.rs`.
//!
//! `serve` and the one-shot `run` command share this boot path so both
//! get the same validation and wiring without an HTTP listener.

use std::sync::Arc;

use anyhow::Context;

use aegis_domain::config::{Config, ConfigSeverity};
use aegis_mcp::McpManager;

use crate::assistant::Assistant;
use crate::state::AppState;

/// Validate config, wire up the tool-server manager and the assistant,
/// and return a fully-built [`AppState`].
pub async fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── Tool-server manager ──────────────────────────────────────────
    let manager = Arc::new(McpManager::new(config.toolsrv.clone()));
    match manager.connect().await {
        Ok(()) => {
            let tools = manager.list_tools().await.map(|t| t.len()).unwrap_or(0);
            tracing::info!(
                command = %config.toolsrv.command,
                tools,
                "tool server ready"
            );
        }
        // Not fatal: the first request retries the spawn.
        Err(e) => tracing::warn!(
            command = %config.toolsrv.command,
            error = %e,
            "tool server not reachable at startup"
        ),
    }

    // ── Assistant ────────────────────────────────────────────────────
    let assistant = Arc::new(
        Assistant::new(Arc::clone(&manager)).context("compiling intent patterns")?,
    );
    tracing::info!("assistant ready");

    Ok(AppState {
        config,
        manager,
        assistant,
    })
}
