//! `aegis run` — one-shot execution command.
//!
//! Sends a single message through the assistant, prints the reply, and
//! exits.  Useful for scripting and quick checks against a live tool
//! server.

use std::sync::Arc;

use aegis_domain::config::Config;

use crate::bootstrap;

/// Execute a single assistant turn and print the response.
///
/// This is the entry point for `aegis run "message"`.
pub async fn run(
    config: Arc<Config>,
    message: String,
    session_key: String,
    json_output: bool,
) -> anyhow::Result<()> {
    let state = bootstrap::build_app_state(config).await?;

    let reply = state.assistant.send_message(&session_key, &message).await?;

    if json_output {
        let rendered = serde_json::to_string_pretty(&reply)
            .map_err(|e| anyhow::anyhow!("serializing reply: {e}"))?;
        println!("{rendered}");
    } else {
        println!("{}", reply.content);
        if let Some(call) = &reply.tool_call {
            eprintln!("\x1b[2m[tool: {}]\x1b[0m", call.name);
        }
    }

    state.manager.shutdown().await;
    Ok(())
}
