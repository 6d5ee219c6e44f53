//! Server-side stdio loop for tool-server binaries.
//!
//! A tool server reads newline-delimited JSON-RPC requests from stdin
//! and writes one response line per request to stdout. Logging must go
//! to stderr — stdout is the protocol channel.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::protocol::{
    JsonRpcResponse, ToolCallResult, ToolDescriptor, INTERNAL_ERROR, INVALID_PARAMS,
    METHOD_NOT_FOUND, PARSE_ERROR,
};

/// The tools a server exposes and how to run them.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Server name advertised in the `initialize` response.
    fn name(&self) -> &str;

    /// Tool definitions advertised by `tools/list`.
    fn descriptors(&self) -> Vec<ToolDescriptor>;

    /// Execute a tool call. An `Err` here becomes a soft failure on the
    /// wire (`isError: true`), not a JSON-RPC error.
    async fn call(&self, name: &str, arguments: Value) -> aegis_domain::Result<ToolCallResult>;
}

/// Incoming message envelope. Requests carry an `id`; notifications
/// don't and never get a response.
#[derive(Debug, Deserialize)]
struct Incoming {
    method: String,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default)]
    id: Option<u64>,
}

/// Run the request loop until stdin closes.
pub async fn serve<H: ToolHandler>(handler: H) -> aegis_domain::Result<()> {
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    tracing::info!(server = handler.name(), "tool server ready");

    let mut line = String::new();
    loop {
        line.clear();
        if stdin.read_line(&mut line).await? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        if let Some(response) = handle_line(&handler, &line).await {
            let json = serde_json::to_string(&response)?;
            stdout.write_all(json.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    tracing::info!("stdin closed, tool server exiting");
    Ok(())
}

/// Parse one line and produce the response to write, if any.
async fn handle_line<H: ToolHandler>(handler: &H, line: &str) -> Option<JsonRpcResponse> {
    match serde_json::from_str::<Incoming>(line) {
        Ok(msg) => handle_message(handler, msg).await,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable request line");
            Some(JsonRpcResponse::failure(0, PARSE_ERROR, "Parse error"))
        }
    }
}

async fn handle_message<H: ToolHandler>(handler: &H, msg: Incoming) -> Option<JsonRpcResponse> {
    // Notifications never get a response.
    let id = match msg.id {
        Some(id) => id,
        None => {
            if msg.method == "notifications/initialized" {
                tracing::debug!("client finished initializing");
            } else {
                tracing::debug!(method = %msg.method, "ignoring notification");
            }
            return None;
        }
    };

    let response = match msg.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": handler.name(),
                    "version": env!("CARGO_PKG_VERSION"),
                }
            }),
        ),
        "tools/list" => JsonRpcResponse::success(
            id,
            serde_json::json!({ "tools": handler.descriptors() }),
        ),
        "tools/call" => {
            let params = msg.params.unwrap_or(Value::Null);
            let Some(name) = params.get("name").and_then(Value::as_str) else {
                return Some(JsonRpcResponse::failure(
                    id,
                    INVALID_PARAMS,
                    "tools/call requires a string `name` parameter",
                ));
            };
            let arguments = params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| serde_json::json!({}));

            tracing::info!(tool = name, "dispatching tool call");
            let result = match handler.call(name, arguments).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(tool = name, error = %e, "tool call failed");
                    ToolCallResult::error(format!("Error executing tool: {e}"))
                }
            };
            serialized(id, serde_json::to_value(result))
        }
        other => {
            tracing::warn!(method = other, "unknown method");
            JsonRpcResponse::failure(id, METHOD_NOT_FOUND, format!("Method not found: {other}"))
        }
    };

    Some(response)
}

fn serialized(id: u64, value: serde_json::Result<Value>) -> JsonRpcResponse {
    match value {
        Ok(v) => JsonRpcResponse::success(id, v),
        Err(e) => JsonRpcResponse::failure(id, INTERNAL_ERROR, format!("failed to serialize result: {e}")),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoHandler;

    #[async_trait]
    impl ToolHandler for EchoHandler {
        fn name(&self) -> &str {
            "echo-server"
        }

        fn descriptors(&self) -> Vec<ToolDescriptor> {
            vec![ToolDescriptor {
                name: "echo".into(),
                description: "Echo the input back".into(),
                input_schema: serde_json::json!({ "type": "object" }),
            }]
        }

        async fn call(&self, name: &str, arguments: Value) -> aegis_domain::Result<ToolCallResult> {
            match name {
                "echo" => Ok(ToolCallResult::text(arguments.to_string())),
                other => Err(aegis_domain::Error::Other(format!("Unknown tool: {other}"))),
            }
        }
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let resp = handle_line(&EchoHandler, r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#)
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "echo-server");
    }

    #[tokio::test]
    async fn initialized_notification_gets_no_response() {
        let resp = handle_line(
            &EchoHandler,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        )
        .await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn tools_list_reports_descriptors() {
        let resp = handle_line(&EchoHandler, r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["tools"][0]["name"], "echo");
        assert!(result["tools"][0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn tools_call_dispatches() {
        let line = r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"echo","arguments":{"x":1}}}"#;
        let resp = handle_line(&EchoHandler, line).await.unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["content"][0]["text"], r#"{"x":1}"#);
        assert_eq!(result["isError"], false);
    }

    #[tokio::test]
    async fn unknown_tool_is_soft_failure() {
        let line = r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"nope","arguments":{}}}"#;
        let resp = handle_line(&EchoHandler, line).await.unwrap();
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(
            result["content"][0]["text"],
            "Error executing tool: Unknown tool: nope"
        );
    }

    #[tokio::test]
    async fn tools_call_without_name_is_invalid_params() {
        let line = r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"arguments":{}}}"#;
        let resp = handle_line(&EchoHandler, line).await.unwrap();
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let resp = handle_line(&EchoHandler, r#"{"jsonrpc":"2.0","id":6,"method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn garbage_line_is_parse_error() {
        let resp = handle_line(&EchoHandler, "not json at all").await.unwrap();
        assert_eq!(resp.error.unwrap().code, PARSE_ERROR);
    }

    #[tokio::test]
    async fn missing_arguments_defaults_to_empty_object() {
        let line = r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"echo"}}"#;
        let resp = handle_line(&EchoHandler, line).await.unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["content"][0]["text"], "{}");
    }
}
