//! Tool-server API endpoints.
//!
//! - `POST /v1/mcp`  — action endpoint used by the web client
//! - `GET  /v1/tools` — tool discovery

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use aegis_domain::Error;

use crate::dispatch;
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request shape
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Body of `POST /v1/mcp`. The `action` discriminates; `name` and
/// `arguments` are only read for `call`.
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Build a standardized JSON error response: `{ "error": "<message>" }`.
fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn internal_error(e: Error) -> Response {
    tracing::error!(error = %e, "tool server operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string(), "details": format!("{e:?}") })),
    )
        .into_response()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/mcp
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn action(State(state): State<AppState>, Json(body): Json<McpRequest>) -> Response {
    match body.action.as_deref() {
        Some("list") => match state.manager.list_tools().await {
            Ok(tools) => Json(json!({ "result": tools })).into_response(),
            Err(e) => internal_error(e.into()),
        },
        Some("call") => {
            let name = body.name.as_deref().filter(|n| !n.is_empty());
            // A JSON `null` counts as absent, same as no field at all.
            let arguments = body.arguments.filter(|a| !a.is_null());
            let (name, arguments) = match (name, arguments) {
                (Some(name), Some(arguments)) => (name, arguments),
                _ => {
                    return api_error(
                        StatusCode::BAD_REQUEST,
                        "Invalid action or missing parameters",
                    )
                }
            };
            call_tool(&state, name, &arguments).await
        }
        _ => api_error(
            StatusCode::BAD_REQUEST,
            "Invalid action or missing parameters",
        ),
    }
}

async fn call_tool(state: &AppState, name: &str, arguments: &Value) -> Response {
    match dispatch::dispatch(&state.manager, name, arguments).await {
        Ok(output) => {
            Json(json!({ "result": [{ "text": output.display_text() }] })).into_response()
        }
        Err(Error::InvalidArgs { tool, missing }) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("Missing required parameters for {tool}"),
                "missing": missing,
            })),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/tools
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn list_tools(State(state): State<AppState>) -> Response {
    match state.manager.list_tools().await {
        Ok(tools) => Json(json!({ "tools": tools })).into_response(),
        Err(e) => internal_error(e.into()),
    }
}
