//! Chat API endpoints.
//!
//! - `POST /v1/chat`              — run one assistant turn
//! - `GET  /v1/chat/:session_key` — fetch the session transcript

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;

use aegis_domain::Error;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_key: String,
    pub message: String,
}

/// Build a standardized JSON error response: `{ "error": "<message>" }`.
fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/chat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn send(State(state): State<AppState>, Json(body): Json<ChatRequest>) -> Response {
    if body.session_key.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "session_key must not be empty");
    }
    if body.message.trim().is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "message must not be empty");
    }

    match state
        .assistant
        .send_message(&body.session_key, &body.message)
        .await
    {
        Ok(reply) => Json(reply).into_response(),
        Err(Error::Busy(_)) => api_error(
            StatusCode::TOO_MANY_REQUESTS,
            "session is busy: a send is already in progress",
        ),
        Err(e) => {
            tracing::error!(error = %e, "chat turn failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/chat/:session_key
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn history(
    State(state): State<AppState>,
    Path(session_key): Path<String>,
) -> Json<serde_json::Value> {
    let messages = state.assistant.history(&session_key);
    Json(json!({ "messages": messages }))
}
