pub mod chat;
pub mod mcp;

use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/tools", get(mcp::list_tools))
        .route("/v1/mcp", post(mcp::action))
        .route("/v1/chat", post(chat::send))
        .route("/v1/chat/:session_key", get(chat::history))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
