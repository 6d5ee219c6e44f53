use std::sync::Arc;

use aegis_domain::config::Config;
use aegis_mcp::McpManager;

use crate::assistant::Assistant;

/// Shared application state passed to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub manager: Arc<McpManager>,
    pub assistant: Arc<Assistant>,
}
