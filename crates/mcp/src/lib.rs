//! `aegis-mcp` — JSON-RPC tool-server plumbing for Aegis.
//!
//! This crate provides both halves of the gateway ↔ tool-server channel:
//! - JSON-RPC 2.0 protocol types and the MCP handshake payloads.
//! - A stdio transport that spawns the tool-server child process and
//!   speaks newline-delimited JSON over its stdin/stdout.
//! - [`McpClient`], one initialized session (handshake + tool cache).
//! - [`McpManager`], a persistent handle that reuses the session across
//!   calls and respawns the child when it dies.
//! - [`serve`], the server-side loop a tool-server binary runs on its
//!   own stdin/stdout, dispatching to a [`ToolHandler`].
//! - [`ToolOutput`], the normalizer that turns a raw `tools/call`
//!   result into display text.
//!
//! # Usage
//!
//! ```rust,ignore
//! use aegis_mcp::{McpManager, ToolOutput};
//!
//! let manager = McpManager::new(config.toolsrv.clone());
//! let raw = manager.call_tool("generate_insurance_quote", args).await?;
//! let text = ToolOutput::from_value(raw).display_text();
//! ```

pub mod client;
pub mod manager;
pub mod protocol;
pub mod server;
pub mod transport;

// Re-exports for convenience.
pub use client::McpClient;
pub use manager::{McpError, McpManager};
pub use protocol::{ToolCallResult, ToolDescriptor, ToolOutput};
pub use server::{serve, ToolHandler};
