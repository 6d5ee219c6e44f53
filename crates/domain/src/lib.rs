//! `aegis-domain` — Shared types for the Aegis insurance assistant.
//!
//! This crate provides:
//! - The workspace-wide [`Error`] type and [`Result`] alias.
//! - Configuration structs deserialized from the gateway's TOML config.
//! - The chat transcript model ([`ChatMessage`], [`Role`], [`ToolCallRecord`]).
//! - Insurance vocabulary: tool names, known networks and claim types,
//!   and [`RiskLevel`].
//!
//! Everything here is plain data — no IO, no async. The heavier crates
//! (`aegis-mcp`, `aegis-providers`, the gateway and tool-server binaries)
//! all depend on this one.

pub mod chat;
pub mod config;
pub mod error;
pub mod insurance;

pub use chat::{ChatMessage, Role, ToolCallRecord};
pub use error::{Error, Result};
pub use insurance::RiskLevel;
