//! Aegis gateway library.
//!
//! Everything behind the `aegis` binary: the assistant engine (intent
//! extraction, conversation state), the tool dispatch layer, and the
//! HTTP API. `main.rs` only parses the CLI and wires these together.

pub mod api;
pub mod assistant;
pub mod bootstrap;
pub mod cli;
pub mod dispatch;
pub mod state;
