//! `aegis-providers` — LLM adapters for the Aegis tool server.
//!
//! The insurance tools use a single completion surface: one prompt in,
//! one block of text out. [`LlmProvider`] is that seam, and
//! [`GoogleProvider`] is the Gemini implementation behind it.

pub mod google;
pub mod traits;
pub(crate) mod util;

// Re-exports for convenience.
pub use google::GoogleProvider;
pub use traits::{CompletionRequest, LlmProvider};
