//! Conversation layer: intent extraction, per-session transcripts, and
//! the engine that turns a chat message into a tool dispatch.

mod conversation;
mod engine;
mod intent;

pub use conversation::ConversationStore;
pub use engine::Assistant;
pub use intent::{IntentExtractor, ToolInvocation};
