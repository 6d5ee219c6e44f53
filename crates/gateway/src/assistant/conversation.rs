//! Conversation state.
//!
//! Append-only message history per session key, plus the per-session
//! busy gate: while one send is in flight, further sends for the same
//! session are rejected rather than queued. Distinct sessions never
//! block each other.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use aegis_domain::{ChatMessage, Error, Result};

pub struct ConversationStore {
    messages: RwLock<HashMap<String, Vec<ChatMessage>>>,
    locks: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Append a message to a session's history.
    pub fn append(&self, session_key: &str, message: ChatMessage) {
        self.messages
            .write()
            .entry(session_key.to_owned())
            .or_default()
            .push(message);
    }

    /// Snapshot of a session's history (empty for unknown sessions).
    pub fn history(&self, session_key: &str) -> Vec<ChatMessage> {
        self.messages
            .read()
            .get(session_key)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of sessions with at least one message.
    pub fn session_count(&self) -> usize {
        self.messages.read().len()
    }

    /// Claim the session for one send. The permit releases on drop.
    ///
    /// Fails with [`Error::Busy`] when a send is already in flight for
    /// this session; callers surface that instead of queueing.
    pub fn try_begin(&self, session_key: &str) -> Result<OwnedSemaphorePermit> {
        let sem = {
            let mut locks = self.locks.lock();
            locks
                .entry(session_key.to_owned())
                .or_insert_with(|| Arc::new(Semaphore::new(1)))
                .clone()
        };

        sem.try_acquire_owned()
            .map_err(|_| Error::Busy(session_key.to_owned()))
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
