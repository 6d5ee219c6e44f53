//! Mock LLM providers for tool tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use aegis_domain::{Error, Result};
use aegis_providers::{CompletionRequest, LlmProvider};

/// Returns a canned completion and records the prompts it was given.
pub struct FixedProvider {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl FixedProvider {
    pub fn arc(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> String {
        self.prompts
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for FixedProvider {
    async fn complete(&self, req: CompletionRequest) -> Result<String> {
        self.prompts.lock().unwrap().push(req.prompt);
        Ok(self.reply.clone())
    }

    fn provider_id(&self) -> &str {
        "fixed"
    }
}

/// Fails every completion with a provider error.
pub struct FailingProvider {
    message: String,
}

impl FailingProvider {
    pub fn arc(message: &str) -> Arc<Self> {
        Arc::new(Self {
            message: message.to_string(),
        })
    }
}

#[async_trait]
impl LlmProvider for FailingProvider {
    async fn complete(&self, _req: CompletionRequest) -> Result<String> {
        Err(Error::Provider {
            provider: "test".into(),
            message: self.message.clone(),
        })
    }

    fn provider_id(&self) -> &str {
        "failing"
    }
}
