//! The assistant engine.
//!
//! One entry point, [`Assistant::send_message`]: claim the session,
//! record the user message, map it to a tool call (or the help text),
//! dispatch, and record the reply. Tool failures never escape as errors
//! from a successfully claimed send; they become an apology message so
//! the conversation stays intact.

use std::sync::Arc;

use aegis_domain::{ChatMessage, Result, ToolCallRecord};
use aegis_mcp::McpManager;

use crate::assistant::conversation::ConversationStore;
use crate::assistant::intent::{IntentExtractor, ToolInvocation};
use crate::dispatch::dispatch;

/// Shown when a dispatched tool produced no displayable text.
const FALLBACK_TEXT: &str = "Tool executed successfully";

/// Shown when dispatch failed outright (validation, transport, server).
const APOLOGY_TEXT: &str =
    "Sorry, something went wrong while processing your request. Please try again.";

pub struct Assistant {
    store: ConversationStore,
    extractor: IntentExtractor,
    manager: Arc<McpManager>,
}

impl Assistant {
    pub fn new(manager: Arc<McpManager>) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            store: ConversationStore::new(),
            extractor: IntentExtractor::new()?,
            manager,
        })
    }

    pub fn history(&self, session_key: &str) -> Vec<ChatMessage> {
        self.store.history(session_key)
    }

    /// Run one send: returns the assistant's reply message.
    ///
    /// Fails with [`aegis_domain::Error::Busy`] when a send is already
    /// in flight for this session.
    pub async fn send_message(&self, session_key: &str, text: &str) -> Result<ChatMessage> {
        let _permit = self.store.try_begin(session_key)?;

        self.store.append(session_key, ChatMessage::user(text));

        let reply = match self.extractor.extract(text) {
            Some(invocation) => self.run_tool(session_key, invocation).await,
            None => ChatMessage::assistant(help_text(text)),
        };

        self.store.append(session_key, reply.clone());
        Ok(reply)
    }

    async fn run_tool(&self, session_key: &str, invocation: ToolInvocation) -> ChatMessage {
        tracing::info!(
            session = %session_key,
            tool = %invocation.name,
            "dispatching tool call"
        );

        match dispatch(&self.manager, &invocation.name, &invocation.arguments).await {
            Ok(output) => {
                let mut text = output.display_text();
                if text.is_empty() {
                    text = FALLBACK_TEXT.to_string();
                }
                ChatMessage::assistant(text).with_tool_call(ToolCallRecord {
                    name: invocation.name,
                    arguments: invocation.arguments,
                    result: Some(output.into_raw()),
                })
            }
            Err(e) => {
                tracing::error!(
                    session = %session_key,
                    tool = %invocation.name,
                    error = %e,
                    "tool call failed"
                );
                ChatMessage::assistant(APOLOGY_TEXT).with_tool_call(ToolCallRecord {
                    name: invocation.name,
                    arguments: invocation.arguments,
                    result: None,
                })
            }
        }
    }
}

fn help_text(message: &str) -> String {
    format!(
        "I understand you're asking about \"{message}\". I can help you with:\n\
         \n\
         - Insurance Quotes: Ask me to generate a quote for your web3 assets\n\
         - Smart Contract Analysis: Have me analyze contracts for insurance coverage\n\
         - Claim Processing: Submit and process insurance claims\n\
         \n\
         Try asking something like: \"Generate a quote for my NFT collection worth $10,000\""
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use std::result::Result;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use aegis_domain::config::ToolServerConfig;
    use aegis_domain::Role;
    use aegis_mcp::protocol::JsonRpcResponse;
    use aegis_mcp::transport::{McpTransport, TransportError};
    use aegis_mcp::McpClient;

    /// In-memory tool server: answers the handshake, records every
    /// `tools/call`, and replies from a canned script.
    struct MockToolServer {
        calls: Arc<StdMutex<Vec<(String, Value)>>>,
        call_result: Result<Value, ()>,
        call_delay: Option<Duration>,
    }

    impl MockToolServer {
        fn new(call_result: Value) -> Self {
            Self {
                calls: Arc::new(StdMutex::new(Vec::new())),
                call_result: Ok(call_result),
                call_delay: None,
            }
        }

        fn failing() -> Self {
            Self {
                calls: Arc::new(StdMutex::new(Vec::new())),
                call_result: Err(()),
                call_delay: None,
            }
        }
    }

    #[async_trait]
    impl McpTransport for MockToolServer {
        async fn send_request(
            &self,
            method: &str,
            params: Option<Value>,
        ) -> Result<JsonRpcResponse, TransportError> {
            let result = match method {
                "initialize" => json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "serverInfo": { "name": "mock", "version": "0.0.0" }
                }),
                "tools/list" => json!({
                    "tools": [
                        { "name": "generate_insurance_quote" },
                        { "name": "analyze_smart_contract" },
                        { "name": "claim_processing" }
                    ]
                }),
                "tools/call" => {
                    if let Some(delay) = self.call_delay {
                        tokio::time::sleep(delay).await;
                    }
                    let params = params.unwrap_or_default();
                    let name = params["name"].as_str().unwrap_or_default().to_string();
                    let arguments = params["arguments"].clone();
                    self.calls.lock().unwrap().push((name, arguments));
                    match &self.call_result {
                        Ok(value) => value.clone(),
                        Err(()) => return Err(TransportError::Timeout),
                    }
                }
                _ => Value::Null,
            };
            Ok(JsonRpcResponse::success(1, result))
        }

        async fn send_notification(&self, _method: &str) -> Result<(), TransportError> {
            Ok(())
        }

        fn is_alive(&self) -> bool {
            true
        }

        async fn shutdown(&self) {}
    }

    async fn assistant_with(mock: MockToolServer) -> (Assistant, Arc<StdMutex<Vec<(String, Value)>>>) {
        let calls = Arc::clone(&mock.calls);
        let client = McpClient::handshake(Box::new(mock)).await.unwrap();
        let manager = Arc::new(McpManager::with_client(ToolServerConfig::default(), client));
        (Assistant::new(manager).unwrap(), calls)
    }

    #[tokio::test]
    async fn quote_message_runs_the_quote_tool() {
        let mock = MockToolServer::new(json!({
            "content": [{ "type": "text", "text": "Insurance Quote Summary" }]
        }));
        let (assistant, calls) = assistant_with(mock).await;

        let reply = assistant
            .send_message("web:1", "Generate a quote for my NFT collection worth $5,000")
            .await
            .unwrap();

        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, "Insurance Quote Summary");

        let record = reply.tool_call.unwrap();
        assert_eq!(record.name, "generate_insurance_quote");
        assert_eq!(record.arguments["assetType"], "nft");
        assert!(record.result.is_some());

        // The wire call got snake_case keys.
        let sent = calls.lock().unwrap();
        let (name, args) = &sent[0];
        assert_eq!(name, "generate_insurance_quote");
        assert_eq!(args["asset_type"], "nft");
        assert_eq!(args["asset_value"], 5000);
        assert_eq!(args["risk_level"], "medium");
        assert_eq!(args["coverage_period"], 12);
    }

    #[tokio::test]
    async fn unmatched_message_gets_help_text() {
        let (assistant, calls) = assistant_with(MockToolServer::new(Value::Null)).await;

        let reply = assistant.send_message("web:1", "hello there").await.unwrap();

        assert!(reply
            .content
            .starts_with("I understand you're asking about \"hello there\""));
        assert!(reply.content.contains("Insurance Quotes"));
        assert!(reply.tool_call.is_none());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_tool_text_falls_back() {
        let mock = MockToolServer::new(json!(""));
        let (assistant, _calls) = assistant_with(mock).await;

        let reply = assistant
            .send_message("web:1", "quote my token for $800")
            .await
            .unwrap();
        assert_eq!(reply.content, "Tool executed successfully");
    }

    #[tokio::test]
    async fn transport_failure_becomes_apology() {
        let (assistant, _calls) = assistant_with(MockToolServer::failing()).await;

        let reply = assistant
            .send_message("web:1", "quote my token for $800")
            .await
            .unwrap();

        assert_eq!(
            reply.content,
            "Sorry, something went wrong while processing your request. Please try again."
        );
        let record = reply.tool_call.unwrap();
        assert!(record.result.is_none());
    }

    #[tokio::test]
    async fn soft_tool_error_is_displayed_verbatim() {
        let mock = MockToolServer::new(json!({
            "content": [{ "type": "text", "text": "Error generating insurance quote: quota" }],
            "isError": true
        }));
        let (assistant, _calls) = assistant_with(mock).await;

        let reply = assistant
            .send_message("web:1", "quote my token for $800")
            .await
            .unwrap();
        assert_eq!(reply.content, "Error generating insurance quote: quota");
        assert!(reply.tool_call.is_some());
    }

    #[tokio::test]
    async fn history_records_both_sides() {
        let (assistant, _calls) = assistant_with(MockToolServer::new(Value::Null)).await;

        assistant.send_message("web:1", "hello").await.unwrap();

        let history = assistant.history("web:1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "hello");
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn overlapping_send_is_rejected() {
        let mut mock = MockToolServer::new(json!("slow result"));
        mock.call_delay = Some(Duration::from_millis(200));
        let (assistant, _calls) = assistant_with(mock).await;
        let assistant = Arc::new(assistant);

        let first = {
            let assistant = Arc::clone(&assistant);
            tokio::spawn(async move {
                assistant
                    .send_message("web:1", "quote my token for $800")
                    .await
            })
        };

        // Let the first send reach the tool call.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = assistant
            .send_message("web:1", "another one")
            .await
            .unwrap_err();
        assert!(matches!(err, aegis_domain::Error::Busy(_)));

        // A different session is unaffected.
        assistant.send_message("web:2", "hello").await.unwrap();

        first.await.unwrap().unwrap();

        // The session accepts again once the first send finished.
        assistant.send_message("web:1", "hello again").await.unwrap();
    }

    #[tokio::test]
    async fn trigger_without_required_capture_gets_help() {
        // "analyze" fires the contract branch, but without an address
        // there is no invocation and no fall-through to other branches.
        let (assistant, calls) = assistant_with(MockToolServer::new(json!("ok"))).await;

        let reply = assistant
            .send_message("web:1", "analyze this contract please")
            .await
            .unwrap();
        assert!(reply.tool_call.is_none());
        assert!(calls.lock().unwrap().is_empty());
    }
}
