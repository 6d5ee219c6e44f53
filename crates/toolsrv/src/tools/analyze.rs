//! Smart contract analysis for coverage assessment.
//!
//! Sends a structured analysis prompt to the LLM and returns the model text
//! verbatim. The analysis is advisory, not an on-chain audit.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use aegis_domain::insurance::TOOL_ANALYZE;
use aegis_mcp::ToolDescriptor;
use aegis_providers::{CompletionRequest, LlmProvider};

use crate::registry::InsuranceTool;

#[derive(Debug, Deserialize)]
struct AnalyzeArgs {
    contract_address: String,
    network: String,
}

pub struct AnalyzeTool {
    provider: Arc<dyn LlmProvider>,
}

impl AnalyzeTool {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl InsuranceTool for AnalyzeTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: TOOL_ANALYZE.into(),
            description: "Analyze smart contract for insurance coverage assessment".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "contract_address": {
                        "type": "string",
                        "description": "Smart contract address",
                    },
                    "network": {
                        "type": "string",
                        "description": "Blockchain network (ethereum, polygon, etc.)",
                    },
                },
                "required": ["contract_address", "network"],
            }),
        }
    }

    fn failure_prefix(&self) -> &'static str {
        "Error analyzing smart contract:"
    }

    async fn call(&self, args: Value) -> aegis_domain::Result<String> {
        let args: AnalyzeArgs = serde_json::from_value(args)?;
        tracing::debug!(
            address = %args.contract_address,
            network = %args.network,
            "analyzing contract"
        );
        self.provider
            .complete(CompletionRequest::new(analysis_prompt(&args)))
            .await
    }
}

fn analysis_prompt(args: &AnalyzeArgs) -> String {
    format!(
        "Analyze the smart contract at address {address} on {network} network \
         for insurance purposes.\n\
         \n\
         Please provide:\n\
         1. Security assessment\n\
         2. Risk factors\n\
         3. Audit status\n\
         4. Recommended coverage type\n\
         5. Premium adjustment factors\n\
         \n\
         Note: This is a simulated analysis for demonstration purposes.",
        address = args.contract_address,
        network = args.network,
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
