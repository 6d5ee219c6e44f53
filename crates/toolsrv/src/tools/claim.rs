//! Claim intake and processing report.
//!
//! Builds a claim processing prompt from the incident details and returns the
//! LLM's report verbatim. Evidence is optional; an empty string counts as no
//! evidence.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use aegis_domain::insurance::TOOL_CLAIM;
use aegis_mcp::ToolDescriptor;
use aegis_providers::{CompletionRequest, LlmProvider};

use crate::registry::InsuranceTool;

#[derive(Debug, Deserialize)]
struct ClaimArgs {
    claim_type: String,
    incident_details: String,
    loss_amount: f64,
    #[serde(default)]
    evidence: Option<String>,
}

pub struct ClaimTool {
    provider: Arc<dyn LlmProvider>,
}

impl ClaimTool {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl InsuranceTool for ClaimTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: TOOL_CLAIM.into(),
            description: "Process insurance claims for web3 assets".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "claim_type": {
                        "type": "string",
                        "description": "Type of claim (hack, exploit, rug pull, etc.)",
                    },
                    "incident_details": {
                        "type": "string",
                        "description": "Details of the incident",
                    },
                    "loss_amount": {
                        "type": "number",
                        "description": "Amount of loss in USD",
                    },
                    "evidence": {
                        "type": "string",
                        "description": "Evidence supporting the claim",
                    },
                },
                "required": ["claim_type", "incident_details", "loss_amount"],
            }),
        }
    }

    fn failure_prefix(&self) -> &'static str {
        "Error processing claim:"
    }

    async fn call(&self, args: Value) -> aegis_domain::Result<String> {
        let args: ClaimArgs = serde_json::from_value(args)?;
        tracing::debug!(
            claim_type = %args.claim_type,
            loss_amount = args.loss_amount,
            "processing claim"
        );
        self.provider
            .complete(CompletionRequest::new(claim_prompt(&args)))
            .await
    }
}

fn claim_prompt(args: &ClaimArgs) -> String {
    let evidence = args
        .evidence
        .as_deref()
        .filter(|e| !e.is_empty())
        .unwrap_or("No evidence provided");

    format!(
        "Process an insurance claim with the following details:\n\
         - Claim Type: {claim_type}\n\
         - Incident Details: {details}\n\
         - Loss Amount: {loss}\n\
         - Evidence: {evidence}\n\
         \n\
         Please provide:\n\
         1. Initial claim assessment\n\
         2. Required documentation\n\
         3. Investigation steps\n\
         4. Estimated processing time\n\
         5. Preliminary approval status\n\
         \n\
         Format as a professional claim processing report.",
        claim_type = args.claim_type,
        details = args.incident_details,
        loss = args.loss_amount,
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
