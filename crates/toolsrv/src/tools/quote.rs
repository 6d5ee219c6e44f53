//! Insurance quote generation.
//!
//! Picks a coverage tier from a fixed price table, computes the premium, and
//! asks the LLM for a short recommendation paragraph. The returned text is a
//! plain-text quote summary ready to show to the user.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use aegis_domain::insurance::{RiskLevel, TOOL_QUOTE};
use aegis_mcp::ToolDescriptor;
use aegis_providers::{CompletionRequest, LlmProvider};

use crate::registry::InsuranceTool;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tier table
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One row of the coverage price table. Prices are USD per month.
#[derive(Debug)]
struct Tier {
    name: &'static str,
    claim_cap: &'static str,
    starting_price: f64,
    max_asset_value: f64,
    durations: &'static [u32],
    coverage: &'static [&'static str],
    deductible: &'static str,
}

/// Standard tiers, cheapest first. Selection picks the first tier whose
/// asset-value cap and supported durations both fit.
static STANDARD_TIERS: &[Tier] = &[
    Tier {
        name: "Lite",
        claim_cap: "$5,000",
        starting_price: 65.0,
        max_asset_value: 5_000.0,
        durations: &[1, 3, 6, 12],
        coverage: &["Basic Smart Contract Failure", "Custody Risk"],
        deductible: "$500",
    },
    Tier {
        name: "Shield",
        claim_cap: "$15,000",
        starting_price: 145.0,
        max_asset_value: 15_000.0,
        durations: &[1, 3, 6, 12],
        coverage: &[
            "Major Smart Contract Failure",
            "Basic DAO Liability",
            "NFT Theft",
            "Custody Risk",
        ],
        deductible: "$1,000",
    },
    Tier {
        name: "Max",
        claim_cap: "$50,000",
        starting_price: 205.0,
        max_asset_value: 25_000.0,
        durations: &[3, 6, 12],
        coverage: &[
            "All Shield coverage",
            "Advanced DAO Liability",
            "DeFi Hacks",
            "Optional Audit Review",
        ],
        deductible: "$2,500",
    },
];

/// Custom tier used when no standard tier fits.
static ENTERPRISE: Tier = Tier {
    name: "Enterprise",
    claim_cap: "$100,000+",
    starting_price: 295.0,
    max_asset_value: f64::INFINITY,
    durations: &[3, 6, 12],
    coverage: &[
        "All Max coverage",
        "Multi-wallet & Cross-chain",
        "Custom treasury options",
        "SLA-backed claims",
    ],
    deductible: "$5,000+",
};

fn select_tier(asset_value: f64, coverage_period: u32) -> &'static Tier {
    STANDARD_TIERS
        .iter()
        .find(|t| asset_value <= t.max_asset_value && t.durations.contains(&coverage_period))
        .unwrap_or(&ENTERPRISE)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tool
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
struct QuoteArgs {
    asset_type: String,
    asset_value: f64,
    risk_level: RiskLevel,
    coverage_period: u32,
}

pub struct QuoteTool {
    provider: Arc<dyn LlmProvider>,
}

impl QuoteTool {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl InsuranceTool for QuoteTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: TOOL_QUOTE.into(),
            description: "Generate personalized insurance quotes for web3 assets".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "asset_type": {
                        "type": "string",
                        "description": "Type of asset to insure (NFT, DeFi, Smart Contract, etc.)",
                    },
                    "asset_value": {
                        "type": "number",
                        "description": "Value of the asset in USD",
                    },
                    "risk_level": {
                        "type": "string",
                        "enum": ["low", "medium", "high"],
                        "description": "Risk assessment level",
                    },
                    "coverage_period": {
                        "type": "number",
                        "description": "Coverage period in months",
                    },
                },
                "required": ["asset_type", "asset_value", "risk_level", "coverage_period"],
            }),
        }
    }

    fn failure_prefix(&self) -> &'static str {
        "Error generating insurance quote:"
    }

    async fn call(&self, args: Value) -> aegis_domain::Result<String> {
        let args: QuoteArgs = serde_json::from_value(args)?;
        let tier = select_tier(args.asset_value, args.coverage_period);
        let premium = tier.starting_price
            * f64::from(args.coverage_period)
            * args.risk_level.premium_multiplier();

        tracing::debug!(
            tier = %tier.name,
            premium = %format!("{premium:.2}"),
            "selected coverage tier"
        );

        let reasoning = self
            .provider
            .complete(CompletionRequest::new(explanation_prompt(
                &args, tier, premium,
            )))
            .await?;

        Ok(quote_summary(&args, tier, premium, &reasoning))
    }
}

fn explanation_prompt(args: &QuoteArgs, tier: &Tier, premium: f64) -> String {
    format!(
        "You are an insurance advisor. Explain in 3-4 sentences why the following \
         insurance tier is the best choice based on the user's inputs.\n\
         \n\
         Tier: {name}\n\
         Asset Value: ${value}\n\
         Risk Level: {risk}\n\
         Coverage Period: {months} months\n\
         Coverage: {coverage}\n\
         Premium: ${premium:.2}\n\
         Claim Cap: {cap}\n\
         Deductible: {deductible}\n\
         \n\
         Make the response sound clear and supportive without technical jargon.",
        name = tier.name,
        value = args.asset_value,
        risk = args.risk_level.as_str(),
        months = args.coverage_period,
        coverage = tier.coverage.join(", "),
        cap = tier.claim_cap,
        deductible = tier.deductible,
    )
}

fn quote_summary(args: &QuoteArgs, tier: &Tier, premium: f64, reasoning: &str) -> String {
    let coverage: String = tier
        .coverage
        .iter()
        .map(|c| format!("- {c}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Insurance Quote Summary\n\
         \n\
         Selected Plan: {plan}\n\
         Asset Type: {asset_type}\n\
         Asset Value: ${value}\n\
         Risk Level: {risk}\n\
         Coverage Period: {months} months\n\
         \n\
         Premium: ${premium:.2}\n\
         Claim Cap: {cap}\n\
         Deductible: {deductible}\n\
         \n\
         Coverage Includes:\n\
         {coverage}\n\
         \n\
         Terms and Conditions:\n\
         - Subject to on-chain verification\n\
         - SLA response within 5 business days\n\
         \n\
         Recommendation:\n\
         {reasoning}",
        plan = tier.name,
        asset_type = args.asset_type,
        value = args.asset_value,
        risk = args.risk_level.as_str(),
        months = args.coverage_period,
        cap = tier.claim_cap,
        deductible = tier.deductible,
        reasoning = reasoning.trim(),
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FailingProvider, FixedProvider};
    use serde_json::json;

    #[test]
    fn small_asset_short_period_selects_lite() {
        assert_eq!(select_tier(4_000.0, 12).name, "Lite");
        assert_eq!(select_tier(5_000.0, 1).name, "Lite");
    }

    #[test]
    fn mid_asset_selects_shield() {
        assert_eq!(select_tier(10_000.0, 6).name, "Shield");
    }

    #[test]
    fn large_asset_selects_max() {
        assert_eq!(select_tier(20_000.0, 6).name, "Max");
    }

    #[test]
    fn oversized_asset_falls_back_to_enterprise() {
        assert_eq!(select_tier(100_000.0, 3).name, "Enterprise");
    }

    #[test]
    fn unsupported_duration_skips_to_enterprise() {
        // 20k fits Max on value, but Max has no 1-month duration.
        assert_eq!(select_tier(20_000.0, 1).name, "Enterprise");
    }

    #[test]
    fn premium_scales_with_months_and_risk() {
        let lite = select_tier(4_000.0, 12);
        let p = lite.starting_price * 12.0 * RiskLevel::Medium.premium_multiplier();
        assert_eq!(format!("{p:.2}"), "780.00");

        let max = select_tier(20_000.0, 6);
        let p = max.starting_price * 6.0 * RiskLevel::High.premium_multiplier();
        assert_eq!(format!("{p:.2}"), "1845.00");

        let shield = select_tier(10_000.0, 3);
        let p = shield.starting_price * 3.0 * RiskLevel::Low.premium_multiplier();
        assert_eq!(format!("{p:.2}"), "391.50");
    }

    #[tokio::test]
    async fn quote_summary_includes_all_fields() {
        let tool = QuoteTool::new(FixedProvider::arc("This tier fits your needs."));
        let text = tool
            .call(json!({
                "asset_type": "nft",
                "asset_value": 4000,
                "risk_level": "medium",
                "coverage_period": 12,
            }))
            .await
            .unwrap();

        assert!(text.starts_with("Insurance Quote Summary"));
        assert!(text.contains("Selected Plan: Lite"));
        assert!(text.contains("Asset Type: nft"));
        assert!(text.contains("Asset Value: $4000"));
        assert!(text.contains("Risk Level: medium"));
        assert!(text.contains("Coverage Period: 12 months"));
        assert!(text.contains("Premium: $780.00"));
        assert!(text.contains("Claim Cap: $5,000"));
        assert!(text.contains("Deductible: $500"));
        assert!(text.contains("- Basic Smart Contract Failure"));
        assert!(text.contains("Subject to on-chain verification"));
        assert!(text.ends_with("This tier fits your needs."));
    }

    #[tokio::test]
    async fn explanation_prompt_carries_quote_inputs() {
        let provider = FixedProvider::arc("ok");
        let tool = QuoteTool::new(Arc::clone(&provider) as Arc<dyn LlmProvider>);
        tool.call(json!({
            "asset_type": "defi",
            "asset_value": 20000,
            "risk_level": "high",
            "coverage_period": 6,
        }))
        .await
        .unwrap();

        let prompt = provider.last_prompt();
        assert!(prompt.starts_with("You are an insurance advisor."));
        assert!(prompt.contains("Tier: Max"));
        assert!(prompt.contains("Premium: $1845.00"));
        assert!(prompt.contains("Coverage Period: 6 months"));
        assert!(prompt.contains("without technical jargon"));
    }

    #[tokio::test]
    async fn missing_field_is_an_error() {
        let tool = QuoteTool::new(FixedProvider::arc("ok"));
        let err = tool
            .call(json!({ "asset_type": "nft" }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("asset_value"));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let tool = QuoteTool::new(FailingProvider::arc("quota exceeded"));
        let err = tool
            .call(json!({
                "asset_type": "nft",
                "asset_value": 4000,
                "risk_level": "medium",
                "coverage_period": 12,
            }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
