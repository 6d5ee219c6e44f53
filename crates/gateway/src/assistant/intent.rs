//! Free-text to tool-call mapping.
//!
//! A small rule engine, not an LLM: fixed trigger words pick the tool,
//! regex extractors pull the arguments out of the message. Argument keys
//! are camelCase here; [`crate::dispatch`] converts them to the
//! snake_case names the tool schemas use.
//!
//! Trigger priority is fixed: quote, then analyze, then claim. A trigger
//! without the arguments it needs produces no invocation at all, so the
//! caller can fall back to help text.

use regex::Regex;
use serde_json::{json, Value};

use aegis_domain::insurance::{
    RiskLevel, CLAIM_TYPES, NETWORKS, TOOL_ANALYZE, TOOL_CLAIM, TOOL_QUOTE,
};

/// A tool call the extractor decided on: tool name plus camelCase
/// argument object.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: Value,
}

/// Holds the precompiled patterns. Build once at startup and share.
pub struct IntentExtractor {
    quote_trigger: Regex,
    analyze_trigger: Regex,
    claim_trigger: Regex,
    asset_types: Vec<(&'static str, Regex)>,
    amount: Regex,
    high_risk: Regex,
    low_risk: Regex,
    period: Regex,
    address: Regex,
    loss: Regex,
}

impl IntentExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            quote_trigger: Regex::new(r"(?i)quote|insurance")?,
            analyze_trigger: Regex::new(r"(?i)analyze|contract")?,
            claim_trigger: Regex::new(r"(?i)claim")?,
            // Order matters: first matching type wins.
            asset_types: vec![
                ("nft", Regex::new(r"(?i)nft|non-fungible token")?),
                ("defi", Regex::new(r"(?i)defi|decentralized finance")?),
                ("smart_contract", Regex::new(r"(?i)smart contract|contract")?),
                ("token", Regex::new(r"(?i)token|cryptocurrency")?),
            ],
            amount: Regex::new(r"\$?([\d,]+)")?,
            high_risk: Regex::new(r"(?i)high.risk|risky|dangerous")?,
            low_risk: Regex::new(r"(?i)low.risk|safe|secure")?,
            period: Regex::new(r"(?i)(\d+)\s*months?")?,
            address: Regex::new(r"0x[a-fA-F0-9]{40}")?,
            loss: Regex::new(r"(?i)lost?\s*\$?([\d,]+)")?,
        })
    }

    /// Map a message to a tool invocation, or `None` when no rule fires.
    pub fn extract(&self, message: &str) -> Option<ToolInvocation> {
        if self.quote_trigger.is_match(message) {
            return self.quote_intent(message);
        }
        if self.analyze_trigger.is_match(message) {
            return self.analyze_intent(message);
        }
        if self.claim_trigger.is_match(message) {
            return self.claim_intent(message);
        }
        None
    }

    // ── Per-tool intents ────────────────────────────────────────────

    fn quote_intent(&self, message: &str) -> Option<ToolInvocation> {
        // Type, risk, and period all have defaults; the asset value is
        // the only hard requirement.
        let asset_value = self.asset_value(message)?;
        Some(ToolInvocation {
            name: TOOL_QUOTE.to_string(),
            arguments: json!({
                "assetType": self.asset_type(message),
                "assetValue": asset_value,
                "riskLevel": self.risk_level(message).as_str(),
                "coveragePeriod": self.coverage_period(message),
            }),
        })
    }

    fn analyze_intent(&self, message: &str) -> Option<ToolInvocation> {
        let address = self.address.find(message)?.as_str().to_string();
        let network = self.network(message).unwrap_or("ethereum");
        Some(ToolInvocation {
            name: TOOL_ANALYZE.to_string(),
            arguments: json!({
                "contractAddress": address,
                "network": network,
            }),
        })
    }

    fn claim_intent(&self, message: &str) -> Option<ToolInvocation> {
        let loss_amount = self.loss_amount(message)?;
        Some(ToolInvocation {
            name: TOOL_CLAIM.to_string(),
            arguments: json!({
                "claimType": self.claim_type(message),
                "incidentDetails": message,
                "lossAmount": loss_amount,
            }),
        })
    }

    // ── Field extractors ────────────────────────────────────────────

    fn asset_type(&self, message: &str) -> &'static str {
        self.asset_types
            .iter()
            .find(|(_, pattern)| pattern.is_match(message))
            .map(|(name, _)| *name)
            .unwrap_or("other")
    }

    /// First `$?digits` token in the message, commas stripped. An
    /// unparseable first match (e.g. a lone comma) yields `None`.
    fn asset_value(&self, message: &str) -> Option<u64> {
        let captures = self.amount.captures(message)?;
        captures[1].replace(',', "").parse().ok()
    }

    fn risk_level(&self, message: &str) -> RiskLevel {
        if self.high_risk.is_match(message) {
            RiskLevel::High
        } else if self.low_risk.is_match(message) {
            RiskLevel::Low
        } else {
            RiskLevel::Medium
        }
    }

    fn coverage_period(&self, message: &str) -> u32 {
        self.period
            .captures(message)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(12)
    }

    fn network(&self, message: &str) -> Option<&'static str> {
        let lower = message.to_lowercase();
        NETWORKS.iter().copied().find(|n| lower.contains(n))
    }

    fn claim_type(&self, message: &str) -> &'static str {
        let lower = message.to_lowercase();
        CLAIM_TYPES
            .iter()
            .copied()
            .find(|t| lower.contains(t))
            .unwrap_or("other")
    }

    fn loss_amount(&self, message: &str) -> Option<u64> {
        let captures = self.loss.captures(message)?;
        captures[1].replace(',', "").parse().ok()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> IntentExtractor {
        IntentExtractor::new().unwrap()
    }

    #[test]
    fn quote_with_value_and_type() {
        let intent = extractor()
            .extract("Generate a quote for my NFT collection worth $5,000")
            .unwrap();
        assert_eq!(intent.name, "generate_insurance_quote");
        assert_eq!(intent.arguments["assetType"], "nft");
        assert_eq!(intent.arguments["assetValue"], 5000);
        assert_eq!(intent.arguments["riskLevel"], "medium");
        assert_eq!(intent.arguments["coveragePeriod"], 12);
    }

    #[test]
    fn quote_without_value_produces_nothing() {
        assert!(extractor().extract("I want a quote for my NFT").is_none());
    }

    #[test]
    fn quote_reads_risk_and_period() {
        let intent = extractor()
            .extract("Insurance for my risky DeFi position worth $20,000 for 6 months")
            .unwrap();
        assert_eq!(intent.arguments["assetType"], "defi");
        assert_eq!(intent.arguments["riskLevel"], "high");
        assert_eq!(intent.arguments["coveragePeriod"], 6);
    }

    #[test]
    fn quote_unknown_asset_type_falls_back_to_other() {
        let intent = extractor()
            .extract("Give me an insurance quote for $3,000")
            .unwrap();
        assert_eq!(intent.arguments["assetType"], "other");
    }

    #[test]
    fn safe_keyword_means_low_risk() {
        let intent = extractor()
            .extract("quote for a safe token worth $1000")
            .unwrap();
        assert_eq!(intent.arguments["riskLevel"], "low");
    }

    #[test]
    fn analyze_requires_full_address() {
        let ex = extractor();
        let intent = ex
            .extract("analyze contract 0x1234567890abcdef1234567890abcdef12345678")
            .unwrap();
        assert_eq!(intent.name, "analyze_smart_contract");
        assert_eq!(
            intent.arguments["contractAddress"],
            "0x1234567890abcdef1234567890abcdef12345678"
        );
        assert_eq!(intent.arguments["network"], "ethereum");

        assert!(ex.extract("analyze contract 0x1234").is_none());
    }

    #[test]
    fn analyze_picks_named_network() {
        let intent = extractor()
            .extract(
                "analyze 0x1234567890abcdef1234567890abcdef12345678 on Polygon please",
            )
            .unwrap();
        assert_eq!(intent.arguments["network"], "polygon");
    }

    #[test]
    fn claim_needs_loss_amount() {
        let ex = extractor();
        let intent = ex
            .extract("I need to file a claim, my wallet was hacked and I lost $2,500")
            .unwrap();
        assert_eq!(intent.name, "claim_processing");
        assert_eq!(intent.arguments["claimType"], "hack");
        assert_eq!(intent.arguments["lossAmount"], 2500);
        assert_eq!(
            intent.arguments["incidentDetails"],
            "I need to file a claim, my wallet was hacked and I lost $2,500"
        );

        assert!(ex.extract("I want to file a claim").is_none());
    }

    #[test]
    fn claim_type_falls_back_to_other() {
        let intent = extractor()
            .extract("claim: phishing site, lost $900")
            .unwrap();
        assert_eq!(intent.arguments["claimType"], "other");
    }

    #[test]
    fn quote_trigger_wins_over_claim() {
        // "insurance" matches before "claim" is considered.
        let intent = extractor()
            .extract("insurance claim for the hack lost $500")
            .unwrap();
        assert_eq!(intent.name, "generate_insurance_quote");
    }

    #[test]
    fn first_amount_token_is_authoritative() {
        // The first digits-or-commas run is a lone comma; extraction
        // does not scan further, so no invocation is produced.
        assert!(extractor().extract("Hello, quote me $5000 please").is_none());
    }

    #[test]
    fn unrelated_text_matches_nothing() {
        assert!(extractor().extract("hello there").is_none());
    }
}
