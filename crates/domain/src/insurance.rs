//! Insurance vocabulary shared by the gateway and the tool server.

use serde::{Deserialize, Serialize};

// ── Tool names ──────────────────────────────────────────────────────

pub const TOOL_QUOTE: &str = "generate_insurance_quote";
pub const TOOL_ANALYZE: &str = "analyze_smart_contract";
pub const TOOL_CLAIM: &str = "claim_processing";

/// Networks the analyzer recognizes in free text. The first one named
/// in a message wins; `ethereum` is the fallback.
pub const NETWORKS: &[&str] = &["ethereum", "polygon", "bsc", "avalanche"];

/// Claim categories the claim tool accepts from free text.
pub const CLAIM_TYPES: &[&str] = &["hack", "exploit", "rug pull", "smart contract bug"];

// ── Risk level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    /// Premium multiplier applied on top of the tier base price.
    pub fn premium_multiplier(self) -> f64 {
        match self {
            RiskLevel::High => 1.5,
            RiskLevel::Low => 0.9,
            RiskLevel::Medium => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(crate::Error::Other(format!("unknown risk level: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"high\"");
        let parsed: RiskLevel = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, RiskLevel::Low);
    }

    #[test]
    fn multipliers() {
        assert_eq!(RiskLevel::High.premium_multiplier(), 1.5);
        assert_eq!(RiskLevel::Low.premium_multiplier(), 0.9);
        assert_eq!(RiskLevel::Medium.premium_multiplier(), 1.0);
    }

    #[test]
    fn default_is_medium() {
        assert_eq!(RiskLevel::default(), RiskLevel::Medium);
    }
}
