//! Argument normalization and tool dispatch.
//!
//! The HTTP action endpoint and the assistant engine both funnel tool
//! calls through here: camelCase keys from callers become the snake_case
//! names the tool schemas declare, null values are dropped, and required
//! fields are checked before anything goes over the wire.

use serde_json::{Map, Value};

use aegis_domain::insurance::{TOOL_ANALYZE, TOOL_CLAIM, TOOL_QUOTE};
use aegis_domain::{Error, Result};
use aegis_mcp::{McpManager, ToolOutput};

/// Convert a camelCase key to snake_case (`assetValue` -> `asset_value`).
pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Snake-case all object keys and drop null-valued entries.
/// Non-object input normalizes to an empty map.
pub fn normalize_args(args: &Value) -> Map<String, Value> {
    let mut normalized = Map::new();
    if let Value::Object(map) = args {
        for (key, value) in map {
            if !value.is_null() {
                normalized.insert(to_snake_case(key), value.clone());
            }
        }
    }
    normalized
}

/// Required argument names per tool. Unknown tools have no requirements;
/// the tool server rejects them itself.
pub fn required_fields(tool: &str) -> &'static [&'static str] {
    match tool {
        TOOL_QUOTE => &["asset_type", "asset_value", "risk_level", "coverage_period"],
        TOOL_ANALYZE => &["contract_address", "network"],
        TOOL_CLAIM => &["claim_type", "incident_details", "loss_amount"],
        _ => &[],
    }
}

/// Check that every required field is present and non-null. Returns the
/// missing field names on failure.
pub fn validate_args(
    tool: &str,
    args: &Map<String, Value>,
) -> std::result::Result<(), Vec<String>> {
    let missing: Vec<String> = required_fields(tool)
        .iter()
        .filter(|key| matches!(args.get(**key), None | Some(Value::Null)))
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Normalize, validate, invoke, and classify the result.
pub async fn dispatch(manager: &McpManager, tool: &str, raw_args: &Value) -> Result<ToolOutput> {
    let args = normalize_args(raw_args);
    if let Err(missing) = validate_args(tool, &args) {
        return Err(Error::InvalidArgs {
            tool: tool.to_string(),
            missing,
        });
    }

    let result = manager.call_tool(tool, Value::Object(args)).await?;
    Ok(ToolOutput::from_value(result))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
