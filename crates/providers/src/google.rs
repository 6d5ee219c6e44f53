//! Google Gemini adapter.
//!
//! Implements the Gemini `generateContent` API. Auth is via an API key
//! passed as a query parameter (`key={api_key}`).

use serde_json::Value;

use crate::traits::{CompletionRequest, LlmProvider};
use crate::util::from_reqwest;
use aegis_domain::config::ProviderConfig;
use aegis_domain::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An LLM provider adapter for the Google Gemini API.
#[derive(Debug)]
pub struct GoogleProvider {
    base_url: String,
    api_key: String,
    default_model: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    /// Create a new provider from the deserialized provider config.
    ///
    /// The API key is read from the env var named by `api_key_env`;
    /// a missing or empty value is a config error.
    pub fn from_config(cfg: &ProviderConfig) -> Result<Self> {
        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "API key env var {} is not set",
                    cfg.api_key_env
                ))
            })?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
            default_model: cfg.model.clone(),
            client,
        })
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }
}

fn build_body(req: &CompletionRequest) -> Value {
    let mut body = serde_json::json!({
        "contents": [{
            "parts": [{ "text": req.prompt }]
        }],
    });

    // Generation config.
    let mut gen_config = serde_json::json!({});
    if let Some(temp) = req.temperature {
        gen_config["temperature"] = serde_json::json!(temp);
    }
    if let Some(max) = req.max_tokens {
        gen_config["maxOutputTokens"] = serde_json::json!(max);
    }
    if gen_config.as_object().is_some_and(|o| !o.is_empty()) {
        body["generationConfig"] = gen_config;
    }

    body
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response deserialization
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn parse_gemini_response(body: &Value) -> Result<String> {
    let candidate = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| Error::Provider {
            provider: "google".into(),
            message: "no candidates in response".into(),
        })?;

    let parts = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array());

    let mut text_content = String::new();
    if let Some(parts) = parts {
        for part in parts {
            if let Some(text) = part.get("text").and_then(|v| v.as_str()) {
                text_content.push_str(text);
            }
        }
    }

    if text_content.is_empty() {
        return Err(Error::Provider {
            provider: "google".into(),
            message: "empty completion in response".into(),
        });
    }

    Ok(text_content)
}

/// Redact API key from URL for safe logging.
fn redact_url_key(url: &str) -> String {
    if let Some(idx) = url.find("key=") {
        let prefix = &url[..idx + 4];
        let rest = &url[idx + 4..];
        let end = rest.find('&').unwrap_or(rest.len());
        format!("{prefix}[REDACTED]{}", &rest[end..])
    } else {
        url.to_string()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl LlmProvider for GoogleProvider {
    async fn complete(&self, req: CompletionRequest) -> Result<String> {
        let model = req
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());
        let url = self.generate_url(&model);
        let body = build_body(&req);

        tracing::debug!(model = %model, url = %redact_url_key(&url), "google completion request");

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            return Err(Error::Provider {
                provider: "google".into(),
                message: format!("HTTP {} - {}", status.as_u16(), resp_text),
            });
        }

        let resp_json: Value = serde_json::from_str(&resp_text)?;
        parse_gemini_response(&resp_json)
    }

    fn provider_id(&self) -> &str {
        "google"
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_removes_key_at_end() {
        let url = "https://example.com/v1beta/models/gemini:generateContent?key=SECRET";
        assert_eq!(
            redact_url_key(url),
            "https://example.com/v1beta/models/gemini:generateContent?key=[REDACTED]"
        );
    }

    #[test]
    fn redact_preserves_following_params() {
        let url = "https://example.com/path?key=SECRET&alt=sse";
        assert_eq!(redact_url_key(url), "https://example.com/path?key=[REDACTED]&alt=sse");
    }

    #[test]
    fn redact_passes_through_without_key() {
        let url = "https://example.com/path?alt=sse";
        assert_eq!(redact_url_key(url), url);
    }

    #[test]
    fn build_body_minimal() {
        let body = build_body(&CompletionRequest::new("hello"));
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn build_body_with_generation_config() {
        let req = CompletionRequest {
            prompt: "hello".into(),
            temperature: Some(0.7),
            max_tokens: Some(512),
            model: None,
        };
        let body = build_body(&req);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 512);
    }

    #[test]
    fn parse_response_joins_parts() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "Hello " }, { "text": "world" }]
                }
            }]
        });
        assert_eq!(parse_gemini_response(&body).unwrap(), "Hello world");
    }

    #[test]
    fn parse_response_without_candidates_errors() {
        let body = serde_json::json!({ "promptFeedback": {} });
        let err = parse_gemini_response(&body).unwrap_err();
        assert!(matches!(err, Error::Provider { .. }));
    }

    #[test]
    fn parse_response_with_empty_parts_errors() {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [] } }]
        });
        assert!(parse_gemini_response(&body).is_err());
    }

    #[test]
    fn from_config_requires_api_key() {
        let cfg = ProviderConfig {
            api_key_env: "AEGIS_TEST_KEY_THAT_DOES_NOT_EXIST".into(),
            ..Default::default()
        };
        let err = GoogleProvider::from_config(&cfg).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        std::env::set_var("AEGIS_TEST_GOOGLE_KEY", "k");
        let cfg = ProviderConfig {
            api_key_env: "AEGIS_TEST_GOOGLE_KEY".into(),
            base_url: "https://example.com/".into(),
            ..Default::default()
        };
        let provider = GoogleProvider::from_config(&cfg).unwrap();
        assert_eq!(
            provider.generate_url("gemini-2.0-flash-exp"),
            "https://example.com/v1beta/models/gemini-2.0-flash-exp:generateContent?key=k"
        );
    }
}
