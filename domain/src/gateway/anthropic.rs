//! Anthropic Messages API client: the language-model capability behind
//! summarization and retrieval-augmented answers.

use async_trait::async_trait;
use copilot_ai::traits::language_model::Provider;
use copilot_ai::Error;
use log::*;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

/// Anthropic API client
pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    /// Create a new Anthropic client with the given API key and base URL
    pub fn new(api_key: &str, base_url: &str, model: &str, max_tokens: u32) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let mut key_value = reqwest::header::HeaderValue::from_str(api_key).map_err(|e| {
            warn!("Failed to create auth header: {:?}", e);
            Error::Configuration("Invalid API key format".to_string())
        })?;
        key_value.set_sensitive(true);
        headers.insert("x-api-key", key_value);
        headers.insert(
            "anthropic-version",
            reqwest::header::HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            model: model.to_string(),
            max_tokens,
        })
    }

    async fn create_message(&self, system: &str, user: &str) -> Result<String, Error> {
        let url = format!("{}/v1/messages", self.base_url);

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: vec![Message {
                role: "user",
                content: user,
            }],
        };

        debug!("Requesting completion from model {}", self.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Anthropic: {:?}", e);
                Error::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = retry_after_seconds(response.headers());
            let body = response.text().await.unwrap_or_default();
            error!("Anthropic API: {status} {body}");
            return Err(error_for_status(status, body, retry_after));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Anthropic response: {:?}", e);
            Error::Deserialization("Invalid response from Anthropic".to_string())
        })?;

        parsed
            .content
            .into_iter()
            .find(|block| block.block_type == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| {
                Error::Deserialization("Anthropic response contained no text block".to_string())
            })
    }
}

fn retry_after_seconds(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(60)
}

/// Map an HTTP error status to the capability error taxonomy. The body is
/// parsed for Anthropic's structured error detail when present.
fn error_for_status(status: reqwest::StatusCode, body: String, retry_after: u64) -> Error {
    let detail = serde_json::from_str::<ApiErrorResponse>(&body)
        .ok()
        .and_then(|r| r.error)
        .map(|e| format!("{}: {}", e.error_type, e.message))
        .unwrap_or(body);

    match status.as_u16() {
        401 | 403 => Error::Authentication(detail),
        429 => Error::RateLimited {
            retry_after_seconds: retry_after,
        },
        // 529 is Anthropic's "overloaded" answer; treat like any other
        // transient server-side failure
        500..=599 => Error::Network(format!("Anthropic returned {status}: {detail}")),
        _ => Error::Provider(format!("Anthropic returned {status}: {detail}")),
    }
}

#[async_trait]
impl Provider for AnthropicClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, Error> {
        self.create_message(system, user).await
    }

    fn provider_id(&self) -> &str {
        "anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_system_and_user_message() {
        let request = MessagesRequest {
            model: "claude-sonnet-4-20250514",
            max_tokens: 4096,
            system: "You are terse.",
            messages: vec![Message {
                role: "user",
                content: "Summarize this.",
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-sonnet-4-20250514");
        assert_eq!(json["system"], "You are terse.");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Summarize this.");
    }

    #[test]
    fn response_text_is_taken_from_the_first_text_block() {
        let json = r#"{
            "content": [
                {"type": "thinking", "text": null},
                {"type": "text", "text": "{\"action_items\": []}"}
            ]
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(json).unwrap();
        let text = parsed
            .content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text)
            .unwrap();
        assert_eq!(text, "{\"action_items\": []}");
    }

    #[test]
    fn overload_and_rate_limit_are_transient() {
        use reqwest::StatusCode;

        assert!(error_for_status(StatusCode::from_u16(529).unwrap(), String::new(), 60)
            .is_transient());
        assert!(matches!(
            error_for_status(StatusCode::TOO_MANY_REQUESTS, String::new(), 30),
            Error::RateLimited {
                retry_after_seconds: 30
            }
        ));
    }

    #[test]
    fn bad_request_is_a_provider_rejection() {
        use reqwest::StatusCode;

        let body = r#"{"error": {"type": "invalid_request_error", "message": "too long"}}"#;
        let err = error_for_status(StatusCode::BAD_REQUEST, body.to_string(), 60);
        match err {
            Error::Provider(detail) => assert!(detail.contains("too long")),
            other => panic!("expected provider rejection, got {other:?}"),
        }
    }
}
