//! OpenAI embeddings client: the embedding capability behind indexing and
//! retrieval. Indexing and query embedding share this client, so the
//! corpus-wide dimension invariant holds by construction.

use async_trait::async_trait;
use copilot_ai::traits::embedding::Provider;
use copilot_ai::Error;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI embeddings API client
pub struct OpenAiEmbeddingsClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbeddingsClient {
    /// Create a new embeddings client with the given API key and base URL
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: &str,
        dimension: usize,
    ) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let mut header_value =
            reqwest::header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                warn!("Failed to create auth header: {:?}", e);
                Error::Configuration("Invalid API key format".to_string())
            })?;
        header_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            model: model.to_string(),
            dimension,
        })
    }

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, Error> {
        let url = format!("{}/v1/embeddings", self.base_url);

        let request = EmbeddingsRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach OpenAI: {:?}", e);
                Error::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("OpenAI API: {status} {body}");
            return Err(error_for_status(status, body));
        }

        let parsed: EmbeddingsResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse OpenAI response: {:?}", e);
            Error::Deserialization("Invalid response from OpenAI".to_string())
        })?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                Error::Deserialization("OpenAI response contained no embedding".to_string())
            })
    }
}

/// Map an HTTP error status to the capability error taxonomy.
fn error_for_status(status: reqwest::StatusCode, body: String) -> Error {
    match status.as_u16() {
        401 | 403 => Error::Authentication(body),
        429 => Error::RateLimited {
            retry_after_seconds: 60,
        },
        500..=599 => Error::Network(format!("OpenAI returned {status}: {body}")),
        _ => Error::Provider(format!("OpenAI returned {status}: {body}")),
    }
}

#[async_trait]
impl Provider for OpenAiEmbeddingsClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, Error> {
        self.embed_text(text).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn provider_id(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_model_and_input() {
        let request = EmbeddingsRequest {
            model: "text-embedding-ada-002",
            input: "What did we decide about pricing?",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "text-embedding-ada-002");
        assert_eq!(json["input"], "What did we decide about pricing?");
    }

    #[test]
    fn response_parses_the_embedding_vector() {
        let json = r#"{"data": [{"embedding": [0.1, -0.2, 0.3], "index": 0}]}"#;
        let parsed: EmbeddingsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data[0].embedding, vec![0.1, -0.2, 0.3]);
    }

    #[test]
    fn rate_limits_are_transient_and_auth_failures_are_not() {
        use reqwest::StatusCode;

        assert!(error_for_status(StatusCode::TOO_MANY_REQUESTS, String::new()).is_transient());
        assert!(!error_for_status(StatusCode::UNAUTHORIZED, String::new()).is_transient());
    }
}
