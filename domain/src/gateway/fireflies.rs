//! Fireflies.ai API client for transcript retrieval.
//!
//! Fireflies exposes a GraphQL API; the webhook only announces that a
//! transcript is ready, so the full text is always fetched here by the
//! provider's meeting id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use copilot_ai::traits::transcript::Provider;
use copilot_ai::types::transcript::{Sentence, Transcript};
use copilot_ai::Error;
use log::*;
use serde::{Deserialize, Serialize};

/// GraphQL query fetching a complete transcript with attributed sentences.
const TRANSCRIPT_QUERY: &str = r#"query GetTranscript($id: String!) {
    transcript(id: $id) {
        id
        title
        date
        sentences {
            speaker_name
            text
        }
    }
}"#;

#[derive(Debug, Serialize)]
struct GraphQlRequest {
    query: &'static str,
    variables: TranscriptVariables,
}

#[derive(Debug, Serialize)]
struct TranscriptVariables {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<TranscriptData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptData {
    transcript: Option<TranscriptPayload>,
}

#[derive(Debug, Deserialize)]
struct TranscriptPayload {
    id: String,
    #[serde(default)]
    title: Option<String>,
    /// Epoch milliseconds as reported by Fireflies
    #[serde(default)]
    date: Option<i64>,
    #[serde(default)]
    sentences: Option<Vec<SentencePayload>>,
}

#[derive(Debug, Deserialize)]
struct SentencePayload {
    #[serde(default)]
    speaker_name: Option<String>,
    text: String,
}

impl TranscriptPayload {
    fn into_transcript(self) -> Transcript {
        Transcript {
            external_id: self.id,
            title: self.title.unwrap_or_else(|| "Untitled Meeting".to_string()),
            date: self
                .date
                .and_then(|millis| DateTime::<Utc>::from_timestamp_millis(millis)),
            sentences: self
                .sentences
                .unwrap_or_default()
                .into_iter()
                .map(|s| Sentence {
                    speaker: s.speaker_name,
                    text: s.text,
                })
                .collect(),
        }
    }
}

/// Fireflies GraphQL API client
pub struct FirefliesClient {
    client: reqwest::Client,
    base_url: String,
}

impl FirefliesClient {
    /// Create a new Fireflies client with the given API key and base URL
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, Error> {
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
        })
    }

    async fn get_transcript(&self, meeting_id: &str) -> Result<Transcript, Error> {
        debug!("Fetching Fireflies transcript: {meeting_id}");

        let request = GraphQlRequest {
            query: TRANSCRIPT_QUERY,
            variables: TranscriptVariables {
                id: meeting_id.to_string(),
            },
        };

        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Fireflies: {:?}", e);
                Error::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Fireflies API: {status} {body}");
            return Err(error_for_status(status, body));
        }

        let parsed: GraphQlResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Fireflies response: {:?}", e);
            Error::Deserialization("Invalid response from Fireflies".to_string())
        })?;

        if let Some(errors) = parsed.errors {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            error!("Fireflies GraphQL: {message}");
            return Err(Error::Provider(message));
        }

        let payload = parsed
            .data
            .and_then(|d| d.transcript)
            .ok_or_else(|| Error::NotFound(format!("transcript {meeting_id} not found")))?;

        Ok(payload.into_transcript())
    }
}

/// Map an HTTP error status to the capability error taxonomy.
fn error_for_status(status: reqwest::StatusCode, body: String) -> Error {
    match status.as_u16() {
        401 | 403 => Error::Authentication(body),
        404 => Error::NotFound(body),
        429 => Error::RateLimited {
            retry_after_seconds: 60,
        },
        500..=599 => Error::Network(format!("Fireflies returned {status}: {body}")),
        _ => Error::Provider(format!("Fireflies returned {status}: {body}")),
    }
}

#[async_trait]
impl Provider for FirefliesClient {
    async fn fetch_transcript(&self, external_id: &str) -> Result<Transcript, Error> {
        self.get_transcript(external_id).await
    }

    fn provider_id(&self) -> &str {
        "fireflies"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_payload_converts_to_capability_transcript() {
        let json = r#"{
            "data": {
                "transcript": {
                    "id": "ff-123",
                    "title": "Q3 roadmap",
                    "date": 1767225600000,
                    "sentences": [
                        {"speaker_name": "Alice", "text": "Discussed Q3 roadmap."},
                        {"speaker_name": null, "text": "Agreed."}
                    ]
                }
            }
        }"#;

        let parsed: GraphQlResponse = serde_json::from_str(json).unwrap();
        let transcript = parsed
            .data
            .unwrap()
            .transcript
            .unwrap()
            .into_transcript();

        assert_eq!(transcript.external_id, "ff-123");
        assert_eq!(transcript.title, "Q3 roadmap");
        assert!(transcript.date.is_some());
        assert_eq!(
            transcript.to_plain_text(),
            "Alice: Discussed Q3 roadmap.\nUnknown: Agreed."
        );
    }

    #[test]
    fn null_transcript_means_not_found() {
        let json = r#"{"data": {"transcript": null}}"#;
        let parsed: GraphQlResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.data.unwrap().transcript.is_none());
    }

    #[test]
    fn missing_title_falls_back_to_untitled() {
        let payload = TranscriptPayload {
            id: "ff-9".to_string(),
            title: None,
            date: None,
            sentences: None,
        };
        assert_eq!(payload.into_transcript().title, "Untitled Meeting");
    }

    #[test]
    fn status_codes_map_to_error_kinds() {
        use reqwest::StatusCode;

        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, String::new()),
            Error::Authentication(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            Error::RateLimited { .. }
        ));
        assert!(
            error_for_status(StatusCode::BAD_GATEWAY, String::new()).is_transient(),
            "5xx should be retryable"
        );
        assert!(!error_for_status(StatusCode::BAD_REQUEST, String::new()).is_transient());
    }
}
