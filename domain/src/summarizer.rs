//! Summarization engine: prompt resolution, transcript budgeting, the
//! language-model call, and structured-output parsing with graceful
//! degradation.

use crate::error::{Error, InternalErrorKind, ValidationErrorKind};
use crate::prompt_catalog::PromptCatalog;
use crate::retry::Backoff;
use copilot_ai::traits::language_model;
use entity::meeting_type::MeetingType;
use log::*;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Outcome of one summarization run.
#[derive(Debug, Clone)]
pub struct SummaryResult {
    pub meeting_type: MeetingType,
    /// Free-text rendering of the summary. Never empty: when the model
    /// returns unparseable output, the raw text is preserved here.
    pub text: String,
    /// Structured rendering; `None` when the response did not parse.
    pub structured: Option<Map<String, Value>>,
    /// The transcript was cut down to fit the prompt budget.
    pub truncated: bool,
}

/// Tagged result of parsing a model response. The pipeline never assumes a
/// shape: structure is extracted when present, and raw text is kept
/// otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// The response carried a parseable JSON object.
    Structured(Map<String, Value>),
    /// The response was plain prose with no JSON in it.
    TextOnly(String),
    /// The response looked like JSON but failed to parse.
    ParseFailed(String),
}

/// Generates structured meeting summaries through a language model.
pub struct SummarizerEngine {
    llm: Arc<dyn language_model::Provider>,
    catalog: PromptCatalog,
    prompt_budget_chars: usize,
    backoff: Backoff,
}

impl SummarizerEngine {
    pub fn new(
        llm: Arc<dyn language_model::Provider>,
        catalog: PromptCatalog,
        prompt_budget_chars: usize,
        backoff: Backoff,
    ) -> Self {
        Self {
            llm,
            catalog,
            prompt_budget_chars,
            backoff,
        }
    }

    /// Produce a summary of `transcript` using the prompt registered for
    /// `meeting_type`.
    ///
    /// Transient provider failures are retried with bounded backoff;
    /// provider rejections surface to the caller. A response that fails
    /// structure extraction still yields a text-only result.
    pub async fn summarize(
        &self,
        transcript: &str,
        meeting_type: MeetingType,
    ) -> Result<SummaryResult, Error> {
        if transcript.trim().is_empty() {
            return Err(Error::validation(ValidationErrorKind::EmptyTranscript));
        }

        let template = self.catalog.get(&meeting_type).ok_or_else(|| {
            Error::internal(InternalErrorKind::Config(format!(
                "no prompt template registered for meeting type {meeting_type}"
            )))
        })?;

        let budget = self
            .prompt_budget_chars
            .saturating_sub(template.overhead_chars() + template.system.chars().count());
        let (prepared, truncated) = truncate_oldest_first(transcript, budget);
        if truncated {
            info!(
                "Transcript truncated to {} chars to fit the prompt budget for {meeting_type}",
                prepared.chars().count()
            );
        }

        let user_prompt = template.render_user(&prepared);
        let raw = self
            .backoff
            .retry("summarize", || {
                self.llm.complete(&template.system, &user_prompt)
            })
            .await?;

        // The free-text summary must never be empty; an empty completion is
        // a provider fault, not a degradable parse failure.
        if raw.trim().is_empty() {
            return Err(Error {
                source: None,
                error_kind: crate::error::DomainErrorKind::External(
                    crate::error::ExternalErrorKind::Provider(
                        "model returned an empty completion".to_string(),
                    ),
                ),
            });
        }

        let (text, structured) = match parse_structured(&raw) {
            ParsedResponse::Structured(map) => (raw, Some(map)),
            ParsedResponse::TextOnly(text) => (text, None),
            ParsedResponse::ParseFailed(raw_text) => {
                warn!("Summary response for {meeting_type} did not parse as JSON, storing text only");
                (raw_text, None)
            }
        };

        Ok(SummaryResult {
            meeting_type,
            text,
            structured,
            truncated,
        })
    }
}

/// Deterministically trim a transcript to `budget` characters by dropping
/// the oldest content first, keeping the most recent tail. Returns the
/// prepared text and whether anything was dropped.
pub(crate) fn truncate_oldest_first(transcript: &str, budget: usize) -> (String, bool) {
    let total = transcript.chars().count();
    if total <= budget {
        return (transcript.to_string(), false);
    }

    let tail: String = transcript
        .chars()
        .skip(total - budget)
        .collect();
    (tail, true)
}

/// Extract the structured form from a raw model response.
///
/// Accepts a fenced ```json block or a bare top-level object; anything else
/// is prose. Content that looks like JSON but fails to parse is reported as
/// such, never silently dropped.
pub fn parse_structured(raw: &str) -> ParsedResponse {
    let candidate = extract_json_candidate(raw);

    match candidate {
        Some(json_text) => match serde_json::from_str::<Value>(json_text) {
            Ok(Value::Object(map)) => ParsedResponse::Structured(map),
            Ok(_) | Err(_) => ParsedResponse::ParseFailed(raw.to_string()),
        },
        None => ParsedResponse::TextOnly(raw.to_string()),
    }
}

/// Locate the JSON-looking portion of a response, if any.
fn extract_json_candidate(raw: &str) -> Option<&str> {
    // Fenced block first: ```json ... ``` or plain ``` ... ```
    if let Some(fence_start) = raw.find("```") {
        let after_fence = &raw[fence_start + 3..];
        let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        if let Some(fence_end) = after_fence[body_start..].find("```") {
            let body = after_fence[body_start..body_start + fence_end].trim();
            if !body.is_empty() {
                return Some(body);
            }
        }
    }

    // Otherwise the span from the first '{' to the last '}'
    let open = raw.find('{')?;
    let close = raw.rfind('}')?;
    if close > open {
        Some(raw[open..=close].trim())
    } else {
        None
    }
}

/// Pull the `action_items` list out of a structured summary. String entries
/// are taken verbatim; object entries contribute their `content` field.
pub fn extract_action_items(structured: &Map<String, Value>) -> Vec<String> {
    let Some(Value::Array(items)) = structured.get("action_items") else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(text.trim().to_string()),
            Value::Object(obj) => obj
                .get("content")
                .and_then(Value::as_str)
                .map(|text| text.trim().to_string()),
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt_catalog::PromptCatalog;
    use async_trait::async_trait;
    use copilot_ai::Error as CapabilityError;
    use mockall::mock;
    use std::time::Duration;

    mock! {
        Llm {}

        #[async_trait]
        impl language_model::Provider for Llm {
            async fn complete(&self, system: &str, user: &str) -> Result<String, CapabilityError>;
            fn provider_id(&self) -> &str;
        }
    }

    fn engine_with(llm: MockLlm, budget: usize) -> SummarizerEngine {
        SummarizerEngine::new(
            Arc::new(llm),
            PromptCatalog::builtin(),
            budget,
            Backoff::new(3, Duration::from_millis(1), Duration::from_millis(2)),
        )
    }

    #[tokio::test]
    async fn structured_response_yields_structured_summary() {
        let mut llm = MockLlm::new();
        llm.expect_complete().returning(|_, _| {
            Ok(r#"{"key_decisions": [], "discussion_points": [], "risks": [],
                   "action_items": ["Draft rollout plan", "Send pricing page"]}"#
                .to_string())
        });

        let result = engine_with(llm, 100_000)
            .summarize("Alice: let's plan Q3.", MeetingType::WorkingMeeting)
            .await
            .unwrap();

        assert!(!result.text.is_empty());
        assert!(!result.truncated);
        let structured = result.structured.unwrap();
        assert_eq!(
            extract_action_items(&structured),
            vec!["Draft rollout plan", "Send pricing page"]
        );
    }

    #[tokio::test]
    async fn prose_response_degrades_to_text_only() {
        let mut llm = MockLlm::new();
        llm.expect_complete()
            .returning(|_, _| Ok("The team discussed the Q3 roadmap at length.".to_string()));

        let result = engine_with(llm, 100_000)
            .summarize("Alice: roadmap talk.", MeetingType::Traction)
            .await
            .unwrap();

        assert_eq!(result.text, "The team discussed the Q3 roadmap at length.");
        assert!(result.structured.is_none());
    }

    #[tokio::test]
    async fn malformed_json_keeps_the_raw_text() {
        let mut llm = MockLlm::new();
        llm.expect_complete()
            .returning(|_, _| Ok(r#"{"action_items": ["unterminated"#.to_string()));

        let result = engine_with(llm, 100_000)
            .summarize("Bob: quick sync.", MeetingType::Intro)
            .await
            .unwrap();

        assert!(result.structured.is_none());
        assert!(result.text.contains("unterminated"));
    }

    #[tokio::test]
    async fn empty_transcript_is_rejected_without_calling_the_model() {
        let mut llm = MockLlm::new();
        llm.expect_complete().times(0);

        let err = engine_with(llm, 100_000)
            .summarize("   ", MeetingType::Diagnostics)
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            crate::error::DomainErrorKind::Validation(ValidationErrorKind::EmptyTranscript)
        );
    }

    #[tokio::test]
    async fn empty_completion_is_a_provider_error() {
        let mut llm = MockLlm::new();
        llm.expect_complete().returning(|_, _| Ok("   ".to_string()));

        let err = engine_with(llm, 100_000)
            .summarize("Bob: hi.", MeetingType::Intro)
            .await
            .unwrap_err();

        assert!(matches!(
            err.error_kind,
            crate::error::DomainErrorKind::External(_)
        ));
    }

    #[tokio::test]
    async fn transient_failures_are_retried_then_succeed() {
        let mut llm = MockLlm::new();
        let mut calls = 0u32;
        llm.expect_complete().returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Err(CapabilityError::Network("blip".to_string()))
            } else {
                Ok(r#"{"action_items": []}"#.to_string())
            }
        });

        let result = engine_with(llm, 100_000)
            .summarize("Bob: retry me.", MeetingType::WorkingMeeting)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn oversized_transcript_is_truncated_and_flagged() {
        let mut llm = MockLlm::new();
        llm.expect_complete()
            .withf(|_, user| !user.contains("OLDEST") && user.contains("NEWEST"))
            .returning(|_, _| Ok(r#"{"action_items": []}"#.to_string()));

        let transcript = format!("OLDEST {} NEWEST", "x".repeat(5000));
        let result = engine_with(llm, 3000)
            .summarize(&transcript, MeetingType::WorkingMeeting)
            .await
            .unwrap();

        assert!(result.truncated);
    }

    #[test]
    fn truncate_oldest_first_keeps_the_tail() {
        let (kept, truncated) = truncate_oldest_first("abcdefghij", 4);
        assert_eq!(kept, "ghij");
        assert!(truncated);

        let (kept, truncated) = truncate_oldest_first("short", 10);
        assert_eq!(kept, "short");
        assert!(!truncated);
    }

    #[test]
    fn parse_structured_handles_fenced_blocks() {
        let raw = "Here you go:\n```json\n{\"action_items\": [\"a\"]}\n```";
        match parse_structured(raw) {
            ParsedResponse::Structured(map) => {
                assert!(map.contains_key("action_items"));
            }
            other => panic!("expected structured, got {other:?}"),
        }
    }

    #[test]
    fn parse_structured_classifies_prose_as_text_only() {
        assert_eq!(
            parse_structured("No structure here at all."),
            ParsedResponse::TextOnly("No structure here at all.".to_string())
        );
    }

    #[test]
    fn extract_action_items_accepts_strings_and_objects() {
        let structured: Map<String, Value> = serde_json::from_str(
            r#"{"action_items": ["Send invoice", {"content": "Book follow-up"}, 7, "  "]}"#,
        )
        .map(|v: Value| v.as_object().unwrap().clone())
        .unwrap();

        assert_eq!(
            extract_action_items(&structured),
            vec!["Send invoice", "Book follow-up"]
        );
    }
}
