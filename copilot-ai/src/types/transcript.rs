//! Types for transcript retrieval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A complete meeting transcript as delivered by a transcript source.
///
/// Sentences are ordered as spoken. The `external_id` is the source
/// provider's own identifier and is the key for webhook deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub external_id: String,
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub sentences: Vec<Sentence>,
}

/// A single attributed utterance within a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    pub speaker: Option<String>,
    pub text: String,
}

impl Transcript {
    /// Render the transcript as speaker-attributed plain text, one utterance
    /// per line. Unattributed sentences get the "Unknown" speaker label.
    pub fn to_plain_text(&self) -> String {
        self.sentences
            .iter()
            .map(|sentence| {
                format!(
                    "{}: {}",
                    sentence.speaker.as_deref().unwrap_or("Unknown"),
                    sentence.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_plain_text_attributes_speakers_per_line() {
        let transcript = Transcript {
            external_id: "ff-123".to_string(),
            title: "Q3 planning".to_string(),
            date: None,
            sentences: vec![
                Sentence {
                    speaker: Some("Alice".to_string()),
                    text: "Discussed Q3 roadmap.".to_string(),
                },
                Sentence {
                    speaker: None,
                    text: "Agreed.".to_string(),
                },
            ],
        };

        assert_eq!(
            transcript.to_plain_text(),
            "Alice: Discussed Q3 roadmap.\nUnknown: Agreed."
        );
    }

    #[test]
    fn to_plain_text_is_empty_for_no_sentences() {
        let transcript = Transcript {
            external_id: "ff-124".to_string(),
            title: "Empty".to_string(),
            date: None,
            sentences: vec![],
        };
        assert_eq!(transcript.to_plain_text(), "");
    }
}
