//! Prompt catalog: the mapping from meeting type to summarization prompts.
//!
//! The catalog is immutable, process-wide configuration built once at
//! startup. Every template's user prompt carries a `{transcript}`
//! placeholder the engine substitutes before calling the language model.

use entity::meeting_type::MeetingType;
use std::collections::HashMap;

/// Placeholder substituted with the (possibly truncated) transcript text.
pub const TRANSCRIPT_PLACEHOLDER: &str = "{transcript}";

const SUMMARY_SYSTEM_PROMPT: &str = "You are an assistant for a business consultant. You summarize \
meeting transcripts into concise, factual notes. Use only information present in the transcript. \
Do not invent names, numbers or commitments. Return ONLY valid JSON, no markdown or explanation.";

const WORKING_MEETING_USER_PROMPT: &str = r#"Summarize this internal working meeting.

Return a JSON object with exactly this structure:
{
  "key_decisions": ["Decision 1"],
  "discussion_points": ["Point 1"],
  "risks": ["Risk 1"],
  "action_items": ["Action item 1", "Action item 2"]
}

Guidelines:
- Keep each item to 1-2 concise sentences
- Phrase action_items as concrete next steps with an owner when one was named
- Include 1-7 items per section (empty array if nothing applies)

Transcript:

{transcript}"#;

const DIAGNOSTICS_USER_PROMPT: &str = r#"Summarize this diagnostic session with a client.

Return a JSON object with exactly this structure:
{
  "current_situation": ["Observation 1"],
  "pain_points": ["Pain point 1"],
  "goals": ["Goal 1"],
  "opportunities": ["Opportunity 1"],
  "action_items": ["Action item 1"]
}

Guidelines:
- current_situation captures how the client's business operates today
- pain_points are problems stated by the client, in their own framing
- Keep each item to 1-2 concise sentences (empty array if nothing applies)

Transcript:

{transcript}"#;

const TRACTION_USER_PROMPT: &str = r#"Summarize this recurring traction review call with a client.

Return a JSON object with exactly this structure:
{
  "progress_since_last": ["Progress item 1"],
  "metrics": ["Metric with its value"],
  "blockers": ["Blocker 1"],
  "next_steps": ["Next step 1"],
  "action_items": ["Action item 1"]
}

Guidelines:
- Quote concrete numbers in metrics exactly as stated
- Separate blockers (outside the client's control) from next_steps
- Keep each item to 1-2 concise sentences (empty array if nothing applies)

Transcript:

{transcript}"#;

const INTRO_USER_PROMPT: &str = r#"Summarize this introductory call with a prospect.

Return a JSON object with exactly this structure:
{
  "participant_background": ["Background item 1"],
  "needs": ["Stated need 1"],
  "fit_assessment": ["Fit observation 1"],
  "next_steps": ["Next step 1"],
  "action_items": ["Action item 1"]
}

Guidelines:
- participant_background covers who the prospect is and what they do
- fit_assessment is strictly what the transcript supports, no speculation
- Keep each item to 1-2 concise sentences (empty array if nothing applies)

Transcript:

{transcript}"#;

/// A (system instruction, user template) pair for one meeting type.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub system: String,
    pub user_template: String,
}

impl PromptTemplate {
    /// Substitute the transcript into the user template.
    pub fn render_user(&self, transcript: &str) -> String {
        self.user_template.replace(TRANSCRIPT_PLACEHOLDER, transcript)
    }

    /// Characters the rendered user prompt occupies beyond the transcript
    /// itself. Used to compute the transcript budget.
    pub fn overhead_chars(&self) -> usize {
        self.user_template
            .replace(TRANSCRIPT_PLACEHOLDER, "")
            .chars()
            .count()
    }
}

/// Immutable lookup from meeting type to its prompt pair.
pub struct PromptCatalog {
    templates: HashMap<MeetingType, PromptTemplate>,
}

impl PromptCatalog {
    /// The compiled-in catalog covering every known meeting type.
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        for (meeting_type, user_template) in [
            (MeetingType::WorkingMeeting, WORKING_MEETING_USER_PROMPT),
            (MeetingType::Diagnostics, DIAGNOSTICS_USER_PROMPT),
            (MeetingType::Traction, TRACTION_USER_PROMPT),
            (MeetingType::Intro, INTRO_USER_PROMPT),
        ] {
            templates.insert(
                meeting_type,
                PromptTemplate {
                    system: SUMMARY_SYSTEM_PROMPT.to_string(),
                    user_template: user_template.to_string(),
                },
            );
        }
        Self { templates }
    }

    pub fn get(&self, meeting_type: &MeetingType) -> Option<&PromptTemplate> {
        self.templates.get(meeting_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn builtin_catalog_covers_every_meeting_type() {
        let catalog = PromptCatalog::builtin();
        for meeting_type in MeetingType::iter() {
            let template = catalog
                .get(&meeting_type)
                .unwrap_or_else(|| panic!("missing template for {meeting_type}"));
            assert!(
                template.user_template.contains(TRANSCRIPT_PLACEHOLDER),
                "{meeting_type} template lacks transcript placeholder"
            );
            assert!(template.user_template.contains("action_items"));
            assert!(!template.system.is_empty());
        }
    }

    #[test]
    fn render_user_substitutes_the_transcript() {
        let catalog = PromptCatalog::builtin();
        let template = catalog.get(&MeetingType::WorkingMeeting).unwrap();
        let rendered = template.render_user("Alice: ship it on Friday.");

        assert!(rendered.contains("Alice: ship it on Friday."));
        assert!(!rendered.contains(TRANSCRIPT_PLACEHOLDER));
    }

    #[test]
    fn overhead_chars_excludes_the_placeholder() {
        let template = PromptTemplate {
            system: "s".to_string(),
            user_template: "before {transcript} after".to_string(),
        };
        assert_eq!(template.overhead_chars(), "before  after".chars().count());
    }
}
