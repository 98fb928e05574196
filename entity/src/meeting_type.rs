use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Classification tag selecting which prompt the summarization engine uses.
///
/// Selected by a human after the transcript arrives, never inferred. The
/// string values double as the wire format accepted by the type-selection
/// endpoint; anything else is rejected as an unknown meeting type.
#[derive(
    Debug, Clone, Hash, Eq, PartialEq, EnumIter, Deserialize, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "meeting_type")]
pub enum MeetingType {
    /// Internal working session with the team
    #[sea_orm(string_value = "working_meeting")]
    WorkingMeeting,
    /// First deep-dive meeting with a client
    #[sea_orm(string_value = "diagnostics")]
    Diagnostics,
    /// Recurring traction review call
    #[sea_orm(string_value = "traction")]
    Traction,
    /// Introductory call with a prospect
    #[sea_orm(string_value = "intro")]
    Intro,
}

impl MeetingType {
    /// Parse a wire tag into a meeting type. Returns `None` for unknown tags
    /// so the caller can reject them without touching meeting state.
    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag {
            "working_meeting" => Some(MeetingType::WorkingMeeting),
            "diagnostics" => Some(MeetingType::Diagnostics),
            "traction" => Some(MeetingType::Traction),
            "intro" => Some(MeetingType::Intro),
            _ => None,
        }
    }
}

impl std::fmt::Display for MeetingType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetingType::WorkingMeeting => write!(fmt, "working_meeting"),
            MeetingType::Diagnostics => write!(fmt, "diagnostics"),
            MeetingType::Traction => write!(fmt, "traction"),
            MeetingType::Intro => write!(fmt, "intro"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tag_accepts_every_known_tag() {
        for tag in ["working_meeting", "diagnostics", "traction", "intro"] {
            let parsed = MeetingType::parse_tag(tag).unwrap();
            assert_eq!(parsed.to_string(), tag);
        }
    }

    #[test]
    fn parse_tag_rejects_unknown_tags() {
        assert!(MeetingType::parse_tag("unknown_type").is_none());
        assert!(MeetingType::parse_tag("").is_none());
        assert!(MeetingType::parse_tag("Working_Meeting").is_none());
    }
}
