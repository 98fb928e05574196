use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle state of a meeting as it moves through the ingestion pipeline.
///
/// The status column is the durable state machine record: the wait for a
/// human type selection is simply a row parked in `TypePending`, so it
/// survives process restarts. `Failed` is terminal but re-enterable: a new
/// type selection restarts summarization.
#[derive(
    Debug, Clone, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "meeting_status")]
pub enum MeetingStatus {
    /// Webhook received, transcript not yet fetched
    #[sea_orm(string_value = "received")]
    #[default]
    Received,
    /// Transcript fetched and persisted
    #[sea_orm(string_value = "transcribed")]
    Transcribed,
    /// Waiting for a human to select the meeting type
    #[sea_orm(string_value = "type_pending")]
    TypePending,
    /// Summarization in progress
    #[sea_orm(string_value = "summarizing")]
    Summarizing,
    /// Summary persisted
    #[sea_orm(string_value = "summarized")]
    Summarized,
    /// Action items handed to the task tracker
    #[sea_orm(string_value = "tasks_dispatched")]
    TasksDispatched,
    /// Pipeline failed; error_message holds the reason
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetingStatus::Received => write!(fmt, "received"),
            MeetingStatus::Transcribed => write!(fmt, "transcribed"),
            MeetingStatus::TypePending => write!(fmt, "type_pending"),
            MeetingStatus::Summarizing => write!(fmt, "summarizing"),
            MeetingStatus::Summarized => write!(fmt, "summarized"),
            MeetingStatus::TasksDispatched => write!(fmt, "tasks_dispatched"),
            MeetingStatus::Failed => write!(fmt, "failed"),
        }
    }
}
