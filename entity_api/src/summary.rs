//! CRUD operations for the summaries table.
//! Summaries are append-only; regeneration adds a new dated record.

use super::error::Error;
use entity::meeting_type::MeetingType;
use entity::summaries::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, DatabaseConnection, QueryOrder, TryIntoModel};

/// Creates a new summary record for a meeting
pub async fn create(
    db: &DatabaseConnection,
    meeting_id: Id,
    meeting_type: MeetingType,
    content_text: String,
    content_json: Option<serde_json::Value>,
    truncated: bool,
) -> Result<Model, Error> {
    debug!("Creating {meeting_type} summary for meeting: {meeting_id}");

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        meeting_id: Set(meeting_id),
        meeting_type: Set(meeting_type),
        content_text: Set(content_text),
        content_json: Set(content_json),
        truncated: Set(truncated),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.save(db).await?.try_into_model()?)
}

/// All summaries for a meeting, newest first
pub async fn find_by_meeting(db: &DatabaseConnection, meeting_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::MeetingId.eq(meeting_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Summaries of one type for a meeting, newest first
pub async fn find_by_meeting_and_type(
    db: &DatabaseConnection,
    meeting_id: Id,
    meeting_type: MeetingType,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::MeetingId.eq(meeting_id))
        .filter(Column::MeetingType.eq(meeting_type))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}
