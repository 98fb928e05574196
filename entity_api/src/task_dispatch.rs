//! CRUD operations for the task_dispatches table, the dispatcher's
//! idempotency records.

use super::error::{EntityApiErrorKind, Error};
use entity::task_dispatches::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, TryIntoModel,
};

/// Records a dispatch attempt before the external tracker call is made.
/// The task id stays null until the call succeeds.
pub async fn create(
    db: &DatabaseConnection,
    meeting_id: Id,
    client_id: Id,
    content: &str,
) -> Result<Model, Error> {
    debug!("Recording dispatch of action item for meeting: {meeting_id}");

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        meeting_id: Set(meeting_id),
        client_id: Set(client_id),
        content: Set(content.to_string()),
        todoist_task_id: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.save(db).await?.try_into_model()?)
}

/// The idempotency lookup: has this (meeting, action item text) pair been
/// dispatched before?
pub async fn find_by_meeting_and_content(
    db: &DatabaseConnection,
    meeting_id: Id,
    content: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::MeetingId.eq(meeting_id))
        .filter(Column::Content.eq(content))
        .one(db)
        .await?)
}

/// Stores the external task id after a successful tracker call
pub async fn set_task_id(db: &DatabaseConnection, id: Id, task_id: &str) -> Result<Model, Error> {
    let existing = Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })?;

    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        meeting_id: Unchanged(existing.meeting_id),
        client_id: Unchanged(existing.client_id),
        content: Unchanged(existing.content),
        todoist_task_id: Set(Some(task_id.to_string())),
        created_at: Unchanged(existing.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}
