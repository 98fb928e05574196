//! CRUD operations for the chunks table.

use super::error::Error;
use entity::chunks::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, DatabaseConnection, QueryOrder, TryIntoModel};

/// Persists a meeting's chunk sequence. Indices are assigned from the slice
/// order, so the stored sequence is contiguous and zero-based.
pub async fn create_many(
    db: &DatabaseConnection,
    meeting_id: Id,
    contents: &[String],
) -> Result<Vec<Model>, Error> {
    debug!(
        "Storing {} chunks for meeting: {meeting_id}",
        contents.len()
    );

    let now = chrono::Utc::now();
    let mut models = Vec::with_capacity(contents.len());

    for (chunk_index, content) in contents.iter().enumerate() {
        let active_model = ActiveModel {
            meeting_id: Set(meeting_id),
            chunk_index: Set(chunk_index as i32),
            content: Set(content.clone()),
            created_at: Set(now.into()),
            ..Default::default()
        };
        models.push(active_model.save(db).await?.try_into_model()?);
    }

    Ok(models)
}

/// A meeting's chunks in index order
pub async fn find_by_meeting(db: &DatabaseConnection, meeting_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::MeetingId.eq(meeting_id))
        .order_by_asc(Column::ChunkIndex)
        .all(db)
        .await?)
}

/// Removes all of a meeting's chunks (re-index support)
pub async fn delete_by_meeting(db: &DatabaseConnection, meeting_id: Id) -> Result<u64, Error> {
    let result = Entity::delete_many()
        .filter(Column::MeetingId.eq(meeting_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
