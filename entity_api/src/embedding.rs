//! CRUD operations for the embeddings table, including the joined candidate
//! query the retriever ranks over.

use super::error::Error;
use entity::embeddings::{ActiveModel, Column, Entity, Model, Relation};
use entity::{chunks, meetings, Id};
use log::*;
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, DatabaseConnection, FromQueryResult, JoinType,
    QuerySelect, TryIntoModel,
};

/// One retrieval candidate: an embedded chunk joined with its meeting
/// metadata. The meeting fields drive scope filtering and the deterministic
/// tie-break (chunk index, then meeting creation time).
#[derive(Debug, Clone, FromQueryResult)]
pub struct CandidateRow {
    pub chunk_id: Id,
    pub meeting_id: Id,
    pub chunk_index: i32,
    pub content: String,
    pub vector: Vec<f32>,
    pub meeting_title: String,
    pub meeting_date: Option<DateTimeWithTimeZone>,
    pub meeting_created_at: DateTimeWithTimeZone,
}

/// Stores the embedding vector for a chunk
pub async fn create(
    db: &DatabaseConnection,
    chunk_id: Id,
    meeting_id: Id,
    vector: Vec<f32>,
) -> Result<Model, Error> {
    debug!("Storing embedding for chunk: {chunk_id}");

    let active_model = ActiveModel {
        chunk_id: Set(chunk_id),
        meeting_id: Set(meeting_id),
        vector: Set(vector),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };

    Ok(active_model.save(db).await?.try_into_model()?)
}

/// IDs of chunks that already have an embedding, so indexing never
/// re-embeds a chunk that succeeded earlier
pub async fn find_embedded_chunk_ids(
    db: &DatabaseConnection,
    meeting_id: Id,
) -> Result<Vec<Id>, Error> {
    let models = Entity::find()
        .filter(Column::MeetingId.eq(meeting_id))
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.chunk_id).collect())
}

/// Number of stored embeddings across the whole corpus
pub async fn count_all(db: &DatabaseConnection) -> Result<u64, Error> {
    Ok(Entity::find().count(db).await?)
}

/// Number of meetings that have at least one embedded chunk
pub async fn count_indexed_meetings(db: &DatabaseConnection) -> Result<u64, Error> {
    let meeting_ids: Vec<Id> = Entity::find()
        .select_only()
        .column(Column::MeetingId)
        .distinct()
        .into_tuple()
        .all(db)
        .await?;
    Ok(meeting_ids.len() as u64)
}

/// Removes all of a meeting's embeddings (re-index support)
pub async fn delete_by_meeting(db: &DatabaseConnection, meeting_id: Id) -> Result<u64, Error> {
    let result = Entity::delete_many()
        .filter(Column::MeetingId.eq(meeting_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Fetches the retrieval candidates in scope: every embedded chunk joined
/// with its chunk text and meeting metadata, optionally restricted to a
/// client or a single meeting.
pub async fn find_candidates(
    db: &DatabaseConnection,
    client_id: Option<Id>,
    meeting_id: Option<Id>,
) -> Result<Vec<CandidateRow>, Error> {
    let mut query = Entity::find()
        .select_only()
        .column_as(Column::ChunkId, "chunk_id")
        .column_as(Column::MeetingId, "meeting_id")
        .column_as(Column::Vector, "vector")
        .join(JoinType::InnerJoin, Relation::Chunks.def())
        .join(JoinType::InnerJoin, Relation::Meetings.def())
        .column_as(chunks::Column::ChunkIndex, "chunk_index")
        .column_as(chunks::Column::Content, "content")
        .column_as(meetings::Column::Title, "meeting_title")
        .column_as(meetings::Column::Date, "meeting_date")
        .column_as(meetings::Column::CreatedAt, "meeting_created_at");

    if let Some(client_id) = client_id {
        query = query.filter(meetings::Column::ClientId.eq(client_id));
    }
    if let Some(meeting_id) = meeting_id {
        query = query.filter(Column::MeetingId.eq(meeting_id));
    }

    Ok(query.into_model::<CandidateRow>().all(db).await?)
}
