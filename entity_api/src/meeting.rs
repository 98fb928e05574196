//! CRUD operations for the meetings table.

use super::error::{EntityApiErrorKind, Error};
use entity::meeting_status::MeetingStatus;
use entity::meeting_type::MeetingType;
use entity::meetings::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, QuerySelect, TryIntoModel,
};

/// Creates a new meeting record in the `Received` state
pub async fn create(
    db: &DatabaseConnection,
    fireflies_id: &str,
    title: &str,
    date: Option<DateTimeWithTimeZone>,
) -> Result<Model, Error> {
    debug!("Creating new meeting for external id: {fireflies_id}");

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        fireflies_id: Set(Some(fireflies_id.to_string())),
        title: Set(title.to_string()),
        date: Set(date),
        status: Set(MeetingStatus::Received),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.save(db).await?.try_into_model()?)
}

/// Finds a meeting by ID
pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Finds a meeting by the transcript provider's external id
pub async fn find_by_fireflies_id(
    db: &DatabaseConnection,
    fireflies_id: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::FirefliesId.eq(fireflies_id))
        .one(db)
        .await?)
}

/// Whether a meeting still exists. Used by the pipeline to guard against
/// writes racing a meeting deletion.
pub async fn exists(db: &DatabaseConnection, id: Id) -> Result<bool, Error> {
    Ok(Entity::find_by_id(id).one(db).await?.is_some())
}

/// Persists the fetched transcript (with the provider's title and date)
/// and advances the meeting to `Transcribed`
pub async fn store_transcript(
    db: &DatabaseConnection,
    id: Id,
    title: &str,
    date: Option<DateTimeWithTimeZone>,
    transcript: String,
) -> Result<Model, Error> {
    let existing = find_by_id(db, id).await?;

    debug!("Storing transcript for meeting: {id}");

    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        fireflies_id: Unchanged(existing.fireflies_id),
        title: Set(title.to_string()),
        date: Set(date),
        transcript: Set(Some(transcript)),
        client_id: Unchanged(existing.client_id),
        meeting_type: Unchanged(existing.meeting_type),
        status: Set(MeetingStatus::Transcribed),
        error_message: Set(None),
        created_at: Unchanged(existing.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}

/// Updates the pipeline status of a meeting
pub async fn update_status(
    db: &DatabaseConnection,
    id: Id,
    status: MeetingStatus,
    error_message: Option<String>,
) -> Result<Model, Error> {
    let existing = find_by_id(db, id).await?;

    debug!("Updating meeting {id} status to {status}");

    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        fireflies_id: Unchanged(existing.fireflies_id),
        title: Unchanged(existing.title),
        date: Unchanged(existing.date),
        transcript: Unchanged(existing.transcript),
        client_id: Unchanged(existing.client_id),
        meeting_type: Unchanged(existing.meeting_type),
        status: Set(status),
        error_message: Set(error_message),
        created_at: Unchanged(existing.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}

/// Records the human-selected meeting type
pub async fn update_type(
    db: &DatabaseConnection,
    id: Id,
    meeting_type: MeetingType,
) -> Result<Model, Error> {
    let existing = find_by_id(db, id).await?;

    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        fireflies_id: Unchanged(existing.fireflies_id),
        title: Unchanged(existing.title),
        date: Unchanged(existing.date),
        transcript: Unchanged(existing.transcript),
        client_id: Unchanged(existing.client_id),
        meeting_type: Set(Some(meeting_type)),
        status: Unchanged(existing.status),
        error_message: Unchanged(existing.error_message),
        created_at: Unchanged(existing.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}

/// Associates a meeting with a client
pub async fn update_client(
    db: &DatabaseConnection,
    id: Id,
    client_id: Option<Id>,
) -> Result<Model, Error> {
    let existing = find_by_id(db, id).await?;

    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        fireflies_id: Unchanged(existing.fireflies_id),
        title: Unchanged(existing.title),
        date: Unchanged(existing.date),
        transcript: Unchanged(existing.transcript),
        client_id: Set(client_id),
        meeting_type: Unchanged(existing.meeting_type),
        status: Unchanged(existing.status),
        error_message: Unchanged(existing.error_message),
        created_at: Unchanged(existing.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}

/// Lists the most recently created meetings
pub async fn list_recent(db: &DatabaseConnection, limit: u64) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_desc(Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await?)
}

/// Deletes a meeting by ID. Summaries, chunks, embeddings and dispatch
/// records go with it via the schema's cascades.
pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let model = find_by_id(db, id).await?;
    Entity::delete_by_id(model.id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn meeting_model(fireflies_id: &str) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            fireflies_id: Some(fireflies_id.to_string()),
            title: "Q3 roadmap".to_string(),
            date: None,
            transcript: None,
            client_id: None,
            meeting_type: None,
            status: MeetingStatus::Received,
            error_message: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_by_fireflies_id_returns_existing_record() -> Result<(), Error> {
        let existing = meeting_model("ff-123");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing.clone()]])
            .into_connection();

        let found = find_by_fireflies_id(&db, "ff-123").await?;
        assert_eq!(found, Some(existing));

        Ok(())
    }

    #[tokio::test]
    async fn find_by_fireflies_id_returns_none_when_absent() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        assert_eq!(find_by_fireflies_id(&db, "ff-404").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_returns_not_found_when_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id(&db, Id::new_v4()).await;
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
