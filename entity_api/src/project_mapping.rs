//! CRUD operations for the project_mappings table.
//! At most one mapping per client; the unique index enforces it.

use super::error::Error;
use entity::project_mappings::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, TryIntoModel,
};

/// Creates a mapping from a client to an external project
pub async fn create(
    db: &DatabaseConnection,
    client_id: Id,
    todoist_project_id: &str,
) -> Result<Model, Error> {
    debug!("Mapping client {client_id} to project {todoist_project_id}");

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        client_id: Set(client_id),
        todoist_project_id: Set(todoist_project_id.to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.save(db).await?.try_into_model()?)
}

/// Finds the mapping for a client, if one exists
pub async fn find_by_client_id(
    db: &DatabaseConnection,
    client_id: Id,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::ClientId.eq(client_id))
        .one(db)
        .await?)
}

/// Creates or replaces the mapping for a client
pub async fn upsert(
    db: &DatabaseConnection,
    client_id: Id,
    todoist_project_id: &str,
) -> Result<Model, Error> {
    match find_by_client_id(db, client_id).await? {
        Some(existing) => {
            let active_model = ActiveModel {
                id: Unchanged(existing.id),
                client_id: Unchanged(existing.client_id),
                todoist_project_id: Set(todoist_project_id.to_string()),
                created_at: Unchanged(existing.created_at),
                updated_at: Set(chrono::Utc::now().into()),
            };
            Ok(active_model.update(db).await?.try_into_model()?)
        }
        None => create(db, client_id, todoist_project_id).await,
    }
}
