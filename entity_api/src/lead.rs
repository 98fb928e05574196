//! CRUD operations for the leads table.

use super::error::{EntityApiErrorKind, Error};
use entity::leads::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, TryIntoModel,
};

/// Creates a new lead in the "new" status
pub async fn create(
    db: &DatabaseConnection,
    client_name: &str,
    client_tg: Option<String>,
    message: Option<String>,
    channel: Option<String>,
) -> Result<Model, Error> {
    debug!("Creating new lead: {client_name}");

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        client_name: Set(client_name.to_string()),
        client_tg: Set(client_tg),
        message: Set(message),
        channel: Set(channel),
        status: Set("new".to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.save(db).await?.try_into_model()?)
}

/// All leads, newest first
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Leads in a given status, newest first
pub async fn list_by_status(db: &DatabaseConnection, status: &str) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Status.eq(status))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Updates a lead's status
pub async fn update_status(db: &DatabaseConnection, id: Id, status: &str) -> Result<Model, Error> {
    let existing = Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })?;

    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        client_name: Unchanged(existing.client_name),
        client_tg: Unchanged(existing.client_tg),
        message: Unchanged(existing.message),
        channel: Unchanged(existing.channel),
        status: Set(status.to_string()),
        created_at: Unchanged(existing.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}
