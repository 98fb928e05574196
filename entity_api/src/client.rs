//! CRUD operations for the clients table.

use super::error::{EntityApiErrorKind, Error};
use entity::clients::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, DatabaseConnection, QueryOrder, TryIntoModel};

/// Creates a new client record
pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    telegram_chat_id: Option<i64>,
) -> Result<Model, Error> {
    debug!("Creating new client: {name}");

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        name: Set(name.to_string()),
        telegram_chat_id: Set(telegram_chat_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.save(db).await?.try_into_model()?)
}

/// Finds a client by ID
pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// All clients, ordered by name
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().order_by_asc(Column::Name).all(db).await?)
}
