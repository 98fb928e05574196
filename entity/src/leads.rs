//! SeaORM Entity for the leads table.
//! Inbound prospect contacts. Stored for completeness; the ingestion
//! pipeline never touches them.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::leads::Model)]
#[sea_orm(schema_name = "consultant_copilot", table_name = "leads")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    pub client_name: String,

    /// Prospect's chat handle, when the lead came in via chat
    pub client_tg: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    /// Acquisition channel (chat, referral, website, ...)
    pub channel: Option<String>,

    /// Free-form pipeline status; starts at "new"
    pub status: String,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
