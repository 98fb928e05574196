//! SeaORM Entity for the clients table.
//! Clients are created out-of-band (manually or from a CRM) and referenced
//! by meetings and project mappings; they are never owned by either.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::clients::Model)]
#[sea_orm(schema_name = "consultant_copilot", table_name = "clients")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    pub name: String,

    /// Chat channel used to notify this client's consultant
    pub telegram_chat_id: Option<i64>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::meetings::Entity")]
    Meetings,

    #[sea_orm(has_one = "super::project_mappings::Entity")]
    ProjectMappings,
}

impl Related<super::meetings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meetings.def()
    }
}

impl Related<super::project_mappings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectMappings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
