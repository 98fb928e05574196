//! SeaORM Entity for the meetings table.
//! A meeting is created on webhook receipt and carries the durable state of
//! its ingestion pipeline in the `status` column.

use crate::meeting_status::MeetingStatus;
use crate::meeting_type::MeetingType;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::meetings::Model)]
#[sea_orm(schema_name = "consultant_copilot", table_name = "meetings")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    /// Transcript provider's meeting id; at most one meeting per value
    #[sea_orm(unique)]
    pub fireflies_id: Option<String>,

    pub title: String,

    /// When the meeting took place, as reported by the provider
    #[schema(value_type = Option<String>, format = DateTime)]
    pub date: Option<DateTimeWithTimeZone>,

    /// Full speaker-attributed transcript text; immutable once set
    #[sea_orm(column_type = "Text", nullable)]
    pub transcript: Option<String>,

    #[schema(value_type = Option<String>)]
    pub client_id: Option<Id>,

    /// Human-selected classification; re-selectable, each run appends a summary
    pub meeting_type: Option<MeetingType>,

    pub status: MeetingStatus,

    /// Failure context preserved for manual re-entry
    pub error_message: Option<String>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Clients,

    #[sea_orm(has_many = "super::summaries::Entity")]
    Summaries,

    #[sea_orm(has_many = "super::chunks::Entity")]
    Chunks,

    #[sea_orm(has_many = "super::embeddings::Entity")]
    Embeddings,

    #[sea_orm(has_many = "super::task_dispatches::Entity")]
    TaskDispatches,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::summaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Summaries.def()
    }
}

impl Related<super::chunks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chunks.def()
    }
}

impl Related<super::embeddings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Embeddings.def()
    }
}

impl Related<super::task_dispatches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskDispatches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
