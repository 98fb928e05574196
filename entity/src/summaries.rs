//! SeaORM Entity for the summaries table.
//! Append-only: each summarization run adds a dated record; re-running the
//! same type adds another rather than replacing.

use crate::meeting_type::MeetingType;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::summaries::Model)]
#[sea_orm(schema_name = "consultant_copilot", table_name = "summaries")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    #[schema(value_type = String)]
    pub meeting_id: Id,

    /// The type tag the summary was produced with
    pub meeting_type: MeetingType,

    /// Free-text rendering; never empty even when structure extraction fails
    #[sea_orm(column_type = "Text")]
    pub content_text: String,

    /// Structured rendering; null when the model output did not parse
    #[schema(value_type = Option<Object>)]
    pub content_json: Option<Json>,

    /// The transcript was cut to fit the prompt budget
    pub truncated: bool,

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
        belongs_to = "super::meetings::Entity",
        from = "Column::MeetingId",
        to = "super::meetings::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Meetings,
}

impl Related<super::meetings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meetings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
