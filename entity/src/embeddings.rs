//! SeaORM Entity for the embeddings table.
//! One fixed-dimension vector per chunk. The dimension is constant across
//! the corpus; `meeting_id` is denormalized for scoped retrieval queries.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::embeddings::Model)]
#[sea_orm(schema_name = "consultant_copilot", table_name = "embeddings")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    #[sea_orm(unique)]
    #[schema(value_type = String)]
    pub chunk_id: Id,

    #[schema(value_type = String)]
    pub meeting_id: Id,

    /// The embedding vector, stored as a float4 array
    pub vector: Vec<f32>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chunks::Entity",
        from = "Column::ChunkId",
        to = "super::chunks::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Chunks,

    #[sea_orm(
        belongs_to = "super::meetings::Entity",
        from = "Column::MeetingId",
        to = "super::meetings::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Meetings,
}

impl Related<super::chunks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chunks.def()
    }
}

impl Related<super::meetings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Meetings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
