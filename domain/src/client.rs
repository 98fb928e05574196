//! Client domain operations, including the client → tracker-project mapping.

use crate::error::Error;
use entity::project_mappings::Model as ProjectMappingModel;
use entity::Id;
use entity_api::{client, project_mapping};
use sea_orm::DatabaseConnection;

pub use entity_api::client::{create, find_by_id, list_all};

/// Create or replace the Todoist project mapping for a client. The client
/// must exist; at most one mapping per client is kept.
pub async fn link_project(
    db: &DatabaseConnection,
    client_id: Id,
    todoist_project_id: &str,
) -> Result<ProjectMappingModel, Error> {
    // Surfaces NotFound for unknown clients before touching the mapping
    client::find_by_id(db, client_id).await?;
    Ok(project_mapping::upsert(db, client_id, todoist_project_id).await?)
}
