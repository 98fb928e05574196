//! Meeting domain operations. Mostly thin wrappers over `entity_api` so the
//! web layer never reaches below the domain boundary.

use crate::error::Error;
use crate::meetings::Model;
use entity_api::meetings;
use entity_api::query::{self, IntoQueryFilterMap};
use sea_orm::DatabaseConnection;

pub use entity_api::meeting::{
    delete_by_id, find_by_fireflies_id, find_by_id, list_recent, update_client,
};

/// Find meetings matching the given filter parameters (client, status, ...).
pub async fn find_by(
    db: &DatabaseConnection,
    params: impl IntoQueryFilterMap,
) -> Result<Vec<Model>, Error> {
    let meetings = query::find_by::<meetings::Entity, meetings::Column>(
        db,
        params.into_query_filter_map(),
    )
    .await?;

    Ok(meetings)
}
