//! Summary domain operations.

use crate::error::Error;
use entity::meeting_type::MeetingType;
use entity::summaries::Model;
use entity::Id;
use entity_api::summary;
use sea_orm::DatabaseConnection;

/// Summaries for a meeting, newest first, optionally narrowed to one type.
pub async fn get_summaries(
    db: &DatabaseConnection,
    meeting_id: Id,
    meeting_type: Option<MeetingType>,
) -> Result<Vec<Model>, Error> {
    let summaries = match meeting_type {
        Some(meeting_type) => {
            summary::find_by_meeting_and_type(db, meeting_id, meeting_type).await?
        }
        None => summary::find_by_meeting(db, meeting_id).await?,
    };
    Ok(summaries)
}
