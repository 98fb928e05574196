use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

pub use entity::{
    chunks, clients, embeddings, leads, meeting_status, meeting_type, meetings, project_mappings,
    summaries, task_dispatches, Id,
};

pub mod chunk;
pub mod client;
pub mod embedding;
pub mod error;
pub mod lead;
pub mod meeting;
pub mod project_mapping;
pub mod query;
pub mod summary;
pub mod task_dispatch;

pub fn uuid_parse_str(uuid_str: &str) -> Result<Id, error::Error> {
    Id::parse_str(uuid_str).map_err(|_| error::Error {
        source: None,
        error_kind: error::EntityApiErrorKind::InvalidQueryTerm,
    })
}

/// Seeds a development database with a pair of clients, a project mapping
/// and a lead, enough to exercise the pipeline end to end by hand.
pub async fn seed_database(db: &DatabaseConnection) {
    let now = Utc::now();

    let acme = clients::ActiveModel {
        name: Set("Acme Robotics".to_owned()),
        telegram_chat_id: Set(Some(187_554_001)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    clients::ActiveModel {
        name: Set("Northwind Traders".to_owned()),
        telegram_chat_id: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    project_mappings::ActiveModel {
        client_id: Set(acme.id.clone().unwrap()),
        todoist_project_id: Set("proj-1".to_owned()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    leads::ActiveModel {
        client_name: Set("Globex".to_owned()),
        client_tg: Set(Some("@globex_ops".to_owned())),
        message: Set(Some("Interested in a traction program".to_owned())),
        channel: Set(Some("telegram".to_owned())),
        status: Set("new".to_owned()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;

    #[tokio::test]
    async fn uuid_parse_str_parses_valid_uuid() {
        let uuid_str = "a98c3295-0933-44cb-89db-7db0f7250fb1";
        let uuid = uuid_parse_str(uuid_str).unwrap();
        assert_eq!(uuid.to_string(), uuid_str);
    }

    #[tokio::test]
    async fn uuid_parse_str_returns_error_for_invalid_uuid() {
        let uuid_str = "invalid";
        let result = uuid_parse_str(uuid_str);
        assert!(result.is_err());
    }
}
