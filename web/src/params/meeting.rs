use domain::Id;
use domain::{IntoQueryFilterMap, QueryFilterMap};
use sea_orm::Value;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    /// Restrict the listing to one client's meetings
    #[param(value_type = Option<String>)]
    pub(crate) client_id: Option<Id>,
    /// Maximum number of meetings returned for an unfiltered listing
    pub(crate) limit: Option<u64>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        if let Some(client_id) = self.client_id {
            query_filter_map.insert(
                "client_id".to_string(),
                Some(Value::Uuid(Some(Box::new(client_id)))),
            );
        }
        query_filter_map
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct LinkClientParams {
    /// Client to associate with the meeting; null unlinks it
    #[schema(value_type = Option<String>)]
    pub(crate) client_id: Option<Id>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct SelectTypeParams {
    /// Wire tag of the meeting type (working_meeting, diagnostics,
    /// traction, intro)
    pub(crate) meeting_type: String,
}
