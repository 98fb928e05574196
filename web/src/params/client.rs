use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateParams {
    pub(crate) name: String,
    /// Chat channel used to notify about this client's meetings
    #[serde(default)]
    pub(crate) telegram_chat_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct ProjectMappingParams {
    /// Todoist project receiving this client's action items
    pub(crate) todoist_project_id: String,
}
