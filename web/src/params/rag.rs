use domain::Id;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct AskParams {
    /// The question to answer over the meeting history
    pub(crate) question: String,
    /// Restrict retrieval to meetings of one client
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub(crate) client_id: Option<Id>,
    /// Restrict retrieval to a single meeting
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub(crate) meeting_id: Option<Id>,
    /// Number of chunks to retrieve as context; must be positive.
    /// Defaults to the configured retrieval size.
    #[serde(default)]
    pub(crate) top_k: Option<usize>,
}
