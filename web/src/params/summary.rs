use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    /// Narrow the listing to summaries produced with one type tag
    pub(crate) meeting_type: Option<String>,
}
