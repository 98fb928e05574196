//! Controller for reading persisted summaries.

use crate::controller::ApiResponse;
use crate::params::summary::IndexParams;
use crate::{AppState, Error};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::error::ValidationErrorKind;
use domain::meeting_type::MeetingType;
use domain::summaries::Model as SummaryModel;
use domain::summary as SummaryApi;
use domain::Id;
use log::*;

/// GET /meetings/{id}/summaries
///
/// Summaries for a meeting, newest first. Summaries are append-only, so
/// re-running a type yields multiple dated records; pass `meeting_type` to
/// narrow to one type.
#[utoipa::path(
    get,
    path = "/meetings/{id}/summaries",
    params(
        ("id" = String, Path, description = "Meeting ID"),
        IndexParams,
    ),
    responses(
        (status = 200, description = "Summaries retrieved", body = [domain::summaries::Model]),
        (status = 422, description = "Unknown meeting type"),
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET summaries for meeting: {id}");

    let meeting_type = match params.meeting_type {
        Some(tag) => Some(MeetingType::parse_tag(&tag).ok_or_else(|| {
            domain::error::Error::validation(ValidationErrorKind::UnknownMeetingType(tag))
        })?),
        None => None,
    };

    let summaries: Vec<SummaryModel> =
        SummaryApi::get_summaries(app_state.db_conn_ref(), id, meeting_type).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), summaries)))
}
