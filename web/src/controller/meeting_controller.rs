//! Controller for meeting records and the type-selection entry point of the
//! summarization pipeline.

use crate::controller::ApiResponse;
use crate::params::meeting::{IndexParams, LinkClientParams, SelectTypeParams};
use crate::{AppState, Error};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::meeting as MeetingApi;
use domain::meetings::Model as MeetingModel;
use domain::summaries::Model as SummaryModel;
use domain::Id;
use log::*;

/// GET /meetings
///
/// List meetings, optionally filtered by client.
#[utoipa::path(
    get,
    path = "/meetings",
    params(IndexParams),
    responses(
        (status = 200, description = "Meetings retrieved", body = [domain::meetings::Model]),
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET meetings with filter: {params:?}");

    let db = app_state.db_conn_ref();
    let meetings: Vec<MeetingModel> = if params.client_id.is_some() {
        MeetingApi::find_by(db, params).await?
    } else {
        MeetingApi::list_recent(db, params.limit.unwrap_or(50)).await?
    };

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), meetings)))
}

/// GET /meetings/{id}
#[utoipa::path(
    get,
    path = "/meetings/{id}",
    params(
        ("id" = String, Path, description = "Meeting ID"),
    ),
    responses(
        (status = 200, description = "Meeting retrieved", body = domain::meetings::Model),
        (status = 404, description = "Meeting not found"),
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET meeting: {id}");

    let meeting: MeetingModel = MeetingApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), meeting)))
}

/// PUT /meetings/{id}/type
///
/// Apply a human meeting-type selection: runs summarization, persists the
/// summary and dispatches extracted action items. Selecting a type again
/// (same or different) appends a fresh summary record.
#[utoipa::path(
    put,
    path = "/meetings/{id}/type",
    params(
        ("id" = String, Path, description = "Meeting ID"),
    ),
    request_body = SelectTypeParams,
    responses(
        (status = 200, description = "Summary generated", body = domain::summaries::Model),
        (status = 404, description = "Meeting not found"),
        (status = 422, description = "Unknown meeting type or missing transcript"),
        (status = 502, description = "Summarization provider failure"),
    )
)]
pub async fn select_type(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<SelectTypeParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT meeting {id} type: {}", params.meeting_type);

    let summary: SummaryModel = app_state
        .ingestion
        .select_type(id, &params.meeting_type)
        .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), summary)))
}

/// PUT /meetings/{id}/client
///
/// Associate a meeting with a client (or unlink it with a null client_id).
/// Client scoping of retrieval and task dispatch both depend on this link.
#[utoipa::path(
    put,
    path = "/meetings/{id}/client",
    params(
        ("id" = String, Path, description = "Meeting ID"),
    ),
    request_body = LinkClientParams,
    responses(
        (status = 200, description = "Meeting updated", body = domain::meetings::Model),
        (status = 404, description = "Meeting not found"),
    )
)]
pub async fn link_client(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<LinkClientParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT meeting {id} client: {:?}", params.client_id);

    let meeting: MeetingModel =
        MeetingApi::update_client(app_state.db_conn_ref(), id, params.client_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), meeting)))
}

/// DELETE /meetings/{id}
///
/// Delete a meeting and everything it owns (summaries, chunks, embeddings,
/// dispatch records). Cancels any pending type-selection wait.
#[utoipa::path(
    delete,
    path = "/meetings/{id}",
    params(
        ("id" = String, Path, description = "Meeting ID"),
    ),
    responses(
        (status = 204, description = "Meeting deleted"),
        (status = 404, description = "Meeting not found"),
    )
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE meeting: {id}");

    app_state.ingestion.delete_meeting(id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
