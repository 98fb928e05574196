//! Controller for inbound leads. Leads are recorded and listed; the
//! pipeline never touches them.

use crate::controller::ApiResponse;
use crate::params::lead::{CreateParams, IndexParams, UpdateStatusParams};
use crate::{AppState, Error};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::lead as LeadApi;
use domain::leads::Model as LeadModel;
use domain::Id;
use log::*;

/// GET /leads
#[utoipa::path(
    get,
    path = "/leads",
    params(IndexParams),
    responses(
        (status = 200, description = "Leads retrieved", body = [domain::leads::Model]),
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET leads with filter: {params:?}");

    let leads: Vec<LeadModel> = match params.status {
        Some(status) => LeadApi::list_by_status(app_state.db_conn_ref(), &status).await?,
        None => LeadApi::list_all(app_state.db_conn_ref()).await?,
    };

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), leads)))
}

/// POST /leads
#[utoipa::path(
    post,
    path = "/leads",
    request_body = CreateParams,
    responses(
        (status = 201, description = "Lead recorded", body = domain::leads::Model),
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST lead: {}", params.client_name);

    let lead: LeadModel = LeadApi::create(
        app_state.db_conn_ref(),
        &params.client_name,
        params.client_tg,
        params.message,
        params.channel,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), lead)))
}

/// PUT /leads/{id}/status
#[utoipa::path(
    put,
    path = "/leads/{id}/status",
    params(
        ("id" = String, Path, description = "Lead ID"),
    ),
    request_body = UpdateStatusParams,
    responses(
        (status = 200, description = "Lead updated", body = domain::leads::Model),
        (status = 404, description = "Lead not found"),
    )
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateStatusParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT lead {id} status: {}", params.status);

    let lead: LeadModel =
        LeadApi::update_status(app_state.db_conn_ref(), id, &params.status).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), lead)))
}
