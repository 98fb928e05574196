//! Controller for clients and their task-tracker project mappings.

use crate::controller::ApiResponse;
use crate::params::client::{CreateParams, ProjectMappingParams};
use crate::{AppState, Error};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::client as ClientApi;
use domain::clients::Model as ClientModel;
use domain::project_mappings::Model as ProjectMappingModel;
use domain::Id;
use log::*;

/// GET /clients
#[utoipa::path(
    get,
    path = "/clients",
    responses(
        (status = 200, description = "Clients retrieved", body = [domain::clients::Model]),
    )
)]
pub async fn index(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    debug!("GET clients");

    let clients: Vec<ClientModel> = ClientApi::list_all(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), clients)))
}

/// POST /clients
#[utoipa::path(
    post,
    path = "/clients",
    request_body = CreateParams,
    responses(
        (status = 201, description = "Client created", body = domain::clients::Model),
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST client: {}", params.name);

    let client: ClientModel = ClientApi::create(
        app_state.db_conn_ref(),
        &params.name,
        params.telegram_chat_id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), client)))
}

/// PUT /clients/{id}/project_mapping
///
/// Create or replace the client's Todoist project mapping. Action items
/// extracted from this client's meetings dispatch into that project.
#[utoipa::path(
    put,
    path = "/clients/{id}/project_mapping",
    params(
        ("id" = String, Path, description = "Client ID"),
    ),
    request_body = ProjectMappingParams,
    responses(
        (status = 200, description = "Mapping stored", body = domain::project_mappings::Model),
        (status = 404, description = "Client not found"),
    )
)]
pub async fn link_project(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<ProjectMappingParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT client {id} project mapping: {}", params.todoist_project_id);

    let mapping: ProjectMappingModel = ClientApi::link_project(
        app_state.db_conn_ref(),
        id,
        &params.todoist_project_id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), mapping)))
}
