use crate::{controller::health_check_controller, AppState};
use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use log::*;
use tower_http::cors::{Any, CorsLayer};

use crate::controller::{
    client_controller, lead_controller, meeting_controller, rag_controller, summary_controller,
    webhook_controller,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Consultant Copilot API"
        ),
        paths(
            client_controller::index,
            client_controller::create,
            client_controller::link_project,
            lead_controller::index,
            lead_controller::create,
            lead_controller::update_status,
            meeting_controller::index,
            meeting_controller::read,
            meeting_controller::select_type,
            meeting_controller::link_client,
            meeting_controller::delete,
            rag_controller::ask,
            rag_controller::index_meeting,
            rag_controller::reindex_meeting,
            rag_controller::stats,
            summary_controller::index,
            webhook_controller::fireflies_webhook,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::clients::Model,
                domain::leads::Model,
                domain::meetings::Model,
                domain::project_mappings::Model,
                domain::summaries::Model,
                domain::meeting_status::MeetingStatus,
                domain::meeting_type::MeetingType,
                crate::params::meeting::SelectTypeParams,
                crate::params::meeting::LinkClientParams,
                crate::params::rag::AskParams,
                crate::params::client::CreateParams,
                crate::params::client::ProjectMappingParams,
                crate::params::lead::CreateParams,
                crate::params::lead::UpdateStatusParams,
                rag_controller::AskResponse,
                rag_controller::SourceInfo,
                rag_controller::IndexResponse,
                rag_controller::StatsResponse,
                webhook_controller::FirefliesWebhookPayload,
                webhook_controller::WebhookResponse,
            )
        ),
        tags(
            (name = "consultant_copilot", description = "Meeting intelligence pipeline API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(client_routes(app_state.clone()))
        .merge(lead_routes(app_state.clone()))
        .merge(health_routes())
        .merge(meeting_routes(app_state.clone()))
        .merge(rag_routes(app_state.clone()))
        .merge(summary_routes(app_state.clone()))
        .merge(webhook_routes(app_state.clone()))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
        .layer(cors_layer(&app_state))
}

fn client_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/clients", get(client_controller::index))
        .route("/clients", post(client_controller::create))
        .route(
            "/clients/{id}/project_mapping",
            put(client_controller::link_project),
        )
        .with_state(app_state)
}

fn lead_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/leads", get(lead_controller::index))
        .route("/leads", post(lead_controller::create))
        .route("/leads/{id}/status", put(lead_controller::update_status))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn meeting_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/meetings", get(meeting_controller::index))
        .route("/meetings/{id}", get(meeting_controller::read))
        .route("/meetings/{id}", delete(meeting_controller::delete))
        .route("/meetings/{id}/type", put(meeting_controller::select_type))
        .route("/meetings/{id}/client", put(meeting_controller::link_client))
        .with_state(app_state)
}

fn rag_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/rag/ask", post(rag_controller::ask))
        .route("/rag/index/{meeting_id}", post(rag_controller::index_meeting))
        .route(
            "/rag/reindex/{meeting_id}",
            post(rag_controller::reindex_meeting),
        )
        .route("/rag/stats", get(rag_controller::stats))
        .with_state(app_state)
}

fn summary_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/meetings/{id}/summaries", get(summary_controller::index))
        .with_state(app_state)
}

fn webhook_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/webhooks/fireflies",
            post(webhook_controller::fireflies_webhook),
        )
        .with_state(app_state)
}

/// Restrict cross-origin access to the configured origins. Origins that do
/// not parse are skipped with a warning rather than taking the server down.
fn cors_layer(app_state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Skipping unparseable allowed origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
