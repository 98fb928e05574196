//! Controller for handling webhooks from external services.
//!
//! Handles webhooks from Fireflies.ai announcing finished transcriptions.

use crate::{AppState, Error};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use log::*;
use serde::{Deserialize, Serialize};

/// Fireflies event name announcing a finished transcription. Other events
/// are acknowledged and ignored.
const TRANSCRIPTION_COMPLETED: &str = "Transcription completed";

/// Fireflies webhook event payload
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FirefliesWebhookPayload {
    /// The Fireflies meeting id the event is about
    #[serde(rename = "meetingId")]
    pub meeting_id: String,
    /// The type of event
    #[serde(rename = "eventType")]
    pub event_type: String,
    /// Optional correlation id supplied at recording time
    #[serde(rename = "clientReferenceId", default)]
    pub client_reference_id: Option<String>,
}

/// Response for webhook acknowledgment
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct WebhookResponse {
    pub status: String,
}

/// POST /webhooks/fireflies
///
/// Handles webhook callbacks from Fireflies.ai. The actual transcript fetch
/// and pipeline run happen in a spawned task so one slow provider call
/// never blocks other meetings (or the webhook response itself).
/// This endpoint does not require authentication but validates via webhook secret.
#[utoipa::path(
    post,
    path = "/webhooks/fireflies",
    request_body = FirefliesWebhookPayload,
    responses(
        (status = 200, description = "Webhook acknowledged", body = WebhookResponse),
        (status = 401, description = "Invalid webhook secret"),
    )
)]
pub async fn fireflies_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<FirefliesWebhookPayload>,
) -> Result<impl IntoResponse, Error> {
    debug!(
        "Received Fireflies webhook: {} - {}",
        payload.event_type, payload.meeting_id
    );

    // Validate webhook secret if configured
    if let Some(expected_secret) = app_state.config.webhook_secret() {
        let provided_secret = headers
            .get("x-webhook-secret")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if provided_secret != expected_secret {
            warn!("Invalid webhook secret received");
            return Ok((
                StatusCode::UNAUTHORIZED,
                Json(WebhookResponse {
                    status: "unauthorized".to_string(),
                }),
            ));
        }
    }

    if payload.event_type != TRANSCRIPTION_COMPLETED {
        debug!("Ignoring unhandled Fireflies event: {}", payload.event_type);
        return Ok((
            StatusCode::OK,
            Json(WebhookResponse {
                status: "ignored".to_string(),
            }),
        ));
    }

    let ingestion = app_state.ingestion.clone();
    let external_id = payload.meeting_id.clone();
    tokio::spawn(async move {
        if let Err(e) = ingestion.ingest_webhook(&external_id).await {
            // The meeting record carries the failure context; nothing to
            // return to Fireflies here.
            warn!("Ingestion of meeting {external_id} failed: {e}");
        }
    });

    Ok((
        StatusCode::OK,
        Json(WebhookResponse {
            status: "ok".to_string(),
        }),
    ))
}
