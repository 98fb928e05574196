//! Controller for retrieval-augmented Q&A over the meeting corpus and for
//! triggering (re)indexing.

use crate::controller::ApiResponse;
use crate::params::rag::AskParams;
use crate::{AppState, Error};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domain::retrieval::{self, RetrievalScope};
use domain::Id;
use log::*;
use serde::Serialize;

/// One source excerpt backing an answer
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SourceInfo {
    #[schema(value_type = String)]
    pub meeting_id: Id,
    pub meeting_title: String,
    pub meeting_date: Option<String>,
    pub similarity: f32,
}

/// Answer with the sources it was grounded on
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<SourceInfo>,
}

/// Result of an indexing run
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct IndexResponse {
    pub total_chunks: usize,
    pub embedded: usize,
    pub already_indexed: bool,
    /// Chunk indices that failed to embed; re-run indexing to retry them
    pub failed_chunks: Vec<i32>,
}

/// Size of the searchable corpus
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StatsResponse {
    pub total_chunks: u64,
    pub indexed_meetings: u64,
}

/// POST /rag/ask
///
/// Answer a question over the indexed meeting history, optionally scoped to
/// one client or one meeting.
#[utoipa::path(
    post,
    path = "/rag/ask",
    request_body = AskParams,
    responses(
        (status = 200, description = "Answer generated", body = AskResponse),
        (status = 422, description = "Empty question or non-positive top_k"),
        (status = 502, description = "Provider failure"),
    )
)]
pub async fn ask(
    State(app_state): State<AppState>,
    Json(params): Json<AskParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST rag/ask: {}", params.question);

    let scope = RetrievalScope {
        client_id: params.client_id,
        meeting_id: params.meeting_id,
    };
    let top_k = params
        .top_k
        .unwrap_or(app_state.config.retrieval_top_k);

    let result = retrieval::ask(
        app_state.db_conn_ref(),
        &app_state.embedder,
        &app_state.llm,
        &app_state.backoff,
        &params.question,
        top_k,
        &scope,
    )
    .await?;

    let response = AskResponse {
        answer: result.answer,
        sources: result
            .sources
            .into_iter()
            .map(|source| SourceInfo {
                meeting_id: source.meeting_id,
                meeting_title: source.meeting_title,
                meeting_date: source.meeting_date,
                similarity: source.score,
            })
            .collect(),
    };

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), response)))
}

/// POST /rag/index/{meeting_id}
///
/// Index a meeting's transcript for retrieval. A fully-indexed meeting is a
/// no-op; a partially-indexed one embeds only the missing chunks.
#[utoipa::path(
    post,
    path = "/rag/index/{meeting_id}",
    params(
        ("meeting_id" = String, Path, description = "Meeting ID"),
    ),
    responses(
        (status = 200, description = "Indexing finished", body = IndexResponse),
        (status = 404, description = "Meeting not found"),
    )
)]
pub async fn index_meeting(
    State(app_state): State<AppState>,
    Path(meeting_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST rag/index: {meeting_id}");

    let report = app_state.ingestion.index_meeting(meeting_id, false).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        index_response(report),
    )))
}

/// POST /rag/reindex/{meeting_id}
///
/// Drop a meeting's chunks and embeddings and rebuild them from the
/// transcript.
#[utoipa::path(
    post,
    path = "/rag/reindex/{meeting_id}",
    params(
        ("meeting_id" = String, Path, description = "Meeting ID"),
    ),
    responses(
        (status = 200, description = "Re-indexing finished", body = IndexResponse),
        (status = 404, description = "Meeting not found"),
    )
)]
pub async fn reindex_meeting(
    State(app_state): State<AppState>,
    Path(meeting_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST rag/reindex: {meeting_id}");

    let report = app_state.ingestion.index_meeting(meeting_id, true).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        index_response(report),
    )))
}

/// GET /rag/stats
#[utoipa::path(
    get,
    path = "/rag/stats",
    responses(
        (status = 200, description = "Index statistics", body = StatsResponse),
    )
)]
pub async fn stats(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let stats = retrieval::stats(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        StatsResponse {
            total_chunks: stats.total_chunks,
            indexed_meetings: stats.indexed_meetings,
        },
    )))
}

fn index_response(report: domain::indexer::IndexReport) -> IndexResponse {
    IndexResponse {
        total_chunks: report.total_chunks,
        embedded: report.embedded,
        already_indexed: report.already_indexed,
        failed_chunks: report.failures.iter().map(|f| f.chunk_index).collect(),
    }
}
