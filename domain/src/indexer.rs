//! Embedding indexer: turns a stored transcript into chunk rows and one
//! embedding per chunk.
//!
//! Indexing is restartable. Chunk rows are written once (the chunker is
//! deterministic, so a re-run reproduces the same sequence), and only
//! chunks without an embedding are embedded, so a partially-failed run is
//! completed by running the indexer again. A fully-indexed meeting is a
//! no-op unless `force` rebuilds it from scratch.

use crate::chunking::{chunk_transcript, ChunkConfig};
use crate::retry::Backoff;
use crate::error::Error;
use copilot_ai::traits::embedding;
use entity::Id;
use entity_api::{chunk, embedding as embedding_api, meeting};
use log::*;
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use std::sync::Arc;

/// Result of one indexing run over a meeting.
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    /// Chunks the meeting has after the run.
    pub total_chunks: usize,
    /// Embeddings created by this run.
    pub embedded: usize,
    /// The meeting was already fully indexed and nothing was done.
    pub already_indexed: bool,
    /// Chunks this run could not embed; a later run retries exactly these.
    pub failures: Vec<ChunkFailure>,
}

/// A chunk that failed to embed, with the reason.
#[derive(Debug, Clone)]
pub struct ChunkFailure {
    pub chunk_index: i32,
    pub reason: String,
}

/// Chunk and embed a meeting's transcript.
///
/// `force` drops existing chunks and embeddings first and rebuilds. A
/// meeting without a transcript indexes to nothing (reported, not an
/// error). A returned vector whose dimension differs from the provider's
/// configured dimension is fatal for that chunk.
pub async fn index_meeting(
    db: &DatabaseConnection,
    embedder: &Arc<dyn embedding::Provider>,
    backoff: &Backoff,
    chunk_config: &ChunkConfig,
    meeting_id: Id,
    force: bool,
) -> Result<IndexReport, Error> {
    let meeting = meeting::find_by_id(db, meeting_id).await?;

    let transcript = match meeting.transcript {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            warn!("Meeting {meeting_id} has no transcript, nothing to index");
            return Ok(IndexReport::default());
        }
    };

    if force {
        let removed_embeddings = embedding_api::delete_by_meeting(db, meeting_id).await?;
        let removed_chunks = chunk::delete_by_meeting(db, meeting_id).await?;
        debug!(
            "Force re-index of meeting {meeting_id}: removed {removed_chunks} chunks, \
             {removed_embeddings} embeddings"
        );
    }

    let mut chunks = chunk::find_by_meeting(db, meeting_id).await?;
    if chunks.is_empty() {
        let texts = chunk_transcript(&transcript, chunk_config);
        if texts.is_empty() {
            warn!("Meeting {meeting_id} produced no chunks");
            return Ok(IndexReport::default());
        }
        chunks = chunk::create_many(db, meeting_id, &texts).await?;
    }

    let embedded_ids: HashSet<Id> = embedding_api::find_embedded_chunk_ids(db, meeting_id)
        .await?
        .into_iter()
        .collect();

    if !force && !embedded_ids.is_empty() && embedded_ids.len() == chunks.len() {
        info!("Meeting {meeting_id} already indexed, skipping");
        return Ok(IndexReport {
            total_chunks: chunks.len(),
            embedded: 0,
            already_indexed: true,
            failures: Vec::new(),
        });
    }

    let expected_dimension = embedder.dimension();
    let mut report = IndexReport {
        total_chunks: chunks.len(),
        ..Default::default()
    };

    for chunk_model in chunks
        .iter()
        .filter(|c| !embedded_ids.contains(&c.id))
    {
        match backoff
            .retry("embed_chunk", || embedder.embed(&chunk_model.content))
            .await
        {
            Ok(vector) if vector.len() != expected_dimension => {
                error!(
                    "Embedding for chunk {} of meeting {meeting_id} has dimension {} != {}",
                    chunk_model.chunk_index,
                    vector.len(),
                    expected_dimension
                );
                report.failures.push(ChunkFailure {
                    chunk_index: chunk_model.chunk_index,
                    reason: format!(
                        "dimension mismatch: got {}, expected {expected_dimension}",
                        vector.len()
                    ),
                });
            }
            Ok(vector) => {
                match embedding_api::create(db, chunk_model.id, meeting_id, vector).await {
                    Ok(_) => report.embedded += 1,
                    Err(err) => report.failures.push(ChunkFailure {
                        chunk_index: chunk_model.chunk_index,
                        reason: err.to_string(),
                    }),
                }
            }
            Err(err) => {
                report.failures.push(ChunkFailure {
                    chunk_index: chunk_model.chunk_index,
                    reason: err.to_string(),
                });
            }
        }
    }

    if report.failures.is_empty() {
        info!(
            "Indexed meeting {meeting_id}: {} chunks, {} newly embedded",
            report.total_chunks, report.embedded
        );
    } else {
        warn!(
            "Indexed meeting {meeting_id} with {} failed chunks out of {}; \
             re-run indexing to retry them",
            report.failures.len(),
            report.total_chunks
        );
    }

    Ok(report)
}
