//! Retrieval: nearest-neighbor lookup over stored chunk embeddings and the
//! retrieval-augmented `ask` operation on top of it.

use crate::error::{Error, InternalErrorKind, ValidationErrorKind};
use crate::retry::Backoff;
use copilot_ai::traits::{embedding, language_model};
use entity_api::embedding::{count_all, count_indexed_meetings, find_candidates, CandidateRow};
use entity::Id;
use log::*;
use sea_orm::DatabaseConnection;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// System prompt for retrieval-augmented answers over past meetings.
const ASK_SYSTEM_PROMPT: &str = "You are an assistant for a business consultant. Answer questions \
strictly from the provided meeting transcript excerpts.\n\
Rules:\n\
1. Be concrete: quote key phrases, name dates, decisions, numbers and participants that appear \
in the context.\n\
2. Attribute each point to its source meeting by title and date.\n\
3. If the context is insufficient for a full answer, say what is missing.\n\
4. Never invent information that is not in the context.";

/// Answer returned when retrieval finds nothing in scope.
const NO_SOURCES_ANSWER: &str =
    "I could not find anything relevant to that question in the meeting history.";

/// Swappable nearest-neighbor index over fixed-dimension vectors.
///
/// `search` returns up to `k` ids ranked by descending cosine similarity.
/// Ranking among equal scores preserves insertion order, so callers control
/// tie-breaking by the order they `add` entries. Exact implementations
/// return the true top-k; approximate ones (inverted-file, graph-based)
/// only promise high-probability top-k and must be validated by recall
/// sampling rather than exact comparison.
pub trait VectorIndex: Send + Sync {
    fn add(&mut self, id: Id, vector: Vec<f32>);
    fn search(&self, query: &[f32], k: usize) -> Vec<(Id, f32)>;
}

/// Exact cosine-similarity scan. Incremental by construction: entries are
/// scored on demand, so concurrent indexing never requires a rebuild or a
/// versioned swap.
#[derive(Default)]
pub struct ExactCosineIndex {
    entries: Vec<(Id, Vec<f32>)>,
}

impl ExactCosineIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VectorIndex for ExactCosineIndex {
    fn add(&mut self, id: Id, vector: Vec<f32>) {
        self.entries.push((id, vector));
    }

    fn search(&self, query: &[f32], k: usize) -> Vec<(Id, f32)> {
        let mut scored: Vec<(Id, f32)> = self
            .entries
            .iter()
            .map(|(id, vector)| (*id, cosine_similarity(query, vector)))
            .collect();
        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

/// Cosine similarity of two equal-length vectors; zero vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Optional narrowing of retrieval to one client or one meeting.
#[derive(Debug, Clone, Default)]
pub struct RetrievalScope {
    pub client_id: Option<Id>,
    pub meeting_id: Option<Id>,
}

/// One ranked retrieval hit.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub chunk_id: Id,
    pub meeting_id: Id,
    pub meeting_title: String,
    pub meeting_date: Option<String>,
    pub chunk_index: i32,
    pub content: String,
    pub score: f32,
}

/// An answer produced over the retrieved context, with its sources.
#[derive(Debug, Clone)]
pub struct AskAnswer {
    pub answer: String,
    pub sources: Vec<RetrievedChunk>,
}

/// Return the `top_k` chunks nearest to `query` by cosine similarity,
/// optionally scoped to a client or meeting.
///
/// `top_k` must be positive; asking for more results than exist in scope
/// returns everything available. Ties rank by earliest chunk index, then
/// earliest meeting creation time, keeping results deterministic.
pub async fn retrieve(
    db: &DatabaseConnection,
    embedder: &Arc<dyn embedding::Provider>,
    backoff: &Backoff,
    query: &str,
    top_k: usize,
    scope: &RetrievalScope,
) -> Result<Vec<RetrievedChunk>, Error> {
    if top_k == 0 {
        return Err(Error::validation(ValidationErrorKind::InvalidQuery(
            "top_k must be positive".to_string(),
        )));
    }
    if query.trim().is_empty() {
        return Err(Error::validation(ValidationErrorKind::InvalidQuery(
            "query must not be empty".to_string(),
        )));
    }

    let query_vector = backoff
        .retry("embed_query", || embedder.embed(query))
        .await?;
    if query_vector.len() != embedder.dimension() {
        return Err(Error::internal(InternalErrorKind::Config(format!(
            "query embedding dimension {} does not match configured dimension {}",
            query_vector.len(),
            embedder.dimension()
        ))));
    }

    let candidates = find_candidates(db, scope.client_id, scope.meeting_id).await?;
    debug!(
        "Ranking {} candidate chunks for query ({} in scope)",
        candidates.len(),
        top_k
    );

    Ok(rank_candidates(&query_vector, candidates, top_k))
}

/// Rank candidate rows against a query vector. Candidates whose stored
/// vector does not match the query dimension are skipped with a warning;
/// indexing enforces the dimension, so a mismatch here means corrupt data.
pub(crate) fn rank_candidates(
    query_vector: &[f32],
    candidates: Vec<CandidateRow>,
    top_k: usize,
) -> Vec<RetrievedChunk> {
    let mut usable: Vec<CandidateRow> = candidates
        .into_iter()
        .filter(|row| {
            if row.vector.len() == query_vector.len() {
                true
            } else {
                warn!(
                    "Skipping chunk {} with stored dimension {} != query dimension {}",
                    row.chunk_id,
                    row.vector.len(),
                    query_vector.len()
                );
                false
            }
        })
        .collect();

    // Insertion order is the tie-break order: earliest chunk index, then
    // earliest meeting creation time. The stable index sort preserves it
    // among equal scores.
    usable.sort_by(|a, b| {
        a.chunk_index
            .cmp(&b.chunk_index)
            .then(a.meeting_created_at.cmp(&b.meeting_created_at))
            .then(a.chunk_id.cmp(&b.chunk_id))
    });

    let mut index = ExactCosineIndex::new();
    let mut by_id: HashMap<Id, CandidateRow> = HashMap::with_capacity(usable.len());
    for row in usable {
        index.add(row.chunk_id, row.vector.clone());
        by_id.insert(row.chunk_id, row);
    }

    index
        .search(query_vector, top_k)
        .into_iter()
        .filter_map(|(id, score)| {
            by_id.remove(&id).map(|row| RetrievedChunk {
                chunk_id: row.chunk_id,
                meeting_id: row.meeting_id,
                meeting_title: row.meeting_title,
                meeting_date: row.meeting_date.map(|d| d.date_naive().to_string()),
                chunk_index: row.chunk_index,
                content: row.content,
                score,
            })
        })
        .collect()
}

/// Size of the retrieval index.
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub total_chunks: u64,
    pub indexed_meetings: u64,
}

/// How much of the corpus is currently searchable.
pub async fn stats(db: &DatabaseConnection) -> Result<IndexStats, Error> {
    Ok(IndexStats {
        total_chunks: count_all(db).await?,
        indexed_meetings: count_indexed_meetings(db).await?,
    })
}

/// Answer a question over the indexed meeting history.
///
/// Retrieves the nearest chunks in scope, builds a source-labelled context
/// and runs one completion over it. No relevant chunks short-circuits to a
/// fixed answer with no sources.
pub async fn ask(
    db: &DatabaseConnection,
    embedder: &Arc<dyn embedding::Provider>,
    llm: &Arc<dyn language_model::Provider>,
    backoff: &Backoff,
    question: &str,
    top_k: usize,
    scope: &RetrievalScope,
) -> Result<AskAnswer, Error> {
    let sources = retrieve(db, embedder, backoff, question, top_k, scope).await?;

    if sources.is_empty() {
        return Ok(AskAnswer {
            answer: NO_SOURCES_ANSWER.to_string(),
            sources,
        });
    }

    let context = build_context(&sources);
    let user_prompt = format!(
        "Context from meeting transcripts:\n\n{context}\n\n---\n\n\
         Question: {question}\n\n\
         Give a detailed answer with concrete facts from the transcripts:"
    );

    let answer = backoff
        .retry("ask", || llm.complete(ASK_SYSTEM_PROMPT, &user_prompt))
        .await?;

    Ok(AskAnswer { answer, sources })
}

/// Label each retrieved chunk with its source meeting for the prompt.
fn build_context(sources: &[RetrievedChunk]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let date_note = source
                .meeting_date
                .as_ref()
                .map(|date| format!(" ({date})"))
                .unwrap_or_default();
            format!(
                "[Source {}: {}{}]\n{}",
                i + 1,
                source.meeting_title,
                date_note,
                source.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};

    fn candidate(
        chunk_index: i32,
        content: &str,
        vector: Vec<f32>,
        created_offset_secs: i64,
    ) -> CandidateRow {
        let created = Utc::now() + ChronoDuration::seconds(created_offset_secs);
        CandidateRow {
            chunk_id: Id::new_v4(),
            meeting_id: Id::new_v4(),
            chunk_index,
            content: content.to_string(),
            vector,
            meeting_title: "Weekly sync".to_string(),
            meeting_date: None,
            meeting_created_at: created.into(),
        }
    }

    #[test]
    fn cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn nearest_chunk_ranks_first() {
        let query = vec![1.0, 0.0, 0.0];
        let candidates = vec![
            candidate(0, "orthogonal", vec![0.0, 1.0, 0.0], 0),
            candidate(1, "paraphrase", vec![0.9, 0.1, 0.0], 0),
            candidate(2, "opposite", vec![-1.0, 0.0, 0.0], 0),
        ];

        let ranked = rank_candidates(&query, candidates, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].content, "paraphrase");
        assert_eq!(ranked[1].content, "orthogonal");
    }

    #[test]
    fn requesting_more_than_available_returns_all() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            candidate(0, "one", vec![1.0, 0.0], 0),
            candidate(1, "two", vec![0.5, 0.5], 0),
        ];

        let ranked = rank_candidates(&query, candidates, 50);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn ties_break_by_chunk_index_then_meeting_age() {
        let query = vec![1.0, 0.0];
        // Identical vectors so every score ties
        let newer = candidate(0, "newer meeting", vec![1.0, 0.0], 100);
        let older = candidate(0, "older meeting", vec![1.0, 0.0], -100);
        let later_chunk = candidate(5, "later chunk", vec![1.0, 0.0], -200);

        let ranked = rank_candidates(
            &query,
            vec![newer.clone(), later_chunk.clone(), older.clone()],
            3,
        );

        assert_eq!(ranked[0].content, "older meeting");
        assert_eq!(ranked[1].content, "newer meeting");
        assert_eq!(ranked[2].content, "later chunk");
    }

    #[test]
    fn mismatched_dimensions_are_skipped() {
        let query = vec![1.0, 0.0];
        let good = candidate(0, "good", vec![1.0, 0.0], 0);
        let bad = candidate(1, "bad", vec![1.0, 0.0, 0.0], 0);

        let ranked = rank_candidates(&query, vec![good, bad], 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].content, "good");
    }

    #[test]
    fn exact_index_returns_true_top_k_for_exact_match() {
        // An exact paraphrase of the query must always surface under the
        // exact scan, so recall here is 1.0 by construction.
        let mut index = ExactCosineIndex::new();
        let target = Id::new_v4();
        index.add(Id::new_v4(), vec![0.1, 0.9]);
        index.add(target, vec![0.8, 0.6]);
        index.add(Id::new_v4(), vec![-0.5, 0.5]);

        let hits = index.search(&[0.8, 0.6], 1);
        assert_eq!(hits[0].0, target);
    }

    #[test]
    fn build_context_labels_sources() {
        let chunk = RetrievedChunk {
            chunk_id: Id::new_v4(),
            meeting_id: Id::new_v4(),
            meeting_title: "Pricing review".to_string(),
            meeting_date: Some("2026-07-01".to_string()),
            chunk_index: 0,
            content: "We agreed to raise the starter tier to $49.".to_string(),
            score: 0.92,
        };

        let context = build_context(&[chunk]);
        assert!(context.starts_with("[Source 1: Pricing review (2026-07-01)]"));
        assert!(context.contains("$49"));
    }
}
