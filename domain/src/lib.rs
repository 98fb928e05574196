//! This module re-exports various items from the `entity_api` crate.
//!
//! The purpose of this re-export is to ensure that consumers of the `domain` crate do not need to
//! directly depend on the `entity_api` crate. By re-exporting these items, we provide a clear and
//! consistent interface for working with query filters within the domain layer, while encapsulating
//! the underlying implementation details in the `entity_api` crate.
pub use entity_api::query::{IntoQueryFilterMap, QueryFilterMap};

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{
    chunks, clients, embeddings, leads, meeting_status, meeting_type, meetings, project_mappings,
    summaries, task_dispatches, Id,
};

pub mod chunking;
pub mod client;
pub mod error;
pub mod indexer;
pub mod ingestion;
pub mod lead;
pub mod meeting;
pub mod prompt_catalog;
pub mod retrieval;
pub mod retry;
pub mod summarizer;
pub mod summary;
pub mod task_dispatch;

pub mod gateway;
