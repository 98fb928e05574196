//! HTTP layer: axum controllers over the domain pipeline.

use copilot_ai::traits::{embedding, language_model};
use domain::ingestion::IngestionService;
use domain::retry::Backoff;
use sea_orm::DatabaseConnection;
use service::config::Config;
use std::sync::Arc;

pub mod controller;
pub mod error;
pub mod params;
pub mod router;

pub use error::{Error, Result};

/// Application state shared by every controller.
///
/// Needs to implement Clone to be able to be passed into Router as State.
#[derive(Clone)]
pub struct AppState {
    pub database_connection: Arc<DatabaseConnection>,
    pub config: Config,
    /// The meeting pipeline orchestrator (webhooks, type selection).
    pub ingestion: Arc<IngestionService>,
    /// Embedding capability shared by indexing and retrieval.
    pub embedder: Arc<dyn embedding::Provider>,
    /// Language-model capability for retrieval-augmented answers.
    pub llm: Arc<dyn language_model::Provider>,
    pub backoff: Backoff,
}

impl AppState {
    pub fn new(
        config: Config,
        db: &Arc<DatabaseConnection>,
        ingestion: Arc<IngestionService>,
        embedder: Arc<dyn embedding::Provider>,
        llm: Arc<dyn language_model::Provider>,
    ) -> Self {
        let backoff = Backoff::from_config(&config);
        Self {
            database_connection: Arc::clone(db),
            config,
            ingestion,
            embedder,
            llm,
            backoff,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.database_connection.as_ref()
    }
}
