use async_trait::async_trait;
use copilot_ai::traits::{embedding, language_model, task_tracker, transcript};
use domain::chunking::ChunkConfig;
use domain::gateway::anthropic::AnthropicClient;
use domain::gateway::fireflies::FirefliesClient;
use domain::gateway::openai::OpenAiEmbeddingsClient;
use domain::gateway::todoist::TodoistClient;
use domain::ingestion::IngestionService;
use domain::prompt_catalog::PromptCatalog;
use domain::retry::Backoff;
use domain::summarizer::SummarizerEngine;
use events::{DomainEvent, EventHandler, EventPublisher};
use log::*;
use service::{config::Config, logging::Logger};
use std::sync::Arc;

/// Stand-in for the chat presentation layer: pipeline events are logged so
/// an operator can follow a meeting's progress without the bot attached.
/// Delivery is best-effort by design.
struct LogEventHandler;

#[async_trait]
impl EventHandler for LogEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::MeetingTranscribed {
                meeting_id, title, ..
            } => {
                info!("Meeting {meeting_id} transcribed: \"{title}\" - awaiting type selection");
            }
            DomainEvent::SummaryCompleted {
                meeting_id,
                meeting_type,
                ..
            } => {
                info!("Meeting {meeting_id} summarized as {meeting_type}");
            }
            DomainEvent::TasksDispatched {
                meeting_id,
                created,
                skipped,
                failed,
            } => {
                info!(
                    "Meeting {meeting_id} tasks dispatched: {created} created, \
                     {skipped} skipped, {failed} failed"
                );
            }
            DomainEvent::MeetingFailed { meeting_id, reason } => {
                warn!("Meeting {meeting_id} failed: {reason}");
            }
        }
    }
}

fn build_app_state(
    config: Config,
    db: Arc<service::DatabaseConnection>,
) -> Result<web::AppState, Box<dyn std::error::Error + Send + Sync>> {
    for (name, key) in [
        ("FIREFLIES_API_KEY", config.fireflies_api_key()),
        ("ANTHROPIC_API_KEY", config.anthropic_api_key()),
        ("OPENAI_API_KEY", config.openai_api_key()),
        ("TODOIST_API_TOKEN", config.todoist_api_token()),
    ] {
        if key.is_none() {
            warn!("{name} is not set; calls to that provider will be rejected");
        }
    }

    let transcripts: Arc<dyn transcript::Provider> = Arc::new(FirefliesClient::new(
        &config.fireflies_api_key().unwrap_or_default(),
        config.fireflies_base_url(),
    )?);
    let llm: Arc<dyn language_model::Provider> = Arc::new(AnthropicClient::new(
        &config.anthropic_api_key().unwrap_or_default(),
        config.anthropic_base_url(),
        &config.anthropic_model,
        config.anthropic_max_tokens,
    )?);
    let embedder: Arc<dyn embedding::Provider> = Arc::new(OpenAiEmbeddingsClient::new(
        &config.openai_api_key().unwrap_or_default(),
        config.openai_base_url(),
        &config.embedding_model,
        config.embedding_dimension,
    )?);
    let tracker: Arc<dyn task_tracker::Provider> = Arc::new(TodoistClient::new(
        &config.todoist_api_token().unwrap_or_default(),
        config.todoist_base_url(),
    )?);

    let backoff = Backoff::from_config(&config);
    let chunk_config = ChunkConfig::new(config.chunk_size, config.chunk_overlap)?;
    let engine = SummarizerEngine::new(
        llm.clone(),
        PromptCatalog::builtin(),
        config.prompt_budget_chars,
        backoff.clone(),
    );
    let events = EventPublisher::new().with_handler(Arc::new(LogEventHandler));

    let ingestion = Arc::new(IngestionService::new(
        db.clone(),
        transcripts,
        embedder.clone(),
        tracker,
        engine,
        events,
        chunk_config,
        backoff,
    ));

    Ok(web::AppState::new(config, &db, ingestion, embedder, llm))
}

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let interface = config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = config.port;

    let app_state = match build_app_state(config, db) {
        Ok(app_state) => app_state,
        Err(e) => {
            error!("Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    let router = web::router::define_routes(app_state);

    let address = format!("{interface}:{port}");
    info!("Consultant Copilot API listening on {address}");

    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {address}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
