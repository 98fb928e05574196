//! The meeting ingestion state machine.
//!
//! A meeting's pipeline state lives in its `status` column
//! (`Received → Transcribed → TypePending → Summarizing → Summarized →
//! TasksDispatched`, terminal `Failed`), so every wait, most importantly
//! the unbounded wait for a human type selection, is durable and survives
//! restarts. Webhook deliveries are deduplicated by the provider's meeting
//! id; a redelivery is a no-op, never a second meeting.

use crate::chunking::ChunkConfig;
use crate::error::{Error, ValidationErrorKind};
use crate::indexer;
use crate::retry::Backoff;
use crate::summarizer::{extract_action_items, SummarizerEngine};
use crate::task_dispatch::{self, DispatchOutcome};
use copilot_ai::traits::{embedding, task_tracker, transcript};
use entity::meeting_status::MeetingStatus;
use entity::meeting_type::MeetingType;
use entity::meetings::Model as MeetingModel;
use entity::summaries::Model as SummaryModel;
use entity::Id;
use entity_api::{client, meeting, summary};
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Orchestrates a meeting's path from webhook receipt to dispatched tasks.
///
/// One instance is shared by all meetings; per-meeting pipelines proceed
/// independently and the only cross-meeting state is the in-flight guard
/// that keeps summarization at most-once per (meeting, type) pair.
pub struct IngestionService {
    db: Arc<DatabaseConnection>,
    transcripts: Arc<dyn transcript::Provider>,
    embedder: Arc<dyn embedding::Provider>,
    tracker: Arc<dyn task_tracker::Provider>,
    engine: SummarizerEngine,
    events: EventPublisher,
    chunk_config: ChunkConfig,
    backoff: Backoff,
    in_flight: Mutex<HashSet<(Id, MeetingType)>>,
}

impl IngestionService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db: Arc<DatabaseConnection>,
        transcripts: Arc<dyn transcript::Provider>,
        embedder: Arc<dyn embedding::Provider>,
        tracker: Arc<dyn task_tracker::Provider>,
        engine: SummarizerEngine,
        events: EventPublisher,
        chunk_config: ChunkConfig,
        backoff: Backoff,
    ) -> Self {
        Self {
            db,
            transcripts,
            embedder,
            tracker,
            engine,
            events,
            chunk_config,
            backoff,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Handle a webhook delivery for an externally-recorded meeting.
    ///
    /// A duplicate external id returns the existing meeting untouched.
    /// Otherwise the meeting is created in `Received`, its transcript is
    /// fetched with bounded backoff and persisted, the presentation layer
    /// is notified to ask for a type, and the transcript is chunked and
    /// indexed for retrieval. Fetch exhaustion parks the meeting in
    /// `Failed` with the reason preserved.
    pub async fn ingest_webhook(&self, external_id: &str) -> Result<MeetingModel, Error> {
        if let Some(existing) = meeting::find_by_fireflies_id(&self.db, external_id).await? {
            // A redelivery can resume a meeting whose fetch previously
            // exhausted its retries; anything else is a plain duplicate.
            if existing.status == MeetingStatus::Failed && existing.transcript.is_none() {
                info!("Retrying transcript fetch for failed meeting {external_id}");
                return self.fetch_and_store(existing.id, external_id).await;
            }
            info!("Meeting for external id {external_id} already exists, ignoring redelivery");
            return Ok(existing);
        }

        let created = match meeting::create(&self.db, external_id, "(pending transcript)", None)
            .await
        {
            Ok(created) => created,
            Err(err) => {
                // A concurrent delivery may have won the unique-index race;
                // if so this delivery degrades to a no-op as well.
                if let Some(existing) =
                    meeting::find_by_fireflies_id(&self.db, external_id).await?
                {
                    info!("Concurrent webhook created meeting for {external_id}, ignoring");
                    return Ok(existing);
                }
                return Err(err.into());
            }
        };

        self.fetch_and_store(created.id, external_id).await
    }

    /// Fetch the transcript for a `Received` (or fetch-failed) meeting,
    /// persist it, notify, park the meeting for type selection and index it.
    async fn fetch_and_store(
        &self,
        meeting_id: Id,
        external_id: &str,
    ) -> Result<MeetingModel, Error> {
        let transcript = match self
            .backoff
            .retry("fetch_transcript", || {
                self.transcripts.fetch_transcript(external_id)
            })
            .await
        {
            Ok(transcript) => transcript,
            Err(err) => {
                let reason = format!("transcript fetch failed: {err}");
                return self.fail_meeting(meeting_id, reason, err.into()).await;
            }
        };

        let text = transcript.to_plain_text();
        let stored = meeting::store_transcript(
            &self.db,
            meeting_id,
            &transcript.title,
            transcript.date.map(Into::into),
            text,
        )
        .await?;

        let notify_chat_id = match stored.client_id {
            Some(client_id) => client::find_by_id(&self.db, client_id)
                .await
                .ok()
                .and_then(|c| c.telegram_chat_id),
            None => None,
        };
        self.events
            .publish(DomainEvent::MeetingTranscribed {
                meeting_id: stored.id,
                title: stored.title.clone(),
                notify_chat_id,
            })
            .await;

        let parked =
            meeting::update_status(&self.db, stored.id, MeetingStatus::TypePending, None).await?;

        // Retrieval indexing is independent of the summarization path;
        // failures stay on the index side and never park the meeting.
        match indexer::index_meeting(
            &self.db,
            &self.embedder,
            &self.backoff,
            &self.chunk_config,
            parked.id,
            false,
        )
        .await
        {
            Ok(report) if !report.failures.is_empty() => {
                warn!(
                    "Indexing of meeting {} left {} chunks unembedded",
                    parked.id,
                    report.failures.len()
                );
            }
            Ok(_) => {}
            Err(err) => {
                warn!("Indexing of meeting {} failed: {err}", parked.id);
            }
        }

        Ok(parked)
    }

    /// Apply a human type selection: run summarization, persist the summary,
    /// and dispatch extracted action items.
    ///
    /// Unknown tags are rejected without touching the meeting. A second
    /// selection for an already-summarized meeting appends a fresh summary.
    /// Engine failure parks the meeting in `Failed` with the selected type
    /// preserved, and a later selection restarts from there.
    pub async fn select_type(&self, meeting_id: Id, type_tag: &str) -> Result<SummaryModel, Error> {
        let meeting_type = MeetingType::parse_tag(type_tag).ok_or_else(|| {
            Error::validation(ValidationErrorKind::UnknownMeetingType(
                type_tag.to_string(),
            ))
        })?;

        let meeting = meeting::find_by_id(&self.db, meeting_id).await?;
        let transcript = meeting
            .transcript
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::validation(ValidationErrorKind::EmptyTranscript))?;

        // At most one summarization in flight per (meeting, type)
        {
            let mut in_flight = self.in_flight.lock().await;
            if !in_flight.insert((meeting_id, meeting_type.clone())) {
                return Err(Error::validation(ValidationErrorKind::Other(format!(
                    "summarization already in progress for meeting {meeting_id} as {meeting_type}"
                ))));
            }
        }

        let result = self
            .run_summarization(&meeting, &transcript, meeting_type.clone())
            .await;

        self.in_flight
            .lock()
            .await
            .remove(&(meeting_id, meeting_type));

        result
    }

    async fn run_summarization(
        &self,
        meeting: &MeetingModel,
        transcript: &str,
        meeting_type: MeetingType,
    ) -> Result<SummaryModel, Error> {
        meeting::update_type(&self.db, meeting.id, meeting_type.clone()).await?;
        meeting::update_status(&self.db, meeting.id, MeetingStatus::Summarizing, None).await?;

        let summary_result = match self.engine.summarize(transcript, meeting_type.clone()).await {
            Ok(summary_result) => summary_result,
            Err(err) => {
                let reason = format!("summarization as {meeting_type} failed: {err}");
                return self.fail_meeting(meeting.id, reason, err).await;
            }
        };

        // A deleted meeting must not gain an orphan summary: the
        // type-selection wait is cancelled by deleting the meeting, and a
        // late selection dies here.
        if !meeting::exists(&self.db, meeting.id).await? {
            warn!(
                "Meeting {} was deleted while summarizing, discarding result",
                meeting.id
            );
            return Err(Error::internal(crate::error::InternalErrorKind::Entity(
                crate::error::EntityErrorKind::NotFound,
            )));
        }

        let structured_value = summary_result
            .structured
            .as_ref()
            .map(|map| serde_json::Value::Object(map.clone()));
        let stored_summary = summary::create(
            &self.db,
            meeting.id,
            meeting_type.clone(),
            summary_result.text.clone(),
            structured_value,
            summary_result.truncated,
        )
        .await?;

        meeting::update_status(&self.db, meeting.id, MeetingStatus::Summarized, None).await?;
        self.events
            .publish(DomainEvent::SummaryCompleted {
                meeting_id: meeting.id,
                meeting_type: meeting_type.to_string(),
                summary: serde_json::to_value(&stored_summary).unwrap_or_default(),
            })
            .await;

        self.dispatch_action_items(meeting, &summary_result).await?;

        Ok(stored_summary)
    }

    /// Hand extracted action items to the task dispatcher, best-effort.
    ///
    /// A meeting with no linked client or no project mapping stays in
    /// `Summarized`; re-selecting the type retries dispatch once the
    /// mapping exists. Per-item failures are reported in the outcome event
    /// and the meeting still completes.
    async fn dispatch_action_items(
        &self,
        meeting: &MeetingModel,
        summary_result: &crate::summarizer::SummaryResult,
    ) -> Result<(), Error> {
        let items = summary_result
            .structured
            .as_ref()
            .map(extract_action_items)
            .unwrap_or_default();

        if items.is_empty() {
            debug!(
                "No action items extracted for meeting {}, completing pipeline",
                meeting.id
            );
            meeting::update_status(&self.db, meeting.id, MeetingStatus::TasksDispatched, None)
                .await?;
            return Ok(());
        }

        let Some(client_id) = meeting.client_id else {
            info!(
                "Meeting {} has no linked client; leaving action items undispatched",
                meeting.id
            );
            return Ok(());
        };

        match task_dispatch::dispatch(
            &self.db,
            &self.tracker,
            &self.backoff,
            meeting.id,
            client_id,
            &items,
        )
        .await
        {
            Ok(outcomes) => {
                let (created, skipped, failed) = tally(&outcomes);
                self.events
                    .publish(DomainEvent::TasksDispatched {
                        meeting_id: meeting.id,
                        created,
                        skipped,
                        failed,
                    })
                    .await;
                meeting::update_status(
                    &self.db,
                    meeting.id,
                    MeetingStatus::TasksDispatched,
                    None,
                )
                .await?;
            }
            Err(err) => {
                // Typically a missing project mapping; the summary stands
                // and dispatch reruns on the next type selection.
                warn!(
                    "Task dispatch for meeting {} did not run: {err}",
                    meeting.id
                );
            }
        }

        Ok(())
    }

    /// Park a meeting in the terminal failed state, notify, and surface the
    /// original error.
    async fn fail_meeting<T>(&self, meeting_id: Id, reason: String, err: Error) -> Result<T, Error> {
        error!("Meeting {meeting_id} failed: {reason}");
        meeting::update_status(
            &self.db,
            meeting_id,
            MeetingStatus::Failed,
            Some(reason.clone()),
        )
        .await?;
        self.events
            .publish(DomainEvent::MeetingFailed { meeting_id, reason })
            .await;
        Err(err)
    }

    /// Delete a meeting, cancelling any pending type-selection wait. Owned
    /// rows (summaries, chunks, embeddings, dispatch records) cascade.
    pub async fn delete_meeting(&self, meeting_id: Id) -> Result<(), Error> {
        Ok(meeting::delete_by_id(&self.db, meeting_id).await?)
    }

    /// Index (or re-index with `force`) a meeting's transcript for retrieval.
    pub async fn index_meeting(
        &self,
        meeting_id: Id,
        force: bool,
    ) -> Result<indexer::IndexReport, Error> {
        indexer::index_meeting(
            &self.db,
            &self.embedder,
            &self.backoff,
            &self.chunk_config,
            meeting_id,
            force,
        )
        .await
    }
}

fn tally(outcomes: &[DispatchOutcome]) -> (usize, usize, usize) {
    let created = outcomes.iter().filter(|o| o.created).count();
    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    let skipped = outcomes.len() - created - failed;
    (created, skipped, failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(created: bool, error: Option<&str>) -> DispatchOutcome {
        DispatchOutcome {
            item: "do the thing".to_string(),
            created,
            task_ref: created.then(|| "task-1".to_string()),
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn tally_separates_created_skipped_and_failed() {
        let outcomes = vec![
            outcome(true, None),
            outcome(false, None),
            outcome(false, Some("tracker down")),
            outcome(true, None),
        ];
        assert_eq!(tally(&outcomes), (2, 1, 1));
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::prompt_catalog::PromptCatalog;
    use async_trait::async_trait;
    use copilot_ai::types::transcript::Transcript;
    use copilot_ai::{Error as CapabilityError, TaskRef};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::time::Duration;

    struct PanicTranscripts;

    #[async_trait]
    impl transcript::Provider for PanicTranscripts {
        async fn fetch_transcript(&self, _external_id: &str) -> Result<Transcript, CapabilityError> {
            panic!("transcript source must not be called");
        }
        fn provider_id(&self) -> &str {
            "test"
        }
    }

    struct PanicEmbedder;

    #[async_trait]
    impl embedding::Provider for PanicEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, CapabilityError> {
            panic!("embedder must not be called");
        }
        fn dimension(&self) -> usize {
            4
        }
        fn provider_id(&self) -> &str {
            "test"
        }
    }

    struct PanicTracker;

    #[async_trait]
    impl task_tracker::Provider for PanicTracker {
        async fn create_task(
            &self,
            _project_id: &str,
            _content: &str,
        ) -> Result<TaskRef, CapabilityError> {
            panic!("tracker must not be called");
        }
        async fn list_tasks(&self, _project_id: &str) -> Result<Vec<TaskRef>, CapabilityError> {
            panic!("tracker must not be called");
        }
        async fn complete_task(&self, _task_id: &str) -> Result<(), CapabilityError> {
            panic!("tracker must not be called");
        }
        fn provider_id(&self) -> &str {
            "test"
        }
    }

    struct PanicLlm;

    #[async_trait]
    impl copilot_ai::traits::language_model::Provider for PanicLlm {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, CapabilityError> {
            panic!("language model must not be called");
        }
        fn provider_id(&self) -> &str {
            "test"
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> IngestionService {
        let backoff = Backoff::new(1, Duration::from_millis(1), Duration::from_millis(1));
        IngestionService::new(
            Arc::new(db),
            Arc::new(PanicTranscripts),
            Arc::new(PanicEmbedder),
            Arc::new(PanicTracker),
            SummarizerEngine::new(
                Arc::new(PanicLlm),
                PromptCatalog::builtin(),
                10_000,
                backoff.clone(),
            ),
            EventPublisher::new(),
            ChunkConfig::default(),
            backoff,
        )
    }

    fn meeting_model(fireflies_id: &str) -> MeetingModel {
        let now = chrono::Utc::now();
        MeetingModel {
            id: Id::new_v4(),
            fireflies_id: Some(fireflies_id.to_string()),
            title: "Q3 roadmap".to_string(),
            date: None,
            transcript: Some("Alice: Discussed Q3 roadmap.".to_string()),
            client_id: None,
            meeting_type: None,
            status: MeetingStatus::TypePending,
            error_message: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn duplicate_webhook_is_a_no_op_without_provider_calls() {
        let existing = meeting_model("ff-123");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing.clone()]])
            .into_connection();

        let service = service_with(db);
        let result = service.ingest_webhook("ff-123").await.unwrap();
        assert_eq!(result.id, existing.id);
    }

    #[tokio::test]
    async fn unknown_type_tag_is_rejected_before_any_database_access() {
        // No scripted query results: any database touch would error, and
        // the panic providers guard the capability seams.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = service_with(db);
        let err = service
            .select_type(Id::new_v4(), "unknown_type")
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            crate::error::DomainErrorKind::Validation(ValidationErrorKind::UnknownMeetingType(
                "unknown_type".to_string()
            ))
        );
    }
}
