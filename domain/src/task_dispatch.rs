//! Action-item dispatch to the external task tracker.
//!
//! Dispatch is idempotent per (meeting, action item text): a dispatch record
//! is written before the tracker call and checked first on every run. Items
//! dispatch independently; partial success is a normal, reportable outcome.

use crate::error::{Error, InternalErrorKind};
use crate::retry::Backoff;
use copilot_ai::traits::task_tracker;
use entity::task_dispatches::Model as TaskDispatchModel;
use entity::Id;
use entity_api::{project_mapping, task_dispatch};
use log::*;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Per-item result of a dispatch run.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// The action item text as extracted from the summary.
    pub item: String,
    /// Whether the external task was created by this run. `false` both for
    /// duplicates (task already existed) and for failures (see `error`).
    pub created: bool,
    /// External tracker task id, when one is known.
    pub task_ref: Option<String>,
    /// Failure detail for items that could not be dispatched this run.
    pub error: Option<String>,
}

/// What to do with one action item, given its existing dispatch record.
#[derive(Debug, PartialEq)]
pub(crate) enum ItemPlan {
    /// A record with a task ref exists: the tracker already has this task.
    AlreadyDispatched { task_id: String },
    /// A record exists but the external call never completed; retry it.
    RetryExternal { record_id: Id },
    /// No record yet: write one, then call the tracker.
    CreateRecord,
}

pub(crate) fn plan_item(existing: Option<&TaskDispatchModel>) -> ItemPlan {
    match existing {
        Some(record) => match &record.todoist_task_id {
            Some(task_id) => ItemPlan::AlreadyDispatched {
                task_id: task_id.clone(),
            },
            None => ItemPlan::RetryExternal {
                record_id: record.id,
            },
        },
        None => ItemPlan::CreateRecord,
    }
}

/// Dispatch a meeting's action items to the client's tracker project.
///
/// Fails as a whole only when the client has no project mapping; any
/// per-item trouble (tracker rejection, database hiccup) lands in that
/// item's outcome and the rest of the batch proceeds.
pub async fn dispatch(
    db: &DatabaseConnection,
    tracker: &Arc<dyn task_tracker::Provider>,
    backoff: &Backoff,
    meeting_id: Id,
    client_id: Id,
    action_items: &[String],
) -> Result<Vec<DispatchOutcome>, Error> {
    let mapping = project_mapping::find_by_client_id(db, client_id)
        .await?
        .ok_or_else(|| {
            Error::internal(InternalErrorKind::Other(format!(
                "no project mapping for client {client_id}; cannot dispatch action items"
            )))
        })?;

    let mut outcomes = Vec::with_capacity(action_items.len());
    for item in action_items {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        outcomes.push(
            dispatch_item(
                db,
                tracker,
                backoff,
                meeting_id,
                client_id,
                &mapping.todoist_project_id,
                item,
            )
            .await,
        );
    }

    let created = outcomes.iter().filter(|o| o.created).count();
    info!(
        "Dispatched action items for meeting {meeting_id}: {created} created, {} total",
        outcomes.len()
    );

    Ok(outcomes)
}

/// Dispatch a single item. Every failure mode is folded into the returned
/// outcome so one item can never abort the batch.
async fn dispatch_item(
    db: &DatabaseConnection,
    tracker: &Arc<dyn task_tracker::Provider>,
    backoff: &Backoff,
    meeting_id: Id,
    client_id: Id,
    project_id: &str,
    item: &str,
) -> DispatchOutcome {
    let existing = match task_dispatch::find_by_meeting_and_content(db, meeting_id, item).await {
        Ok(existing) => existing,
        Err(err) => {
            warn!("Dispatch record lookup failed for meeting {meeting_id}: {err}");
            return DispatchOutcome {
                item: item.to_string(),
                created: false,
                task_ref: None,
                error: Some(err.to_string()),
            };
        }
    };

    let record_id = match plan_item(existing.as_ref()) {
        ItemPlan::AlreadyDispatched { task_id } => {
            debug!("Action item already dispatched for meeting {meeting_id}, skipping");
            return DispatchOutcome {
                item: item.to_string(),
                created: false,
                task_ref: Some(task_id),
                error: None,
            };
        }
        ItemPlan::RetryExternal { record_id } => record_id,
        ItemPlan::CreateRecord => {
            // Record first: a crash after this point leaves a ref-less row
            // that the next run picks up instead of duplicating the task.
            match task_dispatch::create(db, meeting_id, client_id, item).await {
                Ok(record) => record.id,
                Err(err) => {
                    warn!("Failed to record dispatch for meeting {meeting_id}: {err}");
                    return DispatchOutcome {
                        item: item.to_string(),
                        created: false,
                        task_ref: None,
                        error: Some(err.to_string()),
                    };
                }
            }
        }
    };

    match backoff
        .retry("create_task", || tracker.create_task(project_id, item))
        .await
    {
        Ok(task) => {
            if let Err(err) = task_dispatch::set_task_id(db, record_id, &task.id).await {
                warn!("Created task {} but failed to persist its ref: {err}", task.id);
            }
            DispatchOutcome {
                item: item.to_string(),
                created: true,
                task_ref: Some(task.id),
                error: None,
            }
        }
        Err(err) => {
            warn!("Tracker rejected action item for meeting {meeting_id}: {err}");
            DispatchOutcome {
                item: item.to_string(),
                created: false,
                task_ref: None,
                error: Some(err.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(task_id: Option<&str>) -> TaskDispatchModel {
        let now = chrono::Utc::now();
        TaskDispatchModel {
            id: Id::new_v4(),
            meeting_id: Id::new_v4(),
            client_id: Id::new_v4(),
            content: "Send the proposal".to_string(),
            todoist_task_id: task_id.map(str::to_string),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn fresh_items_create_a_record_first() {
        assert_eq!(plan_item(None), ItemPlan::CreateRecord);
    }

    #[test]
    fn completed_records_are_never_redispatched() {
        let existing = record(Some("task-42"));
        assert_eq!(
            plan_item(Some(&existing)),
            ItemPlan::AlreadyDispatched {
                task_id: "task-42".to_string()
            }
        );
    }

    #[test]
    fn refless_records_retry_the_external_call() {
        let existing = record(None);
        assert_eq!(
            plan_item(Some(&existing)),
            ItemPlan::RetryExternal {
                record_id: existing.id
            }
        );
    }
}
