//! Types for task tracker operations.

use serde::{Deserialize, Serialize};

/// Reference to a task created in an external tracker.
///
/// The `id` is the tracker's own task identifier and is what the dispatcher
/// persists for idempotency; `url` is a human-facing deep link when the
/// provider supplies one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: String,
    pub content: String,
    pub url: Option<String>,
}
