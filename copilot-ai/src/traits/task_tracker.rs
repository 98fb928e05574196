//! Task tracker provider trait.

use crate::types::task::TaskRef;
use crate::Error;
use async_trait::async_trait;

/// Abstraction for external task trackers that receive dispatched action items.
///
/// Implementations create tasks inside a provider-side project. Idempotency
/// is NOT the provider's job: the dispatcher keeps its own records, so
/// `create_task` may be called at most once per action item under normal
/// operation.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Create a task with the given content inside a project.
    async fn create_task(&self, project_id: &str, content: &str) -> Result<TaskRef, Error>;

    /// List open tasks in a project.
    async fn list_tasks(&self, project_id: &str) -> Result<Vec<TaskRef>, Error>;

    /// Mark a task as completed.
    async fn complete_task(&self, task_id: &str) -> Result<(), Error>;

    /// Return unique identifier for this provider (e.g. "todoist").
    fn provider_id(&self) -> &str;
}
