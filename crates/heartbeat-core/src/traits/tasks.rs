//! Task resource trait.

use async_trait::async_trait;

use crate::Result;
use crate::models::{NewTask, Page, Task, TaskUpdate};
use crate::types::TaskId;

/// Task CRUD operations against the backend.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// List tasks within the given page window.
    async fn list_tasks(&self, page: Page) -> Result<Vec<Task>>;

    /// Fetch a single task.
    async fn get_task(&self, id: TaskId) -> Result<Task>;

    /// Create a task and return the stored representation.
    async fn create_task(&self, task: &NewTask) -> Result<Task>;

    /// Apply a partial update and return the stored representation.
    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<Task>;
}
