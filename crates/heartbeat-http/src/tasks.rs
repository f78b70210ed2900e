//! Task operations.

use async_trait::async_trait;
use tracing::{debug, instrument};

use heartbeat_core::{NewTask, Page, Result, Task, TaskApi, TaskId, TaskUpdate};

use crate::endpoints::{TASKS, task};
use crate::gateway::Gateway;
use crate::request::PendingRequest;

/// Task CRUD over the authenticated gateway.
#[derive(Debug, Clone)]
pub struct TaskClient {
    gateway: Gateway,
}

impl TaskClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl TaskApi for TaskClient {
    #[instrument(skip(self))]
    async fn list_tasks(&self, page: Page) -> Result<Vec<Task>> {
        let mut request = PendingRequest::get(TASKS);
        if let Some(skip) = page.skip {
            request = request.query("skip", skip);
        }
        if let Some(limit) = page.limit {
            request = request.query("limit", limit);
        }

        let tasks: Vec<Task> = self.gateway.send_json(request).await?;
        debug!(count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_task(&self, id: TaskId) -> Result<Task> {
        self.gateway.send_json(PendingRequest::get(task(id))).await
    }

    #[instrument(skip(self, new_task))]
    async fn create_task(&self, new_task: &NewTask) -> Result<Task> {
        let request = PendingRequest::post(TASKS).json(new_task)?;
        self.gateway.send_json(request).await
    }

    #[instrument(skip(self, update), fields(id = %id))]
    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<Task> {
        let request = PendingRequest::put(task(id)).json(update)?;
        self.gateway.send_json(request).await
    }
}
