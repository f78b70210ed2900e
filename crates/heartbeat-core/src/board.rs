//! Local mirror of the task list.

use tracing::{debug, warn};

use crate::Result;
use crate::models::{NewTask, Page, Task, TaskUpdate};
use crate::traits::TaskApi;
use crate::types::TaskId;

/// Task list state that mirrors server responses.
///
/// Every mutation goes to the backend first; the local list only changes
/// after the backend has answered successfully.
#[derive(Debug)]
pub struct TaskBoard<A> {
    api: A,
    tasks: Vec<Task>,
}

impl<A: TaskApi> TaskBoard<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tasks: Vec::new(),
        }
    }

    /// Returns the tasks currently held.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns a held task by id.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Replace the list with the backend's. The list is kept on failure.
    pub async fn refresh(&mut self, page: Page) -> Result<&[Task]> {
        match self.api.list_tasks(page).await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "Task list refreshed");
                self.tasks = tasks;
                Ok(&self.tasks)
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch tasks");
                Err(e)
            }
        }
    }

    /// Create a task and append the stored result.
    pub async fn create(&mut self, task: &NewTask) -> Result<&Task> {
        let created = self.api.create_task(task).await?;
        self.tasks.push(created);
        let index = self.tasks.len() - 1;
        Ok(&self.tasks[index])
    }

    /// Update a task and replace the held copy, if the task is held.
    pub async fn update(&mut self, id: TaskId, update: &TaskUpdate) -> Result<Task> {
        let updated = self.api.update_task(id, update).await?;
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Returns the underlying task API.
    pub fn api(&self) -> &A {
        &self.api
    }
}
