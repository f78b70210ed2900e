//! Task representations.

use serde::{Deserialize, Serialize};

use crate::types::TaskId;

use super::User;

/// A task as returned by the task endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    pub creator_id: i64,
    pub creator: User,
}

/// Request body for creating a task.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of a task. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl TaskUpdate {
    /// Returns true if the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.is_active.is_none()
    }
}

/// Pagination window for listing tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_omits_absent_fields() {
        let update = TaskUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"is_active": false}));
        assert!(!update.is_empty());
        assert!(TaskUpdate::default().is_empty());
    }

    #[test]
    fn task_parses_nested_creator() {
        let task: Task = serde_json::from_value(json!({
            "id": 3,
            "title": "Walk together",
            "description": null,
            "is_active": true,
            "creator_id": 1,
            "creator": {"id": 1, "username": "alice", "score": 5}
        }))
        .unwrap();
        assert_eq!(task.id, TaskId::new(3));
        assert_eq!(task.creator.username, "alice");
    }
}
