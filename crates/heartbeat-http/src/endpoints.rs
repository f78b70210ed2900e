//! Endpoint paths and wire types.

use serde::{Deserialize, Serialize};

use heartbeat_core::TaskId;

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Password login, form-encoded.
pub const LOGIN: &str = "/auth/token";

/// Account registration, JSON.
pub const REGISTER: &str = "/auth/register";

/// Access-token refresh. The refresh token travels as a query parameter.
pub const REFRESH: &str = "/auth/refresh";

/// The signed-in user.
pub const CURRENT_USER: &str = "/users/me";

/// Task collection. The trailing slash is part of the route.
pub const TASKS: &str = "/tasks/";

/// A single task.
pub fn task(id: TaskId) -> String {
    format!("/tasks/{}", id)
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Form body for login.
#[derive(Serialize)]
pub(crate) struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Query parameters for refresh.
#[derive(Serialize)]
pub(crate) struct RefreshQuery<'a> {
    pub refresh_token: &'a str,
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Flatten `detail` into a message. Validation errors carry a list.
    pub(crate) fn into_detail(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }
}
