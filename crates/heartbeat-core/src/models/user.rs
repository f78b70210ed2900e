//! User representations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The signed-in user as returned by `/users/me` and `/auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub partner_id: Option<i64>,
    #[serde(default)]
    pub invitation_code: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub partner: Option<PartnerInfo>,
}

/// Summary of the user's bound partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerInfo {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub score: i64,
    /// When the partnership was established (backend local time, no offset).
    #[serde(default)]
    pub bind_date: Option<NaiveDateTime>,
}

/// Request body for account registration.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
}

impl Registration {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_defaults_optional_fields() {
        let user: User = serde_json::from_value(json!({"id": 1, "username": "alice"})).unwrap();
        assert_eq!(user.score, 0);
        assert!(user.partner.is_none());
        assert!(user.invitation_code.is_none());
    }

    #[test]
    fn partner_bind_date_parses_naive_timestamp() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "username": "alice",
            "partner_id": 2,
            "score": 12,
            "partner": {
                "id": 2,
                "username": "bob",
                "score": 3,
                "bind_date": "2024-05-20T13:14:00.123456"
            }
        }))
        .unwrap();

        let partner = user.partner.unwrap();
        assert_eq!(partner.username, "bob");
        assert!(partner.bind_date.is_some());
    }
}
