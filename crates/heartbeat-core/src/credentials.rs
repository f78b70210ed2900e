//! Login credentials type.

use std::fmt;

/// Username and password submitted to the login endpoint.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use heartbeat_core::LoginCredentials;
///
/// let creds = LoginCredentials::new("alice", "pw");
/// assert_eq!(creds.username(), "alice");
/// ```
#[derive(Clone)]
pub struct LoginCredentials {
    username: String,
    password: String,
}

impl LoginCredentials {
    /// Create new credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests.
    /// Never log or display this value.
    pub fn password(&self) -> &str {
        &self.password
    }
}

// Intentionally hide password in Debug output
impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
