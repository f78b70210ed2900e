//! Error types for the heartbeat client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API, storage and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for heartbeat operations.
///
/// Callers match on the variant to decide how to report a failure; the
/// gateway itself only ever resolves [`AuthError::Expired`] on its own.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, undecodable body).
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Authentication errors (rejected token, failed session recovery).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-2xx responses other than an access-token rejection.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Credential storage errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation errors (invalid URL, malformed id).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if this error ended the session (credentials were wiped).
    pub fn is_session_lost(&self) -> bool {
        matches!(self, Error::Auth(AuthError::Recovery(_)))
    }
}

/// Transport-level errors. No response was received, or it was unreadable.
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend rejected the access token and no further retry is allowed.
    #[error("access token rejected")]
    Expired,

    /// Refreshing the session failed; credentials have been cleared.
    #[error("session recovery failed: {0}")]
    Recovery(#[from] RecoveryError),
}

/// Reasons a refresh-and-retry cycle could not recover the session.
///
/// Cloneable so that requests waiting on a refresh can report the same
/// failure as the request that ran it.
#[derive(Debug, Clone, Error)]
pub enum RecoveryError {
    /// No refresh token was stored.
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// The refresh call never got a usable response.
    #[error("refresh request failed: {0}")]
    Network(NetworkError),

    /// The refresh endpoint answered with a non-2xx status.
    #[error("refresh rejected: {0}")]
    Rejected(ApiError),

    /// The refreshed tokens could not be read or written.
    #[error("credential store failed: {0}")]
    Storage(StorageError),
}

/// A non-2xx response from the backend.
///
/// The backend reports failures as `{"detail": ...}`; `detail` is a string
/// for most errors and a list of field errors for validation failures.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Error detail from the response body, if any.
    pub detail: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref detail) = self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, detail: Option<String>) -> Self {
        Self { status, detail }
    }

    /// Check if this is a request validation failure.
    pub fn is_validation(&self) -> bool {
        self.status == 422
    }

    /// Check if the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Credential storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failure.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be parsed.
    #[error("stored value for '{key}' is invalid: {reason}")]
    Corrupt { key: String, reason: String },

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

impl Clone for StorageError {
    fn clone(&self) -> Self {
        match self {
            StorageError::Io(e) => StorageError::Io(std::io::Error::new(e.kind(), e.to_string())),
            StorageError::Corrupt { key, reason } => StorageError::Corrupt {
                key: key.clone(),
                reason: reason.clone(),
            },
            StorageError::Poisoned => StorageError::Poisoned,
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid task identifier.
    #[error("invalid task id '{value}': {reason}")]
    TaskId { value: String, reason: String },

    /// A header value could not be built from a token.
    #[error("invalid header value for {name}")]
    Header { name: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
