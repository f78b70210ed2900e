//! Credential store trait.

use crate::error::StorageError;
use crate::models::User;
use crate::{AccessToken, RefreshToken};

/// Persistent holder of the current session's tokens and user record.
///
/// Access is synchronous and local. Updates are applied in place and the
/// last writer wins.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored access token, if any.
    fn access_token(&self) -> Result<Option<AccessToken>, StorageError>;

    /// Returns the stored refresh token, if any.
    fn refresh_token(&self) -> Result<Option<RefreshToken>, StorageError>;

    /// Returns the cached user record, if any.
    fn current_user(&self) -> Result<Option<User>, StorageError>;

    /// Store a new access token, and the refresh token when one is given.
    ///
    /// Passing `None` for `refresh` keeps the refresh token already stored.
    fn set_tokens(
        &self,
        access: &AccessToken,
        refresh: Option<&RefreshToken>,
    ) -> Result<(), StorageError>;

    /// Cache the current user record.
    fn set_user(&self, user: &User) -> Result<(), StorageError>;

    /// Remove tokens and the user record.
    fn clear(&self) -> Result<(), StorageError>;
}
