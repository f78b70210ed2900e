//! Session context shared by the gateway and the resource clients.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::models::User;
use crate::navigation::{self, Route};
use crate::traits::{CredentialStore, Navigator};
use crate::{AccessToken, RefreshToken};

/// The credential store and navigator of one signed-in (or signed-out) user.
///
/// A context is built once and handed to the gateway at construction, so
/// independent sessions never share state. Cloning is cheap.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn CredentialStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    pub fn access_token(&self) -> Result<Option<AccessToken>, StorageError> {
        self.store.access_token()
    }

    pub fn refresh_token(&self) -> Result<Option<RefreshToken>, StorageError> {
        self.store.refresh_token()
    }

    pub fn current_user(&self) -> Result<Option<User>, StorageError> {
        self.store.current_user()
    }

    /// Returns true while an access token is stored.
    pub fn is_authenticated(&self) -> Result<bool, StorageError> {
        Ok(self.store.access_token()?.is_some())
    }

    pub fn set_tokens(
        &self,
        access: &AccessToken,
        refresh: Option<&RefreshToken>,
    ) -> Result<(), StorageError> {
        self.store.set_tokens(access, refresh)
    }

    pub fn set_user(&self, user: &User) -> Result<(), StorageError> {
        self.store.set_user(user)
    }

    /// Remove all stored credentials.
    pub fn clear(&self) -> Result<(), StorageError> {
        debug!("Clearing stored credentials");
        self.store.clear()
    }

    /// Wipe credentials and send the user to the login view.
    ///
    /// Navigation happens even if the store could not be cleared.
    pub fn force_logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear credentials during forced logout");
        }
        self.navigator.navigate(Route::Login);
    }

    /// Resolve a navigation to `target` through the authentication guard.
    pub fn guard(&self, target: Route) -> Result<Route, StorageError> {
        Ok(navigation::guard(target, self.is_authenticated()?))
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("store", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
