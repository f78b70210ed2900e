//! Authentication operations.

use tracing::{debug, info, instrument, warn};

use heartbeat_core::error::AuthError;
use heartbeat_core::{LoginCredentials, Registration, Result, TokenPair, User};

use crate::endpoints::{CURRENT_USER, LOGIN, LoginForm, REGISTER};
use crate::gateway::Gateway;
use crate::request::PendingRequest;

/// Login, registration and current-user calls for one session.
#[derive(Debug, Clone)]
pub struct AuthClient {
    gateway: Gateway,
}

impl AuthClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Log in with a username and password.
    ///
    /// Both tokens are stored, then the current user is fetched and cached.
    /// If the user cannot be fetched the session is cleared again and the
    /// error returned.
    #[instrument(skip(self, credentials), fields(username = credentials.username()))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User> {
        let form = LoginForm {
            username: credentials.username(),
            password: credentials.password(),
        };
        let tokens: TokenPair = self.gateway.client().post_form(LOGIN, &form).await?;

        // Nothing from a previous session may outlive a new login.
        let session = self.gateway.session();
        session.clear()?;
        session.set_tokens(&tokens.access_token(), tokens.refresh_token().as_ref())?;

        let user = self.fetch_user().await?.ok_or(AuthError::Expired)?;
        info!(user_id = user.id, "Logged in");
        Ok(user)
    }

    /// Create an account. Nothing is stored; log in afterwards.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<User> {
        let user: User = self.gateway.client().post_json(REGISTER, registration).await?;
        info!(user_id = user.id, "Registered");
        Ok(user)
    }

    /// Load the signed-in user from the backend and cache it.
    ///
    /// Returns `None` without a request when there is no access token. Any
    /// failure clears the stored credentials.
    #[instrument(skip(self))]
    pub async fn fetch_user(&self) -> Result<Option<User>> {
        let session = self.gateway.session();
        if session.access_token()?.is_none() {
            debug!("No access token, skipping user fetch");
            return Ok(None);
        }

        let result = self
            .gateway
            .send_json::<User>(PendingRequest::get(CURRENT_USER))
            .await
            .and_then(|user| {
                session.set_user(&user)?;
                Ok(user)
            });

        match result {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "Failed to fetch current user, clearing credentials");
                if let Err(clear_err) = session.clear() {
                    warn!(error = %clear_err, "Failed to clear credentials");
                }
                Err(e)
            }
        }
    }

    /// Refresh the access token now.
    pub async fn refresh(&self) -> Result<()> {
        self.gateway.refresh().await
    }

    /// Forget all stored credentials.
    pub fn logout(&self) -> Result<()> {
        self.gateway.session().clear()?;
        info!("Logged out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.gateway.session().is_authenticated()?)
    }

    /// The cached user record, without contacting the backend.
    pub fn current_user(&self) -> Result<Option<User>> {
        Ok(self.gateway.session().current_user()?)
    }
}
