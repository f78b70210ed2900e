//! Authenticated request gateway.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, trace, warn};

use heartbeat_core::error::{AuthError, RecoveryError};
use heartbeat_core::{AccessToken, ApiUrl, Result, SessionContext};

use crate::auth::AuthClient;
use crate::client::{ApiClient, handle_response};
use crate::endpoints::REFRESH;
use crate::request::PendingRequest;
use crate::tasks::TaskClient;

/// Sends requests with the session's bearer token and recovers from an
/// expired access token by refreshing it once.
///
/// Each call to [`send`](Gateway::send) runs its own state machine:
///
/// ```text
/// Sent ─┬─> ok / other status / network error        (returned as is)
///       └─> AuthExpired ─> Refreshing ─┬─> Retried ─> whatever the retry returns
///                                      └─> Failed: credentials wiped, login route signalled
/// ```
///
/// Refreshes are coalesced: while one request is refreshing, others that
/// were rejected wait for it. If it succeeded they retry with the token it
/// stored; if it failed they report the same failure without logging out
/// a second time.
///
/// Gateways are cheap to clone and share one session and one refresh lock.
#[derive(Debug, Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

#[derive(Debug)]
struct GatewayInner {
    client: ApiClient,
    session: SessionContext,
    refresh: Mutex<RefreshState>,
    /// Number of finished refresh attempts. Only advanced while `refresh` is held.
    generation: AtomicU64,
}

/// Outcome of the most recent refresh attempt.
#[derive(Debug, Default)]
struct RefreshState {
    last_failure: Option<RecoveryError>,
}

/// Where a single request is in its refresh-and-retry cycle.
enum Phase {
    Sent,
    AuthExpired {
        rejected: Option<AccessToken>,
        generation: u64,
    },
    Refreshing {
        rejected: Option<AccessToken>,
        generation: u64,
    },
    Retried,
}

/// What `recover` did for one rejected request.
enum Recovery {
    /// A usable access token is stored.
    Ready,
    /// This request ran the refresh and it failed.
    Failed(RecoveryError),
    /// A refresh that ran while this request was waiting failed.
    FailedEarlier(RecoveryError),
}

impl Gateway {
    /// Create a gateway for the given backend and session.
    pub fn new(api: ApiUrl, session: SessionContext) -> Result<Self> {
        Ok(Self::with_client(ApiClient::new(api)?, session))
    }

    /// Create a gateway over an existing client.
    pub fn with_client(client: ApiClient, session: SessionContext) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                client,
                session,
                refresh: Mutex::new(RefreshState::default()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    pub fn session(&self) -> &SessionContext {
        &self.inner.session
    }

    /// Authentication operations bound to this gateway's session.
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.clone())
    }

    /// Task operations bound to this gateway's session.
    pub fn tasks(&self) -> TaskClient {
        TaskClient::new(self.clone())
    }

    /// Send a request with the current access token attached.
    ///
    /// A 401 on a request that has not been retried yet, and that is not
    /// itself a refresh call, triggers one refresh and one retry. The retry's
    /// response is returned whatever its status. Every other response and
    /// every transport error is returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::Network`](heartbeat_core::Error::Network) when no response arrived.
    /// - [`AuthError::Recovery`] when the refresh failed; the session has been
    ///   logged out and the navigator sent to the login route.
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    pub async fn send(&self, mut request: PendingRequest) -> Result<reqwest::Response> {
        let mut phase = Phase::Sent;

        loop {
            phase = match phase {
                Phase::Sent => {
                    let generation = self.inner.generation.load(Ordering::Acquire);
                    let token = self.inner.session.access_token()?;
                    let response = self.dispatch(&request, token.as_ref()).await?;
                    if !self.should_recover(&request, &response) {
                        return Ok(response);
                    }
                    debug!("Access token rejected");
                    Phase::AuthExpired {
                        rejected: token,
                        generation,
                    }
                }
                Phase::AuthExpired {
                    rejected,
                    generation,
                } => {
                    request.mark_retried();
                    Phase::Refreshing {
                        rejected,
                        generation,
                    }
                }
                Phase::Refreshing {
                    rejected,
                    generation,
                } => match self.recover(rejected.as_ref(), generation).await {
                    Recovery::Ready => Phase::Retried,
                    Recovery::Failed(e) => {
                        warn!(error = %e, "Session recovery failed, logging out");
                        self.inner.session.force_logout();
                        return Err(AuthError::Recovery(e).into());
                    }
                    Recovery::FailedEarlier(e) => {
                        debug!(error = %e, "Concurrent refresh failed");
                        return Err(AuthError::Recovery(e).into());
                    }
                },
                Phase::Retried => {
                    let token = self.inner.session.access_token()?;
                    debug!("Retrying with refreshed token");
                    return self.dispatch(&request, token.as_ref()).await;
                }
            };
        }
    }

    /// Send a request and decode a JSON response.
    ///
    /// A 401 that survives [`send`](Gateway::send) is reported as
    /// [`AuthError::Expired`]; other non-2xx statuses as
    /// [`ApiError`](heartbeat_core::error::ApiError).
    pub async fn send_json<R: DeserializeOwned>(&self, request: PendingRequest) -> Result<R> {
        let response = self.send(request).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthError::Expired.into());
        }
        handle_response(response).await
    }

    /// Refresh the access token now.
    ///
    /// Like an automatic refresh, a failure wipes the session and signals
    /// the login route.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let mut state = self.inner.refresh.lock().await;
        match self.run_refresh(&mut state).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Refresh failed, logging out");
                self.inner.session.force_logout();
                Err(AuthError::Recovery(e).into())
            }
        }
    }

    async fn dispatch(
        &self,
        request: &PendingRequest,
        token: Option<&AccessToken>,
    ) -> Result<reqwest::Response> {
        let built = request.build(&self.inner.client, token)?;
        let response = self.inner.client.execute(built).await?;
        trace!(status = %response.status(), retried = request.is_retried(), "Gateway response");
        Ok(response)
    }

    fn should_recover(&self, request: &PendingRequest, response: &reqwest::Response) -> bool {
        response.status() == StatusCode::UNAUTHORIZED
            && !request.is_retried()
            && request.path() != REFRESH
    }

    /// Make sure a token newer than `rejected` is stored, refreshing if no
    /// other request did so since `generation` was observed.
    async fn recover(&self, rejected: Option<&AccessToken>, generation: u64) -> Recovery {
        let mut state = self.inner.refresh.lock().await;

        if self.inner.generation.load(Ordering::Acquire) != generation {
            return match &state.last_failure {
                Some(e) => Recovery::FailedEarlier(e.clone()),
                None => {
                    debug!("Refreshed while waiting, skipping refresh");
                    Recovery::Ready
                }
            };
        }

        let current = match self.inner.session.access_token() {
            Ok(current) => current,
            Err(e) => return Recovery::Failed(RecoveryError::Storage(e)),
        };
        if let Some(current) = current
            && rejected != Some(&current)
        {
            debug!("Access token was replaced while waiting, skipping refresh");
            return Recovery::Ready;
        }

        match self.run_refresh(&mut state).await {
            Ok(()) => Recovery::Ready,
            Err(e) => Recovery::Failed(e),
        }
    }

    /// Run one refresh attempt and publish its outcome to waiting requests.
    async fn run_refresh(&self, state: &mut RefreshState) -> std::result::Result<(), RecoveryError> {
        let result = self.refresh_locked().await;
        state.last_failure = result.as_ref().err().cloned();
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        result
    }

    /// Exchange the stored refresh token. Caller holds the refresh lock.
    async fn refresh_locked(&self) -> std::result::Result<(), RecoveryError> {
        let refresh_token = self
            .inner
            .session
            .refresh_token()
            .map_err(RecoveryError::Storage)?
            .ok_or(RecoveryError::MissingRefreshToken)?;

        let tokens = self.inner.client.refresh_session(&refresh_token).await?;

        let rotated = tokens.refresh_token();
        self.inner
            .session
            .set_tokens(&tokens.access_token(), rotated.as_ref())
            .map_err(RecoveryError::Storage)?;

        info!(rotated = rotated.is_some(), "Session refreshed");
        Ok(())
    }
}
