//! HTTP client for the HeartBeat backend.

use reqwest::header::{ACCEPT, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use heartbeat_core::error::{ApiError, Error, NetworkError, RecoveryError};
use heartbeat_core::{ApiUrl, RefreshToken, Result, TokenPair};

use crate::endpoints::{ErrorResponse, REFRESH, RefreshQuery};

/// Unauthenticated HTTP client bound to one backend.
///
/// Authenticated calls go through [`Gateway`](crate::Gateway), which uses
/// this client for transport.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api: ApiUrl,
}

impl ApiClient {
    /// Create a new client for the given backend.
    pub fn new(api: ApiUrl) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("heartbeat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(network_error)?;

        Ok(Self { client, api })
    }

    /// Create a client around a preconfigured `reqwest::Client`.
    pub fn with_client(api: ApiUrl, client: reqwest::Client) -> Self {
        Self { client, api }
    }

    /// Returns the backend URL this client is configured for.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        self.api.endpoint(path)
    }

    /// Send a prepared request. Transport failures become [`NetworkError`].
    pub(crate) async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        trace!(method = %request.method(), url = %request.url(), "Sending request");
        self.client.execute(request).await.map_err(network_error)
    }

    /// POST a form-encoded body without credentials.
    #[instrument(skip(self, form), fields(api = %self.api))]
    pub async fn post_form<F, R>(&self, path: &str, form: &F) -> Result<R>
    where
        F: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(path, "Form POST");

        let response = self
            .client
            .post(self.url(path))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .form(form)
            .send()
            .await
            .map_err(network_error)?;

        handle_response(response).await
    }

    /// POST a JSON body without credentials.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(path, "JSON POST");

        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(network_error)?;

        handle_response(response).await
    }

    /// Exchange a refresh token for new tokens.
    ///
    /// The token is sent as the `refresh_token` query parameter with no body
    /// and no `Authorization` header.
    #[instrument(skip(self, refresh_token), fields(api = %self.api))]
    pub async fn refresh_session(
        &self,
        refresh_token: &RefreshToken,
    ) -> std::result::Result<TokenPair, RecoveryError> {
        debug!("Requesting token refresh");

        let query = RefreshQuery {
            refresh_token: refresh_token.as_str(),
        };

        let response = self
            .client
            .post(self.url(REFRESH))
            .query(&query)
            .send()
            .await
            .map_err(|e| RecoveryError::Network(network_error_kind(e)))?;

        if !response.status().is_success() {
            return Err(RecoveryError::Rejected(parse_error_response(response).await));
        }

        response
            .json::<TokenPair>()
            .await
            .map_err(|e| RecoveryError::Network(network_error_kind(e)))
    }
}

/// Decode a successful response, or turn a non-2xx one into [`ApiError`].
pub(crate) async fn handle_response<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
    let status = response.status();
    trace!(status = %status, "Response");

    if status.is_success() {
        response.json::<R>().await.map_err(network_error)
    } else {
        Err(Error::Api(parse_error_response(response).await))
    }
}

/// Parse a backend error response.
pub(crate) async fn parse_error_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();

    match response.json::<ErrorResponse>().await {
        Ok(body) => ApiError::new(status, body.into_detail()),
        Err(_) => ApiError::new(status, None),
    }
}

pub(crate) fn network_error(err: reqwest::Error) -> Error {
    Error::Network(network_error_kind(err))
}

fn network_error_kind(err: reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout
    } else if err.is_connect() {
        NetworkError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        NetworkError::Decode {
            message: err.to_string(),
        }
    } else {
        NetworkError::Http {
            message: err.to_string(),
        }
    }
}
