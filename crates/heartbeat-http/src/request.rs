//! Replayable request descriptions.

use std::fmt;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use heartbeat_core::error::InvalidInputError;
use heartbeat_core::{AccessToken, Result};

use crate::client::{ApiClient, network_error};

/// A captured HTTP call that the gateway can issue more than once.
///
/// The `Authorization` header is derived from the session at every send.
/// A caller-supplied value is always dropped, even when there is no token.
#[derive(Clone)]
pub struct PendingRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    retried: bool,
}

impl PendingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Set a header, replacing any previous value.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(|e| InvalidInputError::Other {
            message: format!("request body is not serializable: {}", e),
        })?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(bytes);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns true once the gateway has spent this request's single retry.
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    pub(crate) fn mark_retried(&mut self) {
        self.retried = true;
    }

    /// Build a sendable request carrying `token` as bearer credentials.
    pub(crate) fn build(
        &self,
        client: &ApiClient,
        token: Option<&AccessToken>,
    ) -> Result<reqwest::Request> {
        let mut headers = self.headers.clone();
        headers.remove(AUTHORIZATION);
        if let Some(token) = token {
            let mut value =
                HeaderValue::from_str(&token.bearer()).map_err(|_| InvalidInputError::Header {
                    name: AUTHORIZATION.to_string(),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = client
            .http()
            .request(self.method.clone(), client.url(&self.path))
            .headers(headers);

        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }
        if let Some(body) = &self.body {
            builder = builder.body(body.clone());
        }

        builder.build().map_err(network_error)
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("headers", &self.headers)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .field("retried", &self.retried)
            .finish()
    }
}
