//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL of the HeartBeat backend.
///
/// The URL must use HTTPS, or HTTP for loopback hosts. A path prefix is
/// allowed so the backend can be mounted below a reverse-proxy route.
/// The string form never ends with a slash.
///
/// # Example
///
/// ```
/// use heartbeat_core::ApiUrl;
///
/// let api = ApiUrl::new("http://127.0.0.1:8000").unwrap();
/// assert_eq!(api.endpoint("/auth/token"), "http://127.0.0.1:8000/auth/token");
///
/// let mounted = ApiUrl::new("https://example.com/api/").unwrap();
/// assert_eq!(mounted.as_str(), "https://example.com/api");
/// assert_eq!(mounted.endpoint("/tasks/"), "https://example.com/api/tasks/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl {
    url: Url,
    base: String,
}

impl ApiUrl {
    /// Create a new API URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ApiUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        let mut url = url;
        let trimmed = url.path().trim_end_matches('/').to_string();
        url.set_path(&trimmed);

        // Special schemes always keep a root `/` in the path.
        let base = url.as_str().trim_end_matches('/').to_string();

        Ok(Self { url, base })
    }

    /// Returns the full URL for an endpoint path such as `/users/me`.
    pub fn endpoint(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base, path)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let invalid = |reason: &str| {
            Error::from(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: reason.to_string(),
            })
        };

        if url.cannot_be_a_base() {
            return Err(invalid("must be an absolute URL"));
        }

        let is_loopback = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        let scheme = url.scheme();
        if scheme != "https" && !(scheme == "http" && is_loopback) {
            return Err(invalid("must use HTTPS (HTTP allowed only for localhost)"));
        }

        if url.host_str().is_none() {
            return Err(invalid("must have a host"));
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not carry a query or fragment"));
        }

        Ok(())
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.base)
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        &self.base
    }
}
