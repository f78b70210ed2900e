//! Token response type.

use serde::Deserialize;

use crate::{AccessToken, RefreshToken};

/// Tokens returned by the login and refresh endpoints.
///
/// The refresh endpoint may omit `refresh_token`, in which case the stored
/// refresh token stays in place.
#[derive(Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenPair {
    pub fn access_token(&self) -> AccessToken {
        AccessToken::new(self.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.refresh_token.as_ref().map(|t| RefreshToken::new(t.clone()))
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("token_type", &self.token_type)
            .finish()
    }
}
