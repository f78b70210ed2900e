//! Persistent CLI session.
//!
//! Credentials live in one JSON file under the platform data directory,
//! next to the backend URL they were issued by.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use tracing::debug;

use heartbeat_core::{ApiUrl, Navigator, Route, SessionContext};
use heartbeat_http::{AuthClient, Gateway, TaskClient};
use heartbeat_store::{FileStorage, KeyValueStore, LocalCredentialStore};

use crate::output;

/// Backend used when neither `--api` nor a stored URL is available.
pub const DEFAULT_API: &str = "http://127.0.0.1:8000";

/// Key of the backend URL in the session file.
pub const API_URL_KEY: &str = "api_url";

/// Navigator for a terminal: the only route that needs action is login.
#[derive(Debug)]
struct CliNavigator;

impl Navigator for CliNavigator {
    fn navigate(&self, route: Route) {
        match route {
            Route::Login => output::warning(
                "Your session has ended. Run 'heartbeat auth login' to sign in again.",
            ),
            other => debug!(route = %other, "Navigation"),
        }
    }
}

/// Session state for one CLI invocation.
pub struct CliSession {
    gateway: Gateway,
    storage: FileStorage,
}

impl CliSession {
    /// Open the stored session, talking to `api` if given.
    pub fn open(api: Option<&str>) -> Result<Self> {
        let storage = FileStorage::new(session_path()?);
        let api = resolve_api_url(&storage, api)?;
        debug!(api = %api, path = %storage.path().display(), "Opening session");

        let store = Arc::new(LocalCredentialStore::new(storage.clone()));
        let session = SessionContext::new(store, Arc::new(CliNavigator));
        let gateway = Gateway::new(api, session).context("Failed to create HTTP client")?;

        Ok(Self { gateway, storage })
    }

    pub fn auth(&self) -> AuthClient {
        self.gateway.auth()
    }

    pub fn tasks(&self) -> TaskClient {
        self.gateway.tasks()
    }

    pub fn api(&self) -> &ApiUrl {
        self.gateway.client().api()
    }

    /// Remember the backend so later commands reach the same server.
    pub fn remember_api(&self) -> Result<()> {
        self.storage
            .set(API_URL_KEY, self.api().as_str())
            .context("Failed to save API URL")
    }

    /// Fail unless the navigation guard lets the user through to `target`.
    pub fn require_login(&self, target: Route) -> Result<()> {
        let resolved = self
            .gateway
            .session()
            .guard(target)
            .context("Failed to read stored credentials")?;

        if resolved == Route::Login && target != Route::Login {
            bail!("Not logged in. Run 'heartbeat auth login' first.");
        }
        Ok(())
    }
}

/// Get the session file path.
fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "heartbeat").context("Could not determine data directory")?;
    Ok(dirs.data_dir().join("session.json"))
}

/// Pick the backend: explicit flag, then the stored URL, then the default.
fn resolve_api_url(storage: &impl KeyValueStore, flag: Option<&str>) -> Result<ApiUrl> {
    let raw = match flag {
        Some(value) => value.to_string(),
        None => storage
            .get(API_URL_KEY)
            .context("Failed to read session file")?
            .unwrap_or_else(|| DEFAULT_API.to_string()),
    };

    ApiUrl::new(&raw).with_context(|| format!("Invalid API URL: {}", raw))
}
