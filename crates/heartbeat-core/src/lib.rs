//! heartbeat-core - Core types and traits for the HeartBeat API client.
//!
//! Everything an authenticated call needs that is not HTTP: tokens, the
//! error taxonomy, resource models, the credential store and navigator
//! seams, and the [`SessionContext`] that ties them together.

pub mod board;
pub mod credentials;
pub mod error;
pub mod models;
pub mod navigation;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use board::TaskBoard;
pub use credentials::LoginCredentials;
pub use error::Error;
pub use models::{NewTask, Page, PartnerInfo, Registration, Task, TaskUpdate, TokenPair, User};
pub use navigation::{RecordingNavigator, Route};
pub use session::SessionContext;
pub use tokens::{AccessToken, RefreshToken};
pub use traits::{CredentialStore, Navigator, TaskApi};
pub use types::{ApiUrl, TaskId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
