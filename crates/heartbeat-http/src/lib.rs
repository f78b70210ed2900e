//! heartbeat-http - authenticated HTTP access to the HeartBeat API.
//!
//! [`Gateway`] attaches the session's bearer token to every request and
//! recovers from an expired access token with a single refresh and retry.
//! [`AuthClient`] and [`TaskClient`] are the resource clients built on it.

mod auth;
mod client;
pub mod endpoints;
mod gateway;
mod request;
mod tasks;

pub use auth::AuthClient;
pub use client::ApiClient;
pub use gateway::Gateway;
pub use request::PendingRequest;
pub use tasks::TaskClient;
