//! Core traits for credential storage, navigation and task access.

mod navigator;
mod store;
mod tasks;

pub use navigator::Navigator;
pub use store::CredentialStore;
pub use tasks::TaskApi;
