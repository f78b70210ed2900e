//! heartbeat-store - Persistent credential storage.
//!
//! Credentials live in a small key/value space, one entry per stable key,
//! so a session survives process restarts until it is explicitly cleared.

mod credentials;
mod file;
mod memory;

pub use credentials::{ACCESS_TOKEN_KEY, LocalCredentialStore, REFRESH_TOKEN_KEY, USER_KEY};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use heartbeat_core::error::StorageError;

/// String key/value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Write several values in one update.
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove several values in one update.
    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}
