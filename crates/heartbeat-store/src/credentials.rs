//! Credential store over key/value storage.

use tracing::debug;

use heartbeat_core::error::StorageError;
use heartbeat_core::{AccessToken, CredentialStore, RefreshToken, User};

use crate::KeyValueStore;

/// Key of the stored access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Key of the stored refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Key of the stored user record (serialized as JSON).
pub const USER_KEY: &str = "user";

/// [`CredentialStore`] keeping each credential under its own stable key.
#[derive(Debug)]
pub struct LocalCredentialStore<S> {
    storage: S,
}

impl<S: KeyValueStore> LocalCredentialStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: KeyValueStore> CredentialStore for LocalCredentialStore<S> {
    fn access_token(&self) -> Result<Option<AccessToken>, StorageError> {
        Ok(self.storage.get(ACCESS_TOKEN_KEY)?.map(AccessToken::new))
    }

    fn refresh_token(&self) -> Result<Option<RefreshToken>, StorageError> {
        Ok(self.storage.get(REFRESH_TOKEN_KEY)?.map(RefreshToken::new))
    }

    fn current_user(&self) -> Result<Option<User>, StorageError> {
        let Some(json) = self.storage.get(USER_KEY)? else {
            return Ok(None);
        };

        // A literal `null` is what a cleared user record serializes to.
        if json == "null" {
            return Ok(None);
        }

        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                key: USER_KEY.to_string(),
                reason: e.to_string(),
            })
    }

    fn set_tokens(
        &self,
        access: &AccessToken,
        refresh: Option<&RefreshToken>,
    ) -> Result<(), StorageError> {
        let mut entries = vec![(ACCESS_TOKEN_KEY, access.as_str())];
        if let Some(refresh) = refresh {
            entries.push((REFRESH_TOKEN_KEY, refresh.as_str()));
        }
        self.storage.set_all(&entries)?;
        debug!(refresh_replaced = refresh.is_some(), "Stored tokens");
        Ok(())
    }

    fn set_user(&self, user: &User) -> Result<(), StorageError> {
        let json = serde_json::to_string(user).map_err(|e| StorageError::Corrupt {
            key: USER_KEY.to_string(),
            reason: e.to_string(),
        })?;
        self.storage.set(USER_KEY, &json)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.storage
            .remove_all(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileStorage, MemoryStorage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Memory storage that counts write calls.
    #[derive(Default)]
    struct CountingStorage {
        inner: MemoryStorage,
        sets: AtomicUsize,
        batches: AtomicUsize,
    }

    impl KeyValueStore for CountingStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value)
        }

        fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
            self.batches.fetch_add(1, Ordering::SeqCst);
            self.inner.set_all(entries)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            partner_id: None,
            invitation_code: Some("INV123".to_string()),
            score: 4,
            partner: None,
        }
    }

    #[test]
    fn token_round_trip() {
        let store = LocalCredentialStore::new(MemoryStorage::new());
        store
            .set_tokens(&AccessToken::new("A1"), Some(&RefreshToken::new("R1")))
            .unwrap();

        assert_eq!(store.access_token().unwrap().unwrap().as_str(), "A1");
        assert_eq!(store.refresh_token().unwrap().unwrap().as_str(), "R1");
    }

    #[test]
    fn access_only_update_keeps_refresh_token() {
        let store = LocalCredentialStore::new(MemoryStorage::new());
        store
            .set_tokens(&AccessToken::new("A1"), Some(&RefreshToken::new("R1")))
            .unwrap();
        store.set_tokens(&AccessToken::new("A2"), None).unwrap();

        assert_eq!(store.access_token().unwrap().unwrap().as_str(), "A2");
        assert_eq!(store.refresh_token().unwrap().unwrap().as_str(), "R1");
    }

    #[test]
    fn token_pair_is_written_in_one_update() {
        let store = LocalCredentialStore::new(CountingStorage::default());
        store
            .set_tokens(&AccessToken::new("A1"), Some(&RefreshToken::new("R1")))
            .unwrap();

        assert_eq!(store.storage().batches.load(Ordering::SeqCst), 1);
        assert_eq!(store.storage().sets.load(Ordering::SeqCst), 0);
        assert_eq!(store.access_token().unwrap().unwrap().as_str(), "A1");
        assert_eq!(store.refresh_token().unwrap().unwrap().as_str(), "R1");
    }

    #[test]
    fn clear_removes_everything() {
        let store = LocalCredentialStore::new(MemoryStorage::new());
        store
            .set_tokens(&AccessToken::new("A1"), Some(&RefreshToken::new("R1")))
            .unwrap();
        store.set_user(&alice()).unwrap();

        store.clear().unwrap();

        assert!(store.access_token().unwrap().is_none());
        assert!(store.refresh_token().unwrap().is_none());
        assert!(store.current_user().unwrap().is_none());
    }

    #[test]
    fn survives_reload_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        {
            let store = LocalCredentialStore::new(FileStorage::new(&path));
            store
                .set_tokens(&AccessToken::new("A1"), Some(&RefreshToken::new("R1")))
                .unwrap();
            store.set_user(&alice()).unwrap();
        }

        let reloaded = LocalCredentialStore::new(FileStorage::new(&path));
        assert_eq!(reloaded.access_token().unwrap().unwrap().as_str(), "A1");
        assert_eq!(reloaded.refresh_token().unwrap().unwrap().as_str(), "R1");
        assert_eq!(reloaded.current_user().unwrap(), Some(alice()));
    }

    #[test]
    fn user_is_stored_as_json_under_user_key() {
        let store = LocalCredentialStore::new(MemoryStorage::new());
        store.set_user(&alice()).unwrap();

        let raw = store.storage().get(USER_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["username"], "alice");
    }

    #[test]
    fn corrupt_user_record_is_reported() {
        let storage = MemoryStorage::new();
        storage.set(USER_KEY, "{not json").unwrap();
        let store = LocalCredentialStore::new(storage);

        assert!(matches!(
            store.current_user(),
            Err(StorageError::Corrupt { .. })
        ));
    }
}
