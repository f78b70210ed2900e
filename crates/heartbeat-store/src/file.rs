//! File-backed key/value storage.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, instrument};

use heartbeat_core::error::StorageError;

use crate::KeyValueStore;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

type Entries = BTreeMap<String, String>;

/// Key/value storage kept in a single JSON object file.
///
/// Every operation re-reads the file, so separate instances (or processes)
/// opened on the same path observe each other's writes. Writers hold an
/// exclusive lock on a sibling `.lock` file and replace the data file by
/// rename. On Unix the data file is readable by its owner only.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Open storage at the given file path. The file is created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the data file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    fn open_lock(&self) -> Result<File, StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;
        Ok(file)
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };

        if json.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&json).map_err(|e| StorageError::Corrupt {
            key: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries).map_err(|e| StorageError::Corrupt {
            key: self.path.display().to_string(),
            reason: e.to_string(),
        })?;

        let temp = self.temp_path();
        {
            let mut file = File::create(&temp)?;

            // Set restrictive permissions before any secret is written (Unix only)
            #[cfg(unix)]
            {
                let mut perms = file.metadata()?.permissions();
                perms.set_mode(0o600);
                file.set_permissions(perms)?;
            }

            file.write_all(json.as_bytes())?;
            file.sync_data()?;
        }
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Entries)) -> Result<(), StorageError> {
        let lock = self.open_lock()?;
        lock.lock_exclusive()?;

        let result = self.read_entries().and_then(|mut entries| {
            apply(&mut entries);
            self.write_entries(&entries)
        });

        lock.unlock()?;
        result
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let lock = self.open_lock()?;
        lock.lock_shared()?;
        let result = self.read_entries();
        lock.unlock()?;

        Ok(result?.remove(key))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        debug!("Writing entry");
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    #[instrument(skip(self, values), fields(path = %self.path.display()))]
    fn set_all(&self, values: &[(&str, &str)]) -> Result<(), StorageError> {
        if values.is_empty() {
            return Ok(());
        }
        debug!(count = values.len(), "Writing entries");
        self.update(|entries| {
            for (key, value) in values {
                entries.insert(key.to_string(), value.to_string());
            }
        })
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        debug!("Removing entry");
        self.update(|entries| {
            entries.remove(key);
        })
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        debug!(count = keys.len(), "Removing entries");
        self.update(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
    }
}
