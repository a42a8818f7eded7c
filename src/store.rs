//! Account number persistence.
//!
//! Whatever is stored here is what the card hands to a reader. The store owns
//! its own lock and cache; callers only ever see `account()`/`set_account()`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, Result};

/// Key-value persistence for the account number the card hands out.
pub trait AccountStore {
    /// Returns the stored account number, or an empty string if none was
    /// ever set.
    fn account(&self) -> Result<String>;

    /// Replaces the stored account number, durably.
    fn set_account(&self, value: &str) -> Result<()>;
}

// A poisoned lock means a writer died mid-update; treat the store as gone.
fn poisoned() -> Error {
    Error::StoreUnavailable(io::Error::new(io::ErrorKind::Other, "store lock poisoned"))
}

/// On-disk document.
#[derive(Debug, Serialize, Deserialize)]
struct Data {
    account: String,
}

/// A file-backed store. The file is read lazily on the first access and
/// cached; after that the cache is authoritative, and writes update the file
/// and the cache under the same lock.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cache: Mutex<Option<String>>,
}

impl FileStore {
    /// Creates a store over the given path. Does no I/O until first use; a
    /// file that doesn't exist yet reads as the empty string.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<String>>> {
        self.cache.lock().map_err(|_| poisoned())
    }

    fn load(path: &Path) -> Result<String> {
        match fs::read(path) {
            Ok(raw) => {
                let data: Data = serde_json::from_slice(&raw)
                    .map_err(|err| Error::StoreUnavailable(err.into()))?;
                Ok(data.account)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(Error::StoreUnavailable(err)),
        }
    }

    fn save(path: &Path, account: &str) -> Result<()> {
        let doc = serde_json::to_vec_pretty(&Data {
            account: account.into(),
        })
        .map_err(|err| Error::StoreUnavailable(err.into()))?;

        // Write a sibling temp file and rename it over the original, so a
        // crash mid-write can't leave a half-written document behind.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, doc).map_err(Error::StoreUnavailable)?;
        fs::rename(&tmp, path).map_err(Error::StoreUnavailable)?;
        Ok(())
    }
}

impl AccountStore for FileStore {
    fn account(&self) -> Result<String> {
        let mut cache = self.lock()?;
        match cache.as_ref() {
            Some(account) => Ok(account.clone()),
            None => {
                let account = Self::load(&self.path)?;
                debug!(path = %self.path.display(), "Loaded account number from disk");
                *cache = Some(account.clone());
                Ok(account)
            }
        }
    }

    fn set_account(&self, value: &str) -> Result<()> {
        let mut cache = self.lock()?;
        info!(account = value, "Setting account number");
        Self::save(&self.path, value)?;
        *cache = Some(value.into());
        Ok(())
    }
}

/// An in-memory store, for tests and examples.
#[derive(Debug, Default)]
pub struct MemoryStore {
    account: Mutex<String>,
}

impl MemoryStore {
    pub fn new<S: Into<String>>(account: S) -> Self {
        Self {
            account: Mutex::new(account.into()),
        }
    }
}

impl AccountStore for MemoryStore {
    fn account(&self) -> Result<String> {
        Ok(self.account.lock().map_err(|_| poisoned())?.clone())
    }

    fn set_account(&self, value: &str) -> Result<()> {
        *self.account.lock().map_err(|_| poisoned())? = value.into();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("card.json"));
        assert_eq!(store.account().unwrap(), "");
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.json");

        let store = FileStore::new(&path);
        store.set_account("8411770075710").unwrap();
        assert_eq!(store.account().unwrap(), "8411770075710");

        // A fresh store over the same file sees the persisted value.
        let store = FileStore::new(&path);
        assert_eq!(store.account().unwrap(), "8411770075710");
    }

    #[test]
    fn file_store_reads_hit_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.json");

        let store = FileStore::new(&path);
        store.set_account("1234").unwrap();

        // The write populated the cache; the file is no longer consulted.
        fs::remove_file(&path).unwrap();
        assert_eq!(store.account().unwrap(), "1234");
    }

    #[test]
    fn file_store_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.account(), Err(Error::StoreUnavailable(_))));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::default();
        assert_eq!(store.account().unwrap(), "");
        store.set_account("600").unwrap();
        assert_eq!(store.account().unwrap(), "600");
    }
}
