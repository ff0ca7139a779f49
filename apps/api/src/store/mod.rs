//! Saved-list persistence. The substrate is an opaque key-value capability
//! (`Storage`) holding whole serialized values; `SavedJobsStore` keeps the
//! entire saved collection under one key, writes through on every mutation,
//! and fails soft in both directions.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::models::job::SavedJob;

/// Storage key holding the serialized saved collection.
const SAVED_JOBS_KEY: &str = "saved_jobs";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Durable key-value capability: whole-value get/set/remove, synchronous on
/// purpose. Values here are a few kilobytes of JSON, so calls complete fast
/// enough to sit inside the board lock.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One file per key under a data directory.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    values: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Write-through adapter for the saved collection. Cheap to clone; clones
/// share the underlying storage.
#[derive(Clone)]
pub struct SavedJobsStore {
    storage: Arc<dyn Storage>,
}

impl SavedJobsStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Restores the saved collection. Absent, unreadable, or malformed data
    /// yields an empty list; the failure is a log line, never an error.
    pub fn load(&self) -> Vec<SavedJob> {
        let raw = match self.storage.get(SAVED_JOBS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("failed to read saved jobs, starting empty: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!("stored saved jobs are malformed, starting empty: {e}");
                Vec::new()
            }
        }
    }

    /// Replaces the persisted collection with `jobs`. Failures are logged
    /// and swallowed so the in-memory state stays authoritative.
    pub fn save(&self, jobs: &[SavedJob]) {
        let raw = match serde_json::to_string(jobs) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("failed to serialize saved jobs: {e}");
                return;
            }
        };

        if let Err(e) = self.storage.set(SAVED_JOBS_KEY, &raw) {
            warn!("failed to persist saved jobs: {e}");
        }
    }
}
