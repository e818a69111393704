//! Durable storage for the revision log.
//!
//! The whole revision list is written as one JSON array under
//! [`STORAGE_KEY`] after every mutation. Writes are fire-and-forget from the
//! state container's point of view: a failed write is logged and the
//! in-memory history stays authoritative.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::Revision;

/// Key the revision log is stored under.
pub const STORAGE_KEY: &str = "component-studio-revisions";

/// Errors that can occur while loading or saving the revision log.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The revision log could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The storage backend is not available or refused the write.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A place the revision log can be persisted to.
pub trait HistoryStore: Send {
    /// Load the persisted revisions. A store with nothing saved yet returns
    /// an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored data cannot be read or parsed.
    fn load(&self) -> Result<Vec<Revision>, StoreError>;

    /// Overwrite the persisted revisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be serialized or written.
    fn save(&mut self, revisions: &[Revision]) -> Result<(), StoreError>;
}

/// Stores the revision log as a JSON file inside a data directory.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    /// Create a store in `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;
        Ok(Self {
            path: data_dir.join(format!("{STORAGE_KEY}.json")),
        })
    }

    /// Path of the JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Result<Vec<Revision>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&mut self, revisions: &[Revision]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(revisions)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistoryStore {
    revisions: Arc<Mutex<Vec<Revision>>>,
    fail_writes: bool,
}

impl MemoryHistoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose writes always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Create a store pre-populated with revisions.
    #[must_use]
    pub fn with_revisions(revisions: Vec<Revision>) -> Self {
        Self {
            revisions: Arc::new(Mutex::new(revisions)),
            fail_writes: false,
        }
    }

    /// Copy of the stored revisions.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Revision> {
        self.revisions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<Vec<Revision>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&mut self, revisions: &[Revision]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("storage quota exceeded".into()));
        }
        let mut stored = self
            .revisions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *stored = revisions.to_vec();
        Ok(())
    }
}
