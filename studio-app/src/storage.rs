//! Browser `localStorage` persistence for the revision log.

use studio_core::{HistoryStore, Revision, StoreError, STORAGE_KEY};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Persists the revision log under a `localStorage` key.
///
/// Only the key is held; the storage handle is looked up on every call so
/// the store stays `Send`.
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    /// Store under the default key.
    #[must_use]
    pub fn new() -> Self {
        Self::with_key(STORAGE_KEY)
    }

    /// Store under `key`.
    #[must_use]
    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Storage key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

fn unavailable(err: &JsValue) -> StoreError {
    StoreError::Unavailable(format!("{err:?}"))
}

fn local_storage() -> Result<Storage, StoreError> {
    web_sys::window()
        .ok_or_else(|| StoreError::Unavailable("no window object".to_string()))?
        .local_storage()
        .map_err(|e| unavailable(&e))?
        .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".to_string()))
}

impl HistoryStore for LocalStorageStore {
    fn load(&self) -> Result<Vec<Revision>, StoreError> {
        match local_storage()?.get_item(&self.key).map_err(|e| unavailable(&e))? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, revisions: &[Revision]) -> Result<(), StoreError> {
        let json = serde_json::to_string(revisions)?;
        local_storage()?
            .set_item(&self.key, &json)
            .map_err(|e| unavailable(&e))
    }
}
