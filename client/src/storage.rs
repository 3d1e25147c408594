use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use serde_json::Value;

use wayfarer_shared::{PersistenceError, VisitPersistence};

/// Browser `localStorage` as the visit persistence collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl VisitPersistence for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        match LocalStorage::get::<Value>(key) {
            Ok(value) => Ok(Some(value)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(e) => Err(PersistenceError::Read(e.to_string())),
        }
    }

    fn write(&mut self, key: &str, value: &Value) -> Result<(), PersistenceError> {
        LocalStorage::set(key, value).map_err(|e| PersistenceError::Write(e.to_string()))
    }
}
