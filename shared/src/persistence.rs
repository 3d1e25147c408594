use std::collections::HashMap;

use serde_json::Value;

use crate::error::PersistenceError;

/// Key-value collaborator holding the saved visit collection.
pub trait VisitPersistence {
    /// `Ok(None)` when nothing is stored under `key`.
    fn read(&self, key: &str) -> Result<Option<Value>, PersistenceError>;
    fn write(&mut self, key: &str, value: &Value) -> Result<(), PersistenceError>;
}

/// In-process backend. Values are kept as JSON text so reads see exactly
/// what a browser store would hand back.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    entries: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `key` with raw text, valid JSON or not.
    pub fn with_raw(mut self, key: &str, raw: &str) -> Self {
        self.entries.insert(key.to_string(), raw.to_string());
        self
    }

    /// Make every read fail.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Make every write fail until switched back.
    pub fn set_failing_writes(&mut self, failing: bool) {
        self.fail_writes = failing;
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl VisitPersistence for MemoryPersistence {
    fn read(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        if self.fail_reads {
            return Err(PersistenceError::Read("storage unavailable".into()));
        }
        self.entries
            .get(key)
            .map(|raw| serde_json::from_str(raw).map_err(|e| PersistenceError::Read(e.to_string())))
            .transpose()
    }

    fn write(&mut self, key: &str, value: &Value) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::Write("quota exceeded".into()));
        }
        self.entries.insert(key.to_string(), serde_json::to_string(value)?);
        Ok(())
    }
}
