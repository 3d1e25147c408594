use crate::error::{PersistenceError, VisitError};
use crate::persistence::VisitPersistence;
use crate::visit::{self, VisitRecord, validate_place};

/// Ordered visit collection backed by a key-value collaborator.
///
/// The in-memory collection is authoritative for the session: failed writes
/// are logged and never roll back a mutation.
#[derive(Debug)]
pub struct RecordStore<P> {
    records: Vec<VisitRecord>,
    persistence: P,
    key: String,
}

impl<P: VisitPersistence> RecordStore<P> {
    pub fn new(persistence: P, key: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            persistence,
            key: key.into(),
        }
    }

    /// Replace the collection with whatever is saved. Any failure leaves it empty.
    pub fn load(&mut self) -> usize {
        self.records.clear();
        match self.persistence.read(&self.key) {
            Ok(Some(value)) => {
                self.records = visit::decode_persisted(&value);
                tracing::debug!(key = %self.key, count = self.records.len(), "loaded saved visits");
            }
            Ok(None) => {
                tracing::debug!(key = %self.key, "no saved visits");
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to load saved visits");
            }
        }
        self.records.len()
    }

    /// Seed an empty store with default records and save them. A store that
    /// already holds records is left alone.
    pub fn bootstrap(&mut self, defaults: Vec<VisitRecord>) -> usize {
        if !self.records.is_empty() {
            tracing::debug!("store already populated; skipping bootstrap");
            return 0;
        }
        self.records = defaults;
        tracing::info!(count = self.records.len(), "bootstrapped default visits");
        self.persist();
        self.records.len()
    }

    pub fn add(&mut self, year: i32, place: &str) -> Result<(), VisitError> {
        let place = validate_place(place)?;
        self.records.push(VisitRecord::new(year, place));
        self.persist();
        Ok(())
    }

    pub fn update(&mut self, index: usize, year: i32, place: &str) -> Result<(), VisitError> {
        let place = validate_place(place)?;
        let len = self.records.len();
        let slot = self
            .records
            .get_mut(index)
            .ok_or(VisitError::Index { index, len })?;
        *slot = VisitRecord::new(year, place);
        self.persist();
        Ok(())
    }

    pub fn delete(&mut self, index: usize) -> Result<VisitRecord, VisitError> {
        if index >= self.records.len() {
            return Err(VisitError::Index {
                index,
                len: self.records.len(),
            });
        }
        let removed = self.records.remove(index);
        self.persist();
        Ok(removed)
    }

    /// Write the whole collection. Failures are logged and returned.
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let result = visit::encode(&self.records)
            .map_err(PersistenceError::from)
            .and_then(|value| self.persistence.write(&self.key, &value));
        if let Err(e) = &result {
            tracing::warn!(key = %self.key, error = %e, "failed to save visits");
        }
        result
    }

    fn persist(&mut self) {
        // Logged inside save(); the session keeps the in-memory state.
        let _ = self.save();
    }

    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&VisitRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }
}
