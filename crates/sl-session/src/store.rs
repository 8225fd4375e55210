//! The persistence contract.
//!
//! The hosted backend implements [`EncounterStore`] over its own rows and
//! change feeds; [`MemoryStore`] is the in-process reference
//! implementation used by tests and local play.

use std::collections::HashMap;
use std::sync::Mutex;

use sl_core::{Encounter, EncounterId};

/// An error from a store backend.
#[derive(Debug, thiserror::Error)]
#[error("store error: {0}")]
pub struct StoreError(pub String);

/// Load/save contract for encounters.
pub trait EncounterStore {
    /// Load an encounter, or `None` if it does not exist.
    fn load(&self, id: EncounterId) -> Result<Option<Encounter>, StoreError>;

    /// Save (insert or replace) an encounter.
    fn save(&self, encounter: &Encounter) -> Result<(), StoreError>;

    /// Delete an encounter. Deleting an absent encounter is a no-op.
    fn delete(&self, id: EncounterId) -> Result<(), StoreError>;

    /// List the IDs of all stored encounters.
    fn list(&self) -> Result<Vec<EncounterId>, StoreError>;
}

/// In-memory store backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    encounters: Mutex<HashMap<EncounterId, Encounter>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<EncounterId, Encounter>>, StoreError> {
        self.encounters
            .lock()
            .map_err(|_| StoreError("poisoned lock".to_string()))
    }
}

impl EncounterStore for MemoryStore {
    fn load(&self, id: EncounterId) -> Result<Option<Encounter>, StoreError> {
        Ok(self.locked()?.get(&id).cloned())
    }

    fn save(&self, encounter: &Encounter) -> Result<(), StoreError> {
        self.locked()?.insert(encounter.id, encounter.clone());
        Ok(())
    }

    fn delete(&self, id: EncounterId) -> Result<(), StoreError> {
        self.locked()?.remove(&id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<EncounterId>, StoreError> {
        Ok(self.locked()?.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_round_trip() {
        let store = MemoryStore::new();
        let enc = Encounter::new("Ambush");
        let id = enc.id;

        assert!(store.load(id).unwrap().is_none());
        store.save(&enc).unwrap();
        let loaded = store.load(id).unwrap().unwrap();
        assert_eq!(loaded.name, "Ambush");
    }

    #[test]
    fn save_replaces() {
        let store = MemoryStore::new();
        let mut enc = Encounter::new("Ambush");
        store.save(&enc).unwrap();

        enc.round = 4;
        store.save(&enc).unwrap();
        assert_eq!(store.load(enc.id).unwrap().unwrap().round, 4);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let enc = Encounter::new("Ambush");
        store.save(&enc).unwrap();
        store.delete(enc.id).unwrap();
        store.delete(enc.id).unwrap();
        assert!(store.load(enc.id).unwrap().is_none());
    }
}
