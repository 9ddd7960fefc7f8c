use std::sync::Mutex;

use log::debug;

use models::{ClinicError, ClinicResult};

use crate::storage_engine::{ClinicStore, StorageEngine};

/// Keeps the last saved snapshot in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    snapshot: Mutex<ClinicStore>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: ClinicStore) -> Self {
        InMemoryStorage {
            snapshot: Mutex::new(store),
        }
    }
}

impl StorageEngine for InMemoryStorage {
    fn load(&self) -> ClinicResult<ClinicStore> {
        let snapshot = self
            .snapshot
            .lock()
            .map_err(|e| ClinicError::Storage(format!("in-memory snapshot lock poisoned: {}", e)))?;
        Ok(snapshot.clone())
    }

    fn save(&self, store: &ClinicStore) -> ClinicResult<()> {
        let mut snapshot = self
            .snapshot
            .lock()
            .map_err(|e| ClinicError::Storage(format!("in-memory snapshot lock poisoned: {}", e)))?;
        *snapshot = store.clone();
        debug!("Saved in-memory snapshot: {}", store.summary());
        Ok(())
    }

    fn get_type(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Medication;

    #[test]
    fn load_returns_last_saved_snapshot() {
        let storage = InMemoryStorage::new();
        assert!(storage.load().unwrap().medications.is_empty());

        let mut store = ClinicStore::new();
        store
            .medications
            .add(Medication {
                medication_id: "M0001".into(),
                name: "Paracetamol".into(),
                stock_level: 100,
                low_stock_alert_level: 20,
            })
            .unwrap();
        storage.save(&store).unwrap();

        assert_eq!(storage.load().unwrap(), store);
    }
}
