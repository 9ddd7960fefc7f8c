// lib/src/storage_engine/mod.rs
//! The entity store: one owned `ClinicStore` holding a collection per entity
//! type, loaded from and saved to a `StorageEngine`.

use log::info;

use models::{
    Appointment, ClinicResult, Medication, Outcome, Prescription, ReplenishmentRequest, Slot, User,
};

use crate::config::{StorageConfig, StorageEngineType};

pub mod collection;
pub mod csv_storage;
pub mod inmemory_storage;
pub mod seed;

pub use collection::Collection;
pub use csv_storage::CsvStorage;
pub use inmemory_storage::InMemoryStorage;

/// All entity collections of one clinic. Owned by whoever drives the
/// workflow; there is no process-wide instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClinicStore {
    pub users: Collection<User>,
    pub slots: Collection<Slot>,
    pub appointments: Collection<Appointment>,
    pub outcomes: Collection<Outcome>,
    pub prescriptions: Collection<Prescription>,
    pub medications: Collection<Medication>,
    pub requests: Collection<ReplenishmentRequest>,
}

impl ClinicStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} users, {} slots, {} appointments, {} outcomes, {} prescriptions, {} medications, {} requests",
            self.users.len(),
            self.slots.len(),
            self.appointments.len(),
            self.outcomes.len(),
            self.prescriptions.len(),
            self.medications.len(),
            self.requests.len(),
        )
    }
}

/// Where a `ClinicStore` is loaded from and saved to.
pub trait StorageEngine {
    fn load(&self) -> ClinicResult<ClinicStore>;

    fn save(&self, store: &ClinicStore) -> ClinicResult<()>;

    fn get_type(&self) -> &'static str;
}

pub fn create_storage(config: &StorageConfig) -> Box<dyn StorageEngine> {
    info!("Creating {:?} storage engine", config.engine);
    match config.engine {
        StorageEngineType::Csv => Box::new(CsvStorage::new(&config.data_dir)),
        StorageEngineType::InMemory => Box::new(InMemoryStorage::new()),
    }
}
