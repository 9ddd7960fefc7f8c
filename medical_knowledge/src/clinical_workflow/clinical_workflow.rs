// medical_knowledge/src/clinical_workflow/clinical_workflow.rs
//! The clinic workflow engine.
//!
//! `ClinicWorkflow` owns one `ClinicStore` and is the only code that moves
//! slots, appointments, prescriptions and replenishment requests between
//! states. Every mutating operation resolves and checks every row it will
//! touch before writing any of them, so an `Err` leaves the store exactly as
//! it was.

use clinic_lib::storage_engine::{ClinicStore, Collection};
use models::{ClinicError, ClinicResult, Doctor, Patient, SlotReleasePolicy, User};

#[derive(Debug, Clone, PartialEq)]
pub struct ClinicWorkflow {
    pub(crate) store: ClinicStore,
    pub(crate) policy: SlotReleasePolicy,
}

impl ClinicWorkflow {
    pub fn new(store: ClinicStore, policy: SlotReleasePolicy) -> Self {
        ClinicWorkflow { store, policy }
    }

    pub fn store(&self) -> &ClinicStore {
        &self.store
    }

    pub fn into_store(self) -> ClinicStore {
        self.store
    }

    pub fn users(&self) -> &Collection<User> {
        &self.store.users
    }

    /// Account data (passwords, contact details) is not part of any state
    /// machine, so callers may edit it directly.
    pub fn users_mut(&mut self) -> &mut Collection<User> {
        &mut self.store.users
    }

    pub fn doctors(&self) -> Vec<&Doctor> {
        self.store.users.iter().filter_map(User::as_doctor).collect()
    }

    pub(crate) fn require_patient(&self, user_id: &str) -> ClinicResult<&Patient> {
        self.store
            .users
            .find(user_id)?
            .as_patient()
            .ok_or_else(|| ClinicError::InvalidArgument(format!("{} is not a patient", user_id)))
    }

    pub(crate) fn require_doctor(&self, user_id: &str) -> ClinicResult<&Doctor> {
        self.store
            .users
            .find(user_id)?
            .as_doctor()
            .ok_or_else(|| ClinicError::InvalidArgument(format!("{} is not a doctor", user_id)))
    }
}

impl Default for ClinicWorkflow {
    fn default() -> Self {
        ClinicWorkflow::new(ClinicStore::default(), SlotReleasePolicy::default())
    }
}
