// server/src/cli/mod.rs

// Command-line interface for the clinic: argument parsing, the interactive
// console and the per-role command handlers.

pub mod cli;
pub mod handlers_admin;
pub mod handlers_doctor;
pub mod handlers_patient;
pub mod handlers_pharmacist;
pub mod handlers_user;
pub mod handlers_utils;
pub mod interactive;

pub use cli::{load_effective_config, start_cli, CliArgs};
pub use interactive::{run_cli_interactive, Session};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use clinic_lib::storage_engine::seed::sample_store;
    use clinic_lib::ClinicStore;
    use medical_knowledge::ClinicWorkflow;
    use models::{PrescriptionOrder, SlotReleasePolicy};

    /// Sample clinic with slots from 2024-06-03: SL0001-SL0012 belong to
    /// D0001, SL0013-SL0024 to D0002.
    pub fn sample() -> ClinicStore {
        sample_store("password", NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()).unwrap()
    }

    pub fn workflow() -> ClinicWorkflow {
        ClinicWorkflow::new(sample(), SlotReleasePolicy::default())
    }

    pub fn completed_visit(wf: &mut ClinicWorkflow, patient_id: &str, slot_id: &str, orders: &[(&str, u32)]) {
        let appointment = wf.request_appointment(patient_id, "D0001", slot_id).unwrap();
        wf.decide_appointment(&appointment.appointment_id, true).unwrap();
        let orders: Vec<PrescriptionOrder> = orders
            .iter()
            .map(|(medication_id, quantity)| PrescriptionOrder::new(medication_id, *quantity))
            .collect();
        wf.complete_appointment(&appointment.appointment_id, "Consultation", &orders, "")
            .unwrap();
    }
}
