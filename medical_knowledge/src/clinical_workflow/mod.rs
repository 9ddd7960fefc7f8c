// medical_knowledge/src/clinical_workflow/mod.rs

pub mod appointments;
pub mod clinical_workflow;
pub mod inventory;
pub mod prescriptions;
pub mod staff;

pub use clinical_workflow::ClinicWorkflow;
pub use prescriptions::{PatientRecord, RecordEntry};
pub use staff::NewStaff;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveTime};
    use clinic_lib::storage_engine::seed::sample_store;
    use models::{PrescriptionOrder, SlotReleasePolicy};

    use super::ClinicWorkflow;

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    pub fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    /// Sample clinic with slots from 2024-06-03: SL0001-SL0012 belong to
    /// D0001, SL0013-SL0024 to D0002.
    pub fn workflow_with(policy: SlotReleasePolicy) -> ClinicWorkflow {
        ClinicWorkflow::new(sample_store("password", date(2024, 6, 3)).unwrap(), policy)
    }

    pub fn workflow() -> ClinicWorkflow {
        workflow_with(SlotReleasePolicy::default())
    }

    /// Books `slot_id` of D0001 for `patient_id`, confirms it and completes
    /// it with the given prescriptions.
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
