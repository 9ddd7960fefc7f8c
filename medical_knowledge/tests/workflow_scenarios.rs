//! End to end runs of the clinic workflow through the public API, including
//! a save and reload through the in-memory storage engine.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use clinic_lib::storage_engine::seed::sample_store;
use clinic_lib::storage_engine::{InMemoryStorage, StorageEngine};
use medical_knowledge::ClinicWorkflow;
use models::{
    AppointmentStatus, ErrorKind, PrescriptionOrder, PrescriptionStatus, RequestStatus,
    SlotReleasePolicy, SlotStatus,
};

fn workflow() -> ClinicWorkflow {
    let store = sample_store("password", NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()).unwrap();
    ClinicWorkflow::new(store, SlotReleasePolicy::Remove)
}

fn slot_status(wf: &ClinicWorkflow, slot_id: &str) -> SlotStatus {
    wf.store().slots.find(slot_id).unwrap().status
}

#[test]
fn request_accept_complete_yields_one_outcome() {
    let mut wf = workflow();

    let a1 = wf.request_appointment("P1001", "D0001", "SL0001").unwrap();
    assert_eq!(a1.status, AppointmentStatus::Requested);
    assert_eq!(slot_status(&wf, "SL0001"), SlotStatus::Pending);

    let a1 = wf.decide_appointment(&a1.appointment_id, true).unwrap();
    assert_eq!(a1.status, AppointmentStatus::Confirmed);
    assert_eq!(slot_status(&wf, "SL0001"), SlotStatus::Booked);

    let o1 = wf
        .complete_appointment(&a1.appointment_id, "Consult", &[PrescriptionOrder::new("M0001", 2)], "notes")
        .unwrap();
    assert_eq!(slot_status(&wf, "SL0001"), SlotStatus::Completed);
    let a1 = wf.store().appointments.find(&a1.appointment_id).unwrap();
    assert_eq!(a1.status, AppointmentStatus::Completed);
    assert_eq!(a1.outcome_id.as_deref(), Some(o1.outcome_id.as_str()));
    assert_eq!(wf.store().outcomes.len(), 1);
    assert_eq!(o1.consultation_notes, "notes");
    assert_eq!(o1.service_provided, "Consult");

    let rx = wf.store().prescriptions.find(&o1.prescription_ids[0]).unwrap();
    assert_eq!(rx.status, PrescriptionStatus::Pending);
    assert_eq!(rx.quantity, 2);
}

#[test]
fn prescription_to_restock_round_trip() {
    let mut wf = workflow();
    let appointment = wf.request_appointment("P1002", "D0002", "SL0013").unwrap();
    wf.decide_appointment(&appointment.appointment_id, true).unwrap();
    let outcome = wf
        .complete_appointment(
            &appointment.appointment_id,
            "Asthma review",
            &[PrescriptionOrder::new("M0004", 8).with_notes("two puffs as needed")],
            "",
        )
        .unwrap();

    wf.dispense(&outcome.prescription_ids[0]).unwrap();
    assert_eq!(wf.store().medications.find("M0004").unwrap().stock_level, 0);
    assert_eq!(wf.low_stock_medications().len(), 1);

    let request = wf.submit_replenishment_request("M0004", 50, "PH0001").unwrap();
    wf.approve_request(&request.request_id, "A0001").unwrap();
    assert_eq!(wf.store().medications.find("M0004").unwrap().stock_level, 50);
    assert_eq!(
        wf.store().requests.find(&request.request_id).unwrap().status,
        RequestStatus::Approved
    );
    assert!(wf.low_stock_medications().is_empty());
}

#[test]
fn failed_accept_changes_nothing() {
    let mut wf = workflow();
    let appointment = wf.request_appointment("P1001", "D0001", "SL0001").unwrap();
    wf.cancel_appointment(&appointment.appointment_id).unwrap();
    let before = wf.clone();

    let err = wf.decide_appointment(&appointment.appointment_id, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(wf, before);
}

#[test]
fn ids_continue_after_reload() {
    let storage = InMemoryStorage::new();
    let mut wf = workflow();
    wf.request_appointment("P1001", "D0001", "SL0001").unwrap();
    storage.save(&wf.into_store()).unwrap();

    let mut reloaded = ClinicWorkflow::new(storage.load().unwrap(), SlotReleasePolicy::Remove);
    let next = reloaded.request_appointment("P1002", "D0001", "SL0002").unwrap();
    assert_eq!(next.appointment_id, "AP0002");
}
