//! Property tests for the stock invariants: stock never goes negative,
//! dispensing takes exactly the prescribed quantity once, and approval adds
//! exactly the requested quantity once.

use chrono::NaiveDate;
use proptest::prelude::*;

use clinic_lib::storage_engine::seed::sample_store;
use medical_knowledge::ClinicWorkflow;
use models::{ClinicError, PrescriptionOrder, SlotReleasePolicy};

fn visit_with_prescription(stock: u32, quantity: u32) -> (ClinicWorkflow, String) {
    let store = sample_store("password", NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()).unwrap();
    let mut wf = ClinicWorkflow::new(store, SlotReleasePolicy::Remove);
    wf.adjust_stock("M0001", i64::from(stock)).unwrap();
    let appointment = wf.request_appointment("P1001", "D0001", "SL0001").unwrap();
    wf.decide_appointment(&appointment.appointment_id, true).unwrap();
    let outcome = wf
        .complete_appointment(
            &appointment.appointment_id,
            "Consultation",
            &[PrescriptionOrder::new("M0001", quantity)],
            "",
        )
        .unwrap();
    (wf, outcome.prescription_ids[0].clone())
}

fn stock(wf: &ClinicWorkflow) -> u32 {
    wf.store().medications.find("M0001").unwrap().stock_level
}

proptest! {
    /// Dispensing either takes exactly `quantity` or fails without touching stock.
    #[test]
    fn prop_dispense_is_exact_or_rejected(initial in 0u32..500, quantity in 1u32..500) {
        let (mut wf, rx) = visit_with_prescription(initial, quantity);
        match wf.dispense(&rx) {
            Ok(_) => {
                prop_assert!(quantity <= initial);
                prop_assert_eq!(stock(&wf), initial - quantity);
                let second = wf.dispense(&rx);
                prop_assert_eq!(second, Err(ClinicError::AlreadyDispensed(rx.clone())));
                prop_assert_eq!(stock(&wf), initial - quantity);
            }
            Err(e) => {
                prop_assert!(quantity > initial);
                prop_assert_eq!(
                    e,
                    ClinicError::InsufficientStock {
                        medication_id: "M0001".to_string(),
                        requested: quantity,
                        available: initial,
                    }
                );
                prop_assert_eq!(stock(&wf), initial);
            }
        }
    }

    /// Approving a request adds its quantity once; later attempts change nothing.
    #[test]
    fn prop_approve_at_most_once(initial in 0u32..10_000, quantity in 1u32..10_000, attempts in 2usize..5) {
        let (mut wf, _) = visit_with_prescription(initial, 1);
        let request = wf.submit_replenishment_request("M0001", quantity, "PH0001").unwrap();
        prop_assert!(wf.approve_request(&request.request_id, "A0001").is_ok());
        for _ in 1..attempts {
            prop_assert!(wf.approve_request(&request.request_id, "A0001").is_err());
        }
        prop_assert_eq!(stock(&wf), initial + quantity);
    }

    /// Negative stock levels are always refused.
    #[test]
    fn prop_negative_stock_refused(level in i64::MIN..0) {
        let (mut wf, _) = visit_with_prescription(10, 1);
        prop_assert!(wf.adjust_stock("M0001", level).is_err());
        prop_assert_eq!(stock(&wf), 10);
    }
}
