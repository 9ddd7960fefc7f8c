// medical_knowledge/src/clinical_workflow/prescriptions.rs
//! Prescription and outcome lifecycle, and the medical record views built
//! on top of it.

use log::info;

use models::identifiers::PRESCRIPTION_PREFIX;
use models::{
    Appointment, AppointmentStatus, ClinicError, ClinicResult, Outcome, Patient, Prescription,
    PrescriptionStatus, Slot,
};

use crate::clinical_workflow::ClinicWorkflow;

/// One completed visit as it appears in a medical record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordEntry<'a> {
    pub appointment: &'a Appointment,
    pub slot: Option<&'a Slot>,
    pub outcome: &'a Outcome,
    pub prescriptions: Vec<&'a Prescription>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord<'a> {
    pub patient: &'a Patient,
    pub entries: Vec<RecordEntry<'a>>,
}

impl ClinicWorkflow {
    /// Adds a `PENDING` prescription to a confirmed or completed appointment.
    /// A completed appointment's outcome lists the new prescription too.
    pub fn add_prescription(
        &mut self,
        appointment_id: &str,
        medication_id: &str,
        quantity: u32,
        notes: Option<&str>,
    ) -> ClinicResult<Prescription> {
        let appointment = self.store.appointments.find(appointment_id)?;
        if !matches!(appointment.status, AppointmentStatus::Confirmed | AppointmentStatus::Completed) {
            return Err(ClinicError::InvalidState(format!(
                "appointment {} is {}, prescriptions need a CONFIRMED or COMPLETED appointment",
                appointment_id, appointment.status
            )));
        }
        self.store.medications.find(medication_id)?;
        if quantity == 0 {
            return Err(ClinicError::InvalidArgument("prescription quantity must be positive".to_string()));
        }
        let outcome_index = match &appointment.outcome_id {
            Some(outcome_id) => Some(self.store.outcomes.position(outcome_id)?),
            None => None,
        };

        let prescription = Prescription {
            prescription_id: self.store.prescriptions.next_id(PRESCRIPTION_PREFIX)?,
            appointment_id: appointment_id.to_string(),
            medication_id: medication_id.to_string(),
            quantity,
            status: PrescriptionStatus::Pending,
            notes: notes.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string),
        };
        self.store.prescriptions.add(prescription.clone())?;
        if let Some(index) = outcome_index {
            self.store
                .outcomes
                .at_mut(index)
                .prescription_ids
                .push(prescription.prescription_id.clone());
        }
        info!(
            "{} prescribed {} x{} on {}",
            prescription.prescription_id, medication_id, quantity, appointment_id
        );
        Ok(prescription)
    }

    /// Hands out a pending prescription, taking its quantity out of stock.
    pub fn dispense(&mut self, prescription_id: &str) -> ClinicResult<Prescription> {
        let prescription_index = self.store.prescriptions.position(prescription_id)?;
        let prescription = self.store.prescriptions.at(prescription_index);
        if prescription.status == PrescriptionStatus::Dispensed {
            return Err(ClinicError::AlreadyDispensed(prescription_id.to_string()));
        }
        let medication_index = self.store.medications.position(&prescription.medication_id)?;
        let medication = self.store.medications.at(medication_index);
        if medication.stock_level < prescription.quantity {
            return Err(ClinicError::InsufficientStock {
                medication_id: medication.medication_id.clone(),
                requested: prescription.quantity,
                available: medication.stock_level,
            });
        }

        let quantity = prescription.quantity;
        let medication = self.store.medications.at_mut(medication_index);
        medication.stock_level -= quantity;
        if medication.is_low_stock() {
            info!(
                "{} is low on stock after dispensing: {} left (alert at {})",
                medication.name, medication.stock_level, medication.low_stock_alert_level
            );
        }
        let prescription = self.store.prescriptions.at_mut(prescription_index);
        prescription.status = PrescriptionStatus::Dispensed;
        info!("Dispensed {} ({} x{})", prescription_id, prescription.medication_id, quantity);
        Ok(prescription.clone())
    }

    pub fn pending_prescriptions(&self) -> Vec<&Prescription> {
        self.store.prescriptions.filter(Prescription::is_pending)
    }

    pub fn prescriptions_for(&self, outcome: &Outcome) -> Vec<&Prescription> {
        outcome
            .prescription_ids
            .iter()
            .filter_map(|id| self.store.prescriptions.get(id))
            .collect()
    }

    /// Outcomes that still list at least one undispensed prescription.
    pub fn outcomes_with_pending(&self) -> Vec<&Outcome> {
        self.store
            .outcomes
            .filter(|o| self.prescriptions_for(o).iter().any(|p| p.is_pending()))
    }

    pub fn patient_record(&self, patient_id: &str) -> ClinicResult<PatientRecord<'_>> {
        let patient = self.require_patient(patient_id)?;
        let entries = self
            .patient_appointments(patient_id)
            .into_iter()
            .filter_map(|appointment| {
                let outcome = self.store.outcomes.get(appointment.outcome_id.as_deref()?)?;
                Some(RecordEntry {
                    appointment,
                    slot: self.slot_of(appointment),
                    outcome,
                    prescriptions: self.prescriptions_for(outcome),
                })
            })
            .collect();
        Ok(PatientRecord { patient, entries })
    }

    /// A doctor may read the record of any patient with a confirmed or
    /// completed appointment with them.
    pub fn patient_record_for_doctor(&self, doctor_id: &str, patient_id: &str) -> ClinicResult<PatientRecord<'_>> {
        self.require_doctor(doctor_id)?;
        let seen = self.store.appointments.iter().any(|a| {
            a.doctor_id == doctor_id
                && a.patient_id == patient_id
                && matches!(a.status, AppointmentStatus::Confirmed | AppointmentStatus::Completed)
        });
        if !seen {
            return Err(ClinicError::Unauthorized(format!(
                "{} has no confirmed appointment with {}",
                doctor_id, patient_id
            )));
        }
        self.patient_record(patient_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinical_workflow::test_support::{completed_visit, workflow};
    use models::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn dispense_takes_exact_quantity_once() {
        let mut wf = workflow();
        completed_visit(&mut wf, "P1001", "SL0001", &[("M0001", 30)]);

        let dispensed = wf.dispense("RX0001").unwrap();
        assert_eq!(dispensed.status, PrescriptionStatus::Dispensed);
        assert_eq!(wf.store().medications.find("M0001").unwrap().stock_level, 70);

        let err = wf.dispense("RX0001").unwrap_err();
        assert_eq!(err, ClinicError::AlreadyDispensed("RX0001".to_string()));
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(wf.store().medications.find("M0001").unwrap().stock_level, 70);
    }

    #[test]
    fn dispense_checks_stock_first() {
        let mut wf = workflow();
        completed_visit(&mut wf, "P1001", "SL0001", &[("M0004", 9)]);
        let before = wf.clone();

        let err = wf.dispense("RX0001").unwrap_err();
        assert_eq!(
            err,
            ClinicError::InsufficientStock {
                medication_id: "M0004".to_string(),
                requested: 9,
                available: 8
            }
        );
        assert_eq!(wf, before);
    }

    #[test]
    fn add_prescription_appends_to_existing_outcome() {
        let mut wf = workflow();
        completed_visit(&mut wf, "P1001", "SL0001", &[("M0001", 1)]);

        let added = wf.add_prescription("AP0001", "M0002", 3, Some("  at night ")).unwrap();
        assert_eq!(added.prescription_id, "RX0002");
        assert_eq!(added.notes.as_deref(), Some("at night"));
        assert_eq!(wf.store().outcomes.find("OC0001").unwrap().prescription_ids, vec!["RX0001", "RX0002"]);
    }

    #[test]
    fn add_prescription_requires_confirmed_or_completed() {
        let mut wf = workflow();
        wf.request_appointment("P1001", "D0001", "SL0001").unwrap();
        let err = wf.add_prescription("AP0001", "M0001", 1, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        wf.decide_appointment("AP0001", true).unwrap();
        assert_eq!(wf.add_prescription("AP0001", "M0404", 1, None).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(wf.add_prescription("AP0001", "M0001", 0, None).unwrap_err().kind(), ErrorKind::InvalidArgument);
        let rx = wf.add_prescription("AP0001", "M0001", 2, None).unwrap();
        assert!(rx.is_pending());
        assert!(wf.store().outcomes.is_empty());
    }

    #[test]
    fn pending_views_track_dispensing() {
        let mut wf = workflow();
        completed_visit(&mut wf, "P1001", "SL0001", &[("M0001", 1), ("M0002", 1)]);
        assert_eq!(wf.pending_prescriptions().len(), 2);
        assert_eq!(wf.outcomes_with_pending().len(), 1);

        wf.dispense("RX0001").unwrap();
        wf.dispense("RX0002").unwrap();
        assert!(wf.pending_prescriptions().is_empty());
        assert!(wf.outcomes_with_pending().is_empty());
    }

    #[test]
    fn record_lists_completed_visits_only() {
        let mut wf = workflow();
        completed_visit(&mut wf, "P1001", "SL0001", &[("M0001", 1)]);
        wf.request_appointment("P1001", "D0001", "SL0002").unwrap();

        let record = wf.patient_record("P1001").unwrap();
        assert_eq!(record.patient.account.user_id, "P1001");
        assert_eq!(record.entries.len(), 1);
        assert_eq!(record.entries[0].outcome.outcome_id, "OC0001");
        assert_eq!(record.entries[0].prescriptions.len(), 1);
        assert_eq!(record.entries[0].slot.map(|s| s.slot_id.as_str()), Some("SL0001"));
    }

    #[test]
    fn doctors_only_read_records_of_their_patients() {
        let mut wf = workflow();
        completed_visit(&mut wf, "P1001", "SL0001", &[]);
        assert!(wf.patient_record_for_doctor("D0001", "P1001").is_ok());
        assert_eq!(
            wf.patient_record_for_doctor("D0002", "P1001").unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            wf.patient_record_for_doctor("D0001", "P1002").unwrap_err().kind(),
            ErrorKind::Unauthorized
        );
    }
}
