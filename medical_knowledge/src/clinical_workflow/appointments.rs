// medical_knowledge/src/clinical_workflow/appointments.rs
//! Slot and appointment lifecycle.

use chrono::{NaiveDate, NaiveTime};
use log::info;

use models::identifiers::{format_id, APPOINTMENT_PREFIX, OUTCOME_PREFIX, PRESCRIPTION_PREFIX, SLOT_PREFIX};
use models::{
    non_empty, Appointment, AppointmentStatus, ClinicError, ClinicResult, Outcome, Prescription,
    PrescriptionOrder, PrescriptionStatus, Slot, SlotStatus, ValidationError,
};

use crate::clinical_workflow::ClinicWorkflow;

fn invalid_state(message: String) -> ClinicError {
    ClinicError::InvalidState(message)
}

impl ClinicWorkflow {
    /// Patient asks for `slot_id` of `doctor_id`. The slot goes to `PENDING`
    /// until the doctor decides.
    pub fn request_appointment(&mut self, patient_id: &str, doctor_id: &str, slot_id: &str) -> ClinicResult<Appointment> {
        self.require_patient(patient_id)?;
        self.require_doctor(doctor_id)?;
        let slot_index = self.store.slots.position(slot_id)?;
        let slot = self.store.slots.at(slot_index);
        if slot.doctor_id != doctor_id {
            return Err(ClinicError::InvalidArgument(format!(
                "slot {} belongs to {}, not {}",
                slot_id, slot.doctor_id, doctor_id
            )));
        }
        if !slot.is_available() {
            return Err(invalid_state(format!("slot {} is {}, not AVAILABLE", slot_id, slot.status)));
        }

        let appointment = Appointment::requested(
            self.store.appointments.next_id(APPOINTMENT_PREFIX)?,
            patient_id,
            doctor_id,
            slot_id,
        );
        self.store.appointments.add(appointment.clone())?;
        self.store.slots.at_mut(slot_index).status = SlotStatus::Pending;
        info!("{} requested {} with {} ({})", patient_id, slot_id, doctor_id, appointment.appointment_id);
        Ok(appointment)
    }

    /// Doctor accepts (slot `BOOKED`, appointment `CONFIRMED`) or declines
    /// (slot `REMOVED`, appointment `CANCELLED`) a requested appointment.
    pub fn decide_appointment(&mut self, appointment_id: &str, accept: bool) -> ClinicResult<Appointment> {
        let appointment_index = self.store.appointments.position(appointment_id)?;
        let appointment = self.store.appointments.at(appointment_index);
        if appointment.status != AppointmentStatus::Requested {
            return Err(invalid_state(format!(
                "appointment {} is {}, only REQUESTED appointments can be decided",
                appointment_id, appointment.status
            )));
        }
        let slot_index = self.store.slots.position(&appointment.slot_id)?;
        let slot = self.store.slots.at(slot_index);
        if slot.status != SlotStatus::Pending {
            return Err(invalid_state(format!(
                "slot {} is {}, expected PENDING",
                slot.slot_id, slot.status
            )));
        }

        let (slot_status, appointment_status) = if accept {
            (SlotStatus::Booked, AppointmentStatus::Confirmed)
        } else {
            (SlotStatus::Removed, AppointmentStatus::Cancelled)
        };
        self.store.slots.at_mut(slot_index).status = slot_status;
        let appointment = self.store.appointments.at_mut(appointment_index);
        appointment.status = appointment_status;
        info!("{} is now {}", appointment_id, appointment_status);
        Ok(appointment.clone())
    }

    /// Records the outcome of a confirmed appointment together with one
    /// `PENDING` prescription per order.
    pub fn complete_appointment(
        &mut self,
        appointment_id: &str,
        service_provided: &str,
        orders: &[PrescriptionOrder],
        consultation_notes: &str,
    ) -> ClinicResult<Outcome> {
        let appointment_index = self.store.appointments.position(appointment_id)?;
        let appointment = self.store.appointments.at(appointment_index);
        if appointment.status != AppointmentStatus::Confirmed {
            return Err(invalid_state(format!(
                "appointment {} is {}, only CONFIRMED appointments can be completed",
                appointment_id, appointment.status
            )));
        }
        if appointment.outcome_id.is_some()
            || self.store.outcomes.iter().any(|o| o.appointment_id == appointment_id)
        {
            return Err(invalid_state(format!("appointment {} already has an outcome", appointment_id)));
        }
        let service_provided = non_empty("service provided", service_provided)?;
        for order in orders {
            self.store.medications.find(&order.medication_id)?;
            if order.quantity == 0 {
                return Err(ClinicError::InvalidArgument(format!(
                    "prescription quantity for {} must be positive",
                    order.medication_id
                )));
            }
        }
        let slot_index = self.store.slots.position(&appointment.slot_id)?;
        let slot = self.store.slots.at(slot_index);
        if slot.status != SlotStatus::Booked {
            return Err(invalid_state(format!("slot {} is {}, expected BOOKED", slot.slot_id, slot.status)));
        }

        // Prescriptions written while the appointment was CONFIRMED join the outcome.
        let earlier_rx: Vec<String> = self
            .store
            .prescriptions
            .iter()
            .filter(|p| p.appointment_id == appointment_id)
            .map(|p| p.prescription_id.clone())
            .collect();
        let outcome_id = self.store.outcomes.next_id(OUTCOME_PREFIX)?;
        let first_rx = self.store.prescriptions.next_sequence(PRESCRIPTION_PREFIX)?;
        let prescriptions = orders
            .iter()
            .enumerate()
            .map(|(offset, order)| -> ClinicResult<Prescription> {
                let sequence = u32::try_from(offset)
                    .ok()
                    .and_then(|offset| first_rx.checked_add(offset))
                    .ok_or_else(|| ValidationError::SequenceExhausted(PRESCRIPTION_PREFIX.to_string()))?;
                Ok(Prescription {
                    prescription_id: format_id(PRESCRIPTION_PREFIX, sequence),
                    appointment_id: appointment_id.to_string(),
                    medication_id: order.medication_id.clone(),
                    quantity: order.quantity,
                    status: PrescriptionStatus::Pending,
                    notes: order.notes.clone(),
                })
            })
            .collect::<ClinicResult<Vec<_>>>()?;
        let outcome = Outcome {
            outcome_id: outcome_id.clone(),
            appointment_id: appointment_id.to_string(),
            date: slot.date,
            service_provided,
            prescription_ids: earlier_rx
                .into_iter()
                .chain(prescriptions.iter().map(|p| p.prescription_id.clone()))
                .collect(),
            consultation_notes: consultation_notes.trim().to_string(),
        };

        for prescription in prescriptions {
            self.store.prescriptions.add(prescription)?;
        }
        self.store.outcomes.add(outcome.clone())?;
        self.store.slots.at_mut(slot_index).status = SlotStatus::Completed;
        let appointment = self.store.appointments.at_mut(appointment_index);
        appointment.status = AppointmentStatus::Completed;
        appointment.outcome_id = Some(outcome_id);
        info!(
            "{} completed with outcome {} and {} prescriptions",
            appointment_id,
            outcome.outcome_id,
            outcome.prescription_ids.len()
        );
        Ok(outcome)
    }

    /// Cancels a requested or confirmed appointment. The slot follows the
    /// configured `SlotReleasePolicy`.
    pub fn cancel_appointment(&mut self, appointment_id: &str) -> ClinicResult<Appointment> {
        let (appointment_index, slot_index) = self.cancellable(appointment_id)?;
        let released = self.policy.released_status();
        self.store.slots.at_mut(slot_index).status = released;
        let appointment = self.store.appointments.at_mut(appointment_index);
        appointment.status = AppointmentStatus::Cancelled;
        info!("{} cancelled, slot {} is now {}", appointment_id, appointment.slot_id, released);
        Ok(appointment.clone())
    }

    /// Cancels `appointment_id` and requests `new_slot_id` in its place, or
    /// changes nothing.
    pub fn reschedule_appointment(&mut self, appointment_id: &str, new_slot_id: &str) -> ClinicResult<Appointment> {
        let (appointment_index, old_slot_index) = self.cancellable(appointment_id)?;
        let new_slot_index = self.store.slots.position(new_slot_id)?;
        if new_slot_index == old_slot_index {
            return Err(ClinicError::InvalidArgument(format!(
                "appointment {} is already in slot {}",
                appointment_id, new_slot_id
            )));
        }
        let new_slot = self.store.slots.at(new_slot_index);
        if !new_slot.is_available() {
            return Err(invalid_state(format!("slot {} is {}, not AVAILABLE", new_slot_id, new_slot.status)));
        }
        let patient_id = self.store.appointments.at(appointment_index).patient_id.clone();
        let replacement = Appointment::requested(
            self.store.appointments.next_id(APPOINTMENT_PREFIX)?,
            &patient_id,
            &new_slot.doctor_id,
            new_slot_id,
        );

        self.store.appointments.add(replacement.clone())?;
        self.store.slots.at_mut(new_slot_index).status = SlotStatus::Pending;
        self.store.slots.at_mut(old_slot_index).status = self.policy.released_status();
        self.store.appointments.at_mut(appointment_index).status = AppointmentStatus::Cancelled;
        info!(
            "{} rescheduled {} to {} as {}",
            patient_id, appointment_id, new_slot_id, replacement.appointment_id
        );
        Ok(replacement)
    }

    fn cancellable(&self, appointment_id: &str) -> ClinicResult<(usize, usize)> {
        let appointment_index = self.store.appointments.position(appointment_id)?;
        let appointment = self.store.appointments.at(appointment_index);
        if !appointment.status.is_cancellable() {
            return Err(invalid_state(format!(
                "appointment {} is {} and can no longer be cancelled",
                appointment_id, appointment.status
            )));
        }
        let slot_index = self.store.slots.position(&appointment.slot_id)?;
        Ok((appointment_index, slot_index))
    }

    /// Opens a new `AVAILABLE` slot. It must not overlap another live slot of
    /// the same doctor.
    pub fn add_slot(&mut self, doctor_id: &str, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> ClinicResult<Slot> {
        self.require_doctor(doctor_id)?;
        if start >= end {
            return Err(ClinicError::InvalidArgument(format!(
                "slot start {} must be before end {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        let slot = Slot {
            slot_id: self.store.slots.next_id(SLOT_PREFIX)?,
            doctor_id: doctor_id.to_string(),
            date,
            start_time: start,
            end_time: end,
            status: SlotStatus::Available,
        };
        if let Some(clash) = self
            .store
            .slots
            .iter()
            .find(|s| s.doctor_id == doctor_id && s.status != SlotStatus::Removed && s.overlaps(&slot))
        {
            return Err(ClinicError::InvalidArgument(format!(
                "{} {} overlaps slot {} ({})",
                date,
                slot.time_range(),
                clash.slot_id,
                clash.time_range()
            )));
        }
        self.store.slots.add(slot.clone())?;
        info!("{} opened slot {} on {} {}", doctor_id, slot.slot_id, date, slot.time_range());
        Ok(slot)
    }

    /// Retires one of the doctor's own `AVAILABLE` slots.
    pub fn remove_slot(&mut self, doctor_id: &str, slot_id: &str) -> ClinicResult<Slot> {
        let slot_index = self.store.slots.position(slot_id)?;
        let slot = self.store.slots.at(slot_index);
        if slot.doctor_id != doctor_id {
            return Err(ClinicError::Unauthorized(format!("slot {} does not belong to {}", slot_id, doctor_id)));
        }
        if !slot.is_available() {
            return Err(invalid_state(format!(
                "slot {} is {}, only AVAILABLE slots can be removed",
                slot_id, slot.status
            )));
        }
        let slot = self.store.slots.at_mut(slot_index);
        slot.status = SlotStatus::Removed;
        info!("{} removed slot {}", doctor_id, slot_id);
        Ok(slot.clone())
    }

    /// All of a doctor's slots: booked first, removed last, then by date and
    /// start time.
    pub fn doctor_schedule(&self, doctor_id: &str) -> ClinicResult<Vec<&Slot>> {
        self.require_doctor(doctor_id)?;
        let mut slots = self.store.slots.filter(|s| s.doctor_id == doctor_id);
        slots.sort_by(|a, b| a.schedule_order(b));
        Ok(slots)
    }

    /// Bookable slots, optionally for one doctor only.
    pub fn available_slots(&self, doctor_id: Option<&str>) -> Vec<&Slot> {
        let mut slots = self
            .store
            .slots
            .filter(|s| s.is_available() && doctor_id.map_or(true, |d| s.doctor_id == d));
        slots.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.start_time.cmp(&b.start_time))
                .then_with(|| a.doctor_id.cmp(&b.doctor_id))
        });
        slots
    }

    pub fn slot_of(&self, appointment: &Appointment) -> Option<&Slot> {
        self.store.slots.get(&appointment.slot_id)
    }

    pub fn appointments(&self) -> &[Appointment] {
        self.store.appointments.list()
    }

    /// Appointments whose slot is known, in slot date/time order.
    fn sorted_by_slot<'a>(&'a self, mut appointments: Vec<&'a Appointment>) -> Vec<&'a Appointment> {
        appointments.sort_by_key(|a| self.slot_of(a).map(|s| (s.date, s.start_time)));
        appointments
    }

    pub fn pending_requests(&self, doctor_id: &str) -> Vec<&Appointment> {
        self.sorted_by_slot(self.store.appointments.filter(|a| {
            a.doctor_id == doctor_id && a.status == AppointmentStatus::Requested
        }))
    }

    pub fn upcoming_appointments(&self, doctor_id: &str) -> Vec<&Appointment> {
        self.sorted_by_slot(self.store.appointments.filter(|a| {
            a.doctor_id == doctor_id && a.status == AppointmentStatus::Confirmed
        }))
    }

    pub fn patient_appointments(&self, patient_id: &str) -> Vec<&Appointment> {
        self.sorted_by_slot(self.store.appointments.filter(|a| a.patient_id == patient_id))
    }

    /// The appointment, if `doctor_id` is the doctor it was booked with.
    pub fn appointment_for_doctor(&self, doctor_id: &str, appointment_id: &str) -> ClinicResult<&Appointment> {
        let appointment = self.store.appointments.find(appointment_id)?;
        if appointment.doctor_id != doctor_id {
            return Err(ClinicError::Unauthorized(format!(
                "appointment {} is not with {}",
                appointment_id, doctor_id
            )));
        }
        Ok(appointment)
    }

    /// The appointment, if it belongs to `patient_id`.
    pub fn appointment_for_patient(&self, patient_id: &str, appointment_id: &str) -> ClinicResult<&Appointment> {
        let appointment = self.store.appointments.find(appointment_id)?;
        if appointment.patient_id != patient_id {
            return Err(ClinicError::Unauthorized(format!(
                "appointment {} does not belong to {}",
                appointment_id, patient_id
            )));
        }
        Ok(appointment)
    }
}
