// server/src/cli/handlers_doctor.rs

use clinic_lib::commands::DoctorCommand;
use medical_knowledge::ClinicWorkflow;
use models::ClinicResult;

use crate::cli::handlers_utils::{render_appointments, render_outcome, render_record, render_slots, Reply};

pub fn handle_doctor_command(wf: &mut ClinicWorkflow, doctor_id: &str, action: DoctorCommand) -> ClinicResult<Reply> {
    match action {
        DoctorCommand::Schedule => {
            let slots = wf.doctor_schedule(doctor_id)?;
            Ok(Reply::view(render_slots(wf, &slots)))
        }
        DoctorCommand::AddSlot { date, start, end } => {
            let slot = wf.add_slot(doctor_id, date, start, end)?;
            Ok(Reply::changed(format!("Added slot {} on {} {}.", slot.slot_id, slot.date, slot.time_range())))
        }
        DoctorCommand::RemoveSlot { slot_id } => {
            wf.remove_slot(doctor_id, &slot_id)?;
            Ok(Reply::changed(format!("Removed slot {}.", slot_id)))
        }
        DoctorCommand::Requests => {
            let requests = wf.pending_requests(doctor_id);
            Ok(Reply::view(render_appointments(wf, &requests)))
        }
        DoctorCommand::Accept { appointment_id } => decide(wf, doctor_id, &appointment_id, true),
        DoctorCommand::Decline { appointment_id } => decide(wf, doctor_id, &appointment_id, false),
        DoctorCommand::Appointments => {
            let upcoming = wf.upcoming_appointments(doctor_id);
            Ok(Reply::view(render_appointments(wf, &upcoming)))
        }
        DoctorCommand::Complete { appointment_id, service, prescriptions, notes } => {
            wf.appointment_for_doctor(doctor_id, &appointment_id)?;
            let outcome = wf.complete_appointment(&appointment_id, &service, &prescriptions, &notes)?;
            Ok(Reply::changed(format!("Completed {}.\n{}", appointment_id, render_outcome(wf, &outcome))))
        }
        DoctorCommand::Prescribe { appointment_id, medication_id, quantity, notes } => {
            wf.appointment_for_doctor(doctor_id, &appointment_id)?;
            let prescription = wf.add_prescription(&appointment_id, &medication_id, quantity, notes.as_deref())?;
            Ok(Reply::changed(format!(
                "Prescribed {} x{} as {}.",
                medication_id, quantity, prescription.prescription_id
            )))
        }
        DoctorCommand::Record { patient_id } => {
            let record = wf.patient_record_for_doctor(doctor_id, &patient_id)?;
            Ok(Reply::view(render_record(wf, &record)))
        }
    }
}

fn decide(wf: &mut ClinicWorkflow, doctor_id: &str, appointment_id: &str, accept: bool) -> ClinicResult<Reply> {
    wf.appointment_for_doctor(doctor_id, appointment_id)?;
    let appointment = wf.decide_appointment(appointment_id, accept)?;
    Ok(Reply::changed(format!("Appointment {} is now {}.", appointment_id, appointment.status)))
}
