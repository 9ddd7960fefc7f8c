// server/src/cli/handlers_patient.rs

use clinic_lib::commands::PatientCommand;
use medical_knowledge::ClinicWorkflow;
use models::timestamp::DATE_FORMAT;
use models::{ClinicError, ClinicResult};

use crate::cli::handlers_utils::{render_appointments, render_record, render_slots, render_table, Reply};

pub fn handle_patient_command(wf: &mut ClinicWorkflow, patient_id: &str, action: PatientCommand) -> ClinicResult<Reply> {
    match action {
        PatientCommand::Profile => {
            let user = wf.users().find(patient_id)?;
            let patient = user
                .as_patient()
                .ok_or_else(|| ClinicError::Unauthorized(format!("{} is not a patient", patient_id)))?;
            let account = &patient.account;
            Ok(Reply::view(format!(
                "{} ({})\n  Date of birth: {}\n  Gender: {}\n  Blood type: {}\n  Email: {}\n  Phone: {}",
                account.name,
                account.user_id,
                patient.date_of_birth.format(DATE_FORMAT),
                account.gender,
                patient.blood_type,
                account.email.as_deref().unwrap_or("-"),
                account.phone.as_deref().unwrap_or("-"),
            )))
        }
        PatientCommand::UpdateContact { email, phone } => {
            if email.is_none() && phone.is_none() {
                return Err(ClinicError::InvalidArgument("give --email and/or --phone".to_string()));
            }
            wf.update_contact(patient_id, email.as_deref(), phone.as_deref())?;
            Ok(Reply::changed("Contact information updated."))
        }
        PatientCommand::Doctors => {
            let rows: Vec<Vec<String>> = wf
                .doctors()
                .iter()
                .map(|d| vec![d.account.user_id.clone(), d.account.name.clone(), d.specialisation.clone()])
                .collect();
            Ok(Reply::view(render_table(&["ID", "NAME", "SPECIALISATION"], &rows)))
        }
        PatientCommand::Slots { doctor } => {
            if let Some(doctor_id) = doctor.as_deref() {
                wf.users().find(doctor_id)?;
            }
            let slots = wf.available_slots(doctor.as_deref());
            Ok(Reply::view(render_slots(wf, &slots)))
        }
        PatientCommand::Request { doctor_id, slot_id } => {
            let appointment = wf.request_appointment(patient_id, &doctor_id, &slot_id)?;
            Ok(Reply::changed(format!(
                "Requested appointment {} in slot {}. Waiting for the doctor to confirm.",
                appointment.appointment_id, slot_id
            )))
        }
        PatientCommand::Reschedule { appointment_id, slot_id } => {
            wf.appointment_for_patient(patient_id, &appointment_id)?;
            let replacement = wf.reschedule_appointment(&appointment_id, &slot_id)?;
            Ok(Reply::changed(format!(
                "Cancelled {} and requested {} in slot {}.",
                appointment_id, replacement.appointment_id, slot_id
            )))
        }
        PatientCommand::Cancel { appointment_id } => {
            wf.appointment_for_patient(patient_id, &appointment_id)?;
            wf.cancel_appointment(&appointment_id)?;
            Ok(Reply::changed(format!("Cancelled appointment {}.", appointment_id)))
        }
        PatientCommand::Appointments => {
            let appointments = wf.patient_appointments(patient_id);
            Ok(Reply::view(render_appointments(wf, &appointments)))
        }
        PatientCommand::Record => {
            let record = wf.patient_record(patient_id)?;
            Ok(Reply::view(render_record(wf, &record)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::workflow;
    use models::{AppointmentStatus, ErrorKind};

    #[test]
    fn patient_cannot_cancel_someone_elses_appointment() {
        let mut wf = workflow();
        handle_patient_command(
            &mut wf,
            "P1001",
            PatientCommand::Request { doctor_id: "D0001".into(), slot_id: "SL0001".into() },
        )
        .unwrap();

        let err = handle_patient_command(&mut wf, "P1002", PatientCommand::Cancel { appointment_id: "AP0001".into() })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(wf.store().appointments.find("AP0001").unwrap().status, AppointmentStatus::Requested);

        let reply = handle_patient_command(&mut wf, "P1001", PatientCommand::Cancel { appointment_id: "AP0001".into() })
            .unwrap();
        assert!(reply.changed);
    }

    #[test]
    fn views_do_not_ask_for_a_save() {
        let mut wf = workflow();
        for command in [PatientCommand::Profile, PatientCommand::Doctors, PatientCommand::Appointments, PatientCommand::Record] {
            assert!(!handle_patient_command(&mut wf, "P1001", command).unwrap().changed);
        }
        let slots = handle_patient_command(&mut wf, "P1001", PatientCommand::Slots { doctor: Some("D0002".into()) })
            .unwrap();
        assert!(slots.text.contains("SL0013"));
        assert!(!slots.text.contains("SL0001 "));
    }
}
