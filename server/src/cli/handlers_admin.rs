// server/src/cli/handlers_admin.rs

use clinic_lib::commands::{AdminCommand, MedicationAction, StaffAction};
use medical_knowledge::{ClinicWorkflow, NewStaff};
use models::{ClinicError, ClinicResult};

use crate::cli::handlers_utils::{render_appointments, render_medications, render_requests, render_users, Reply};

/// Administrator commands. New staff accounts start with `default_password`
/// and must change it at first login.
pub fn handle_admin_command(
    wf: &mut ClinicWorkflow,
    admin_id: &str,
    action: AdminCommand,
    default_password: &str,
) -> ClinicResult<Reply> {
    match action {
        AdminCommand::Staff { action } => handle_staff_action(wf, admin_id, action, default_password),
        AdminCommand::Medication { action } => match action {
            MedicationAction::Add { name, stock, alert } => {
                let medication = wf.add_medication(&name, stock, alert)?;
                Ok(Reply::changed(format!("Added {} as {}.", medication.name, medication.medication_id)))
            }
            MedicationAction::Remove { medication_id } => {
                let removed = wf.remove_medication(&medication_id)?;
                Ok(Reply::changed(format!("Removed {} ({}).", removed.name, removed.medication_id)))
            }
        },
        AdminCommand::Stock { medication_id, level } => {
            let medication = wf.adjust_stock(&medication_id, level)?;
            Ok(Reply::changed(format!("{} stock set to {}.", medication.name, medication.stock_level)))
        }
        AdminCommand::Alert { medication_id, level } => {
            let medication = wf.set_low_stock_alert(&medication_id, level)?;
            Ok(Reply::changed(format!(
                "{} low stock alert set to {}.",
                medication.name, medication.low_stock_alert_level
            )))
        }
        AdminCommand::Inventory => {
            let medications: Vec<_> = wf.medications().iter().collect();
            Ok(Reply::view(render_medications(&medications)))
        }
        AdminCommand::LowStock => Ok(Reply::view(render_medications(&wf.low_stock_medications()))),
        AdminCommand::Appointments => {
            let appointments: Vec<_> = wf.appointments().iter().collect();
            Ok(Reply::view(render_appointments(wf, &appointments)))
        }
        AdminCommand::Requests { pending } => {
            let requests = wf.replenishment_requests(pending);
            Ok(Reply::view(render_requests(wf, &requests)))
        }
        AdminCommand::Approve { request_id } => {
            let request = wf.approve_request(&request_id, admin_id)?;
            let medication = wf.store().medications.find(&request.medication_id)?;
            Ok(Reply::changed(format!(
                "Approved {}: {} restocked to {}.",
                request_id, medication.name, medication.stock_level
            )))
        }
    }
}

fn handle_staff_action(
    wf: &mut ClinicWorkflow,
    admin_id: &str,
    action: StaffAction,
    default_password: &str,
) -> ClinicResult<Reply> {
    match action {
        StaffAction::List { role } => Ok(Reply::view(render_users(&wf.staff(role)))),
        StaffAction::Add(args) => {
            let user = wf.add_staff(
                NewStaff {
                    role: args.role,
                    name: args.name,
                    gender: args.gender,
                    age: args.age,
                    specialisation: args.specialisation,
                },
                default_password,
            )?;
            Ok(Reply::changed(format!(
                "Added {} {} as {}. Initial password is the clinic default.",
                user.role(),
                user.name(),
                user.user_id()
            )))
        }
        StaffAction::Remove { user_id } => {
            let removed = wf.remove_staff(&user_id, admin_id)?;
            Ok(Reply::changed(format!("Removed {} {} ({}).", removed.role(), removed.name(), user_id)))
        }
        StaffAction::Update { user_id, name, email, phone } => {
            if name.is_none() && email.is_none() && phone.is_none() {
                return Err(ClinicError::InvalidArgument("give --name, --email and/or --phone".to_string()));
            }
            let user = wf.update_staff(&user_id, name.as_deref(), email.as_deref(), phone.as_deref())?;
            Ok(Reply::changed(format!("Updated {} ({}).", user.name(), user_id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::workflow;
    use clinic_lib::commands::AddStaffArgs;
    use models::{ErrorKind, Role};

    #[test]
    fn new_staff_get_default_password() {
        let mut wf = workflow();
        let reply = handle_admin_command(
            &mut wf,
            "A0001",
            AdminCommand::Staff {
                action: StaffAction::Add(AddStaffArgs {
                    role: Role::Pharmacist,
                    name: "Nina Park".into(),
                    gender: "Female".into(),
                    age: 31,
                    specialisation: None,
                }),
            },
            "welcome1",
        )
        .unwrap();
        assert!(reply.text.contains("PH0002"));
        assert_eq!(wf.users().find("PH0002").unwrap().account().password, "welcome1");
    }

    #[test]
    fn stock_commands_map_engine_errors() {
        let mut wf = workflow();
        let err = handle_admin_command(
            &mut wf,
            "A0001",
            AdminCommand::Stock { medication_id: "M0001".into(), level: -1 },
            "password",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        wf.submit_replenishment_request("M0004", 12, "PH0001").unwrap();
        let reply = handle_admin_command(
            &mut wf,
            "A0001",
            AdminCommand::Approve { request_id: "RQ0001".into() },
            "password",
        )
        .unwrap();
        assert!(reply.text.contains("restocked to 20"));
        let pending = handle_admin_command(&mut wf, "A0001", AdminCommand::Requests { pending: true }, "password")
            .unwrap();
        assert_eq!(pending.text, "No replenishment requests.");
    }
}
