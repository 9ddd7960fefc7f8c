// server/src/cli/handlers_user.rs
//! Commands every signed-in user has, whatever their role.

use clap::CommandFactory;

use clinic_lib::commands::{AdminLine, DoctorLine, PatientLine, PharmacistLine};
use clinic_lib::AuthService;
use medical_knowledge::ClinicWorkflow;
use models::{ClinicResult, Role, User};

use crate::cli::handlers_utils::{render_table, Reply};

pub const COMMON_COMMANDS: &[(&str, &str)] = &[
    ("help", "Show this list"),
    ("whoami", "Show who is logged in"),
    ("password", "Change your password: password <OLD> <NEW>"),
    ("clear", "Clear the screen"),
    ("logout", "Log out and return to the login prompt"),
    ("exit", "Save and leave (also: quit)"),
];

pub fn role_command(role: Role) -> clap::Command {
    match role {
        Role::Patient => PatientLine::command(),
        Role::Doctor => DoctorLine::command(),
        Role::Pharmacist => PharmacistLine::command(),
        Role::Administrator => AdminLine::command(),
    }
}

/// Names of the role's commands plus the common ones, for suggestions.
pub fn command_names(role: Role) -> Vec<String> {
    role_command(role)
        .get_subcommands()
        .map(|c| c.get_name().to_string())
        .chain(COMMON_COMMANDS.iter().map(|(name, _)| name.to_string()))
        .chain(std::iter::once("quit".to_string()))
        .collect()
}

pub fn help_text(role: Role) -> String {
    let command = role_command(role);
    let mut rows: Vec<Vec<String>> = command
        .get_subcommands()
        .filter(|c| c.get_name() != "help")
        .map(|c| {
            let usage = c
                .get_arguments()
                .filter(|a| a.is_positional())
                .map(|a| format!("<{}>", a.get_id().as_str().to_uppercase()))
                .collect::<Vec<_>>()
                .join(" ");
            let about = c.get_about().map(|a| a.to_string()).unwrap_or_default();
            vec![format!("{} {}", c.get_name(), usage).trim_end().to_string(), about]
        })
        .collect();
    rows.extend(COMMON_COMMANDS.iter().map(|(name, about)| vec![name.to_string(), about.to_string()]));
    format!(
        "{} commands (add --help after a command for its options):\n{}",
        role,
        render_table(&["COMMAND", "DESCRIPTION"], &rows)
    )
}

pub fn whoami(user: &User) -> String {
    let mut text = format!("{} {} ({})", user.role(), user.name(), user.user_id());
    if let Some(doctor) = user.as_doctor() {
        text.push_str(&format!(", {}", doctor.specialisation));
    }
    text
}

pub fn handle_password_change(
    auth: &AuthService,
    wf: &mut ClinicWorkflow,
    old: &str,
    new: &str,
) -> ClinicResult<Reply> {
    auth.change_password(wf.users_mut(), old, new)?;
    Ok(Reply::changed("Password changed."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::workflow;

    #[test]
    fn help_lists_role_and_common_commands() {
        let text = help_text(Role::Doctor);
        assert!(text.contains("add-slot <DATE> <START> <END>"));
        assert!(text.contains("logout"));
        assert!(!text.contains("dispense"));
    }

    #[test]
    fn suggestions_cover_common_commands() {
        let names = command_names(Role::Pharmacist);
        assert!(names.iter().any(|n| n == "dispense"));
        assert!(names.iter().any(|n| n == "quit"));
    }

    #[test]
    fn password_change_marks_store_changed() {
        let mut wf = workflow();
        let mut auth = AuthService::new("password");
        auth.login(wf.users(), "D0001", "password").unwrap();
        let reply = handle_password_change(&auth, &mut wf, "password", "n3wpass").unwrap();
        assert!(reply.changed);
        assert_eq!(wf.users().find("D0001").unwrap().account().password, "n3wpass");
        assert_eq!(whoami(wf.users().find("D0001").unwrap()), "Doctor John Smith (D0001), General Practice");
    }
}
