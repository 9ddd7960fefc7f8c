// lib/src/commands.rs
//! Command grammar: the one-shot `clinic` subcommands and the per-role
//! command lines accepted by the interactive console.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};

use models::timestamp::{parse_date, parse_time};
use models::{parse_prescription_order, PrescriptionOrder, Role};

pub use crate::config::StorageEngineType;

/// Custom parser for storage engine to accept `csv`, `in-memory`, `inmemory` and `in_memory`.
pub fn parse_storage_engine(engine: &str) -> Result<StorageEngineType, String> {
    engine.parse::<StorageEngineType>().map_err(|_| {
        format!(
            "Invalid storage engine: '{}'. Supported values: csv, in-memory",
            engine
        )
    })
}

pub fn parse_role(role: &str) -> Result<Role, String> {
    role.parse::<Role>().map_err(|_| {
        format!(
            "Invalid role: '{}'. Supported values: doctor, pharmacist, administrator",
            role
        )
    })
}

#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum Commands {
    /// Log in and run role commands (the default)
    Interactive,
    /// Write the sample clinic to the data directory
    Seed {
        /// Overwrite existing data
        #[arg(long)]
        force: bool,
    },
    /// Show or save the effective configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print inventory reports without logging in
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
}

#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum ConfigAction {
    Show,
    Save {
        /// Destination file, defaults to clinic.toml
        #[arg(long, short)]
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum ReportAction {
    LowStock,
    Inventory,
}

// Interactive command lines. Each role gets its own grammar; the console
// splits the line with shlex and hands the words to `try_parse_from`.

#[derive(Parser, Debug, PartialEq, Clone)]
#[command(no_binary_name = true, name = "patient", disable_help_flag = true)]
pub struct PatientLine {
    #[command(subcommand)]
    pub command: PatientCommand,
}

#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum PatientCommand {
    /// Show your profile
    Profile,
    /// Update your email and/or phone
    UpdateContact {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// List doctors
    Doctors,
    /// List bookable slots
    Slots {
        #[arg(long, short)]
        doctor: Option<String>,
    },
    /// Request an appointment in an available slot
    Request { doctor_id: String, slot_id: String },
    /// Move an appointment to another available slot
    Reschedule { appointment_id: String, slot_id: String },
    /// Cancel a requested or confirmed appointment
    Cancel { appointment_id: String },
    /// List your appointments
    Appointments,
    /// Show your medical record
    Record,
}

#[derive(Parser, Debug, PartialEq, Clone)]
#[command(no_binary_name = true, name = "doctor", disable_help_flag = true)]
pub struct DoctorLine {
    #[command(subcommand)]
    pub command: DoctorCommand,
}

#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum DoctorCommand {
    /// Show all your slots
    Schedule,
    /// Open a new slot (DATE as YYYY-MM-DD, times as HH:MM)
    AddSlot {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        #[arg(value_parser = parse_time)]
        start: NaiveTime,
        #[arg(value_parser = parse_time)]
        end: NaiveTime,
    },
    /// Remove one of your available slots
    RemoveSlot { slot_id: String },
    /// List appointment requests waiting for a decision
    Requests,
    Accept { appointment_id: String },
    Decline { appointment_id: String },
    /// List confirmed appointments
    Appointments,
    /// Record the outcome of a confirmed appointment
    Complete {
        appointment_id: String,
        #[arg(long, short)]
        service: String,
        /// Prescription as MEDICATION_ID:QUANTITY[:NOTES], repeatable
        #[arg(long = "rx", value_parser = parse_prescription_order)]
        prescriptions: Vec<PrescriptionOrder>,
        #[arg(long, short, default_value = "")]
        notes: String,
    },
    /// Add a prescription to a confirmed or completed appointment
    Prescribe {
        appointment_id: String,
        medication_id: String,
        quantity: u32,
        #[arg(long, short)]
        notes: Option<String>,
    },
    /// Show the record of a patient you have seen
    Record { patient_id: String },
}

#[derive(Parser, Debug, PartialEq, Clone)]
#[command(no_binary_name = true, name = "pharmacist", disable_help_flag = true)]
pub struct PharmacistLine {
    #[command(subcommand)]
    pub command: PharmacistCommand,
}

#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum PharmacistCommand {
    /// List outcomes that still have undispensed prescriptions
    Outcomes,
    /// List pending prescriptions
    Pending,
    Dispense { prescription_id: String },
    Inventory,
    LowStock,
    /// Ask an administrator to restock a medication
    Request { medication_id: String, quantity: u32 },
}

#[derive(Parser, Debug, PartialEq, Clone)]
#[command(no_binary_name = true, name = "administrator", disable_help_flag = true)]
pub struct AdminLine {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum AdminCommand {
    /// Manage doctors, pharmacists and administrators
    Staff {
        #[command(subcommand)]
        action: StaffAction,
    },
    /// Add or remove medications
    Medication {
        #[command(subcommand)]
        action: MedicationAction,
    },
    /// Set the stock level of a medication
    Stock {
        medication_id: String,
        #[arg(allow_negative_numbers = true)]
        level: i64,
    },
    /// Set the low stock alert level of a medication
    Alert {
        medication_id: String,
        #[arg(allow_negative_numbers = true)]
        level: i64,
    },
    Inventory,
    LowStock,
    /// List every appointment
    Appointments,
    /// List replenishment requests
    Requests {
        #[arg(long)]
        pending: bool,
    },
    Approve { request_id: String },
}

#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum StaffAction {
    List {
        #[arg(long, short, value_parser = parse_role)]
        role: Option<Role>,
    },
    Add(AddStaffArgs),
    Remove { user_id: String },
    Update {
        user_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
}

#[derive(Args, Debug, PartialEq, Clone)]
pub struct AddStaffArgs {
    #[arg(long, short, value_parser = parse_role)]
    pub role: Role,
    #[arg(long, short)]
    pub name: String,
    #[arg(long, short)]
    pub gender: String,
    #[arg(long, short)]
    pub age: u32,
    /// Required for doctors
    #[arg(long, short)]
    pub specialisation: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum MedicationAction {
    Add {
        #[arg(long, short)]
        name: String,
        #[arg(long, short, allow_negative_numbers = true)]
        stock: i64,
        #[arg(long, short, allow_negative_numbers = true)]
        alert: i64,
    },
    Remove { medication_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn grammars_are_well_formed() {
        PatientLine::command().debug_assert();
        DoctorLine::command().debug_assert();
        PharmacistLine::command().debug_assert();
        AdminLine::command().debug_assert();
    }

    #[test]
    fn complete_collects_repeated_prescriptions() {
        let line = DoctorLine::try_parse_from([
            "complete", "AP0001", "--service", "Consultation", "--rx", "M0001:2:after meals", "--rx", "M0002:1",
        ])
        .unwrap();
        match line.command {
            DoctorCommand::Complete { appointment_id, service, prescriptions, notes } => {
                assert_eq!(appointment_id, "AP0001");
                assert_eq!(service, "Consultation");
                assert_eq!(
                    prescriptions,
                    vec![
                        PrescriptionOrder::new("M0001", 2).with_notes("after meals"),
                        PrescriptionOrder::new("M0002", 1),
                    ]
                );
                assert_eq!(notes, "");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn add_slot_parses_date_and_times() {
        let line = DoctorLine::try_parse_from(["add-slot", "2024-06-03", "09:00", "09:30"]).unwrap();
        assert_eq!(
            line.command,
            DoctorCommand::AddSlot {
                date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            }
        );
        assert!(DoctorLine::try_parse_from(["add-slot", "03/06/2024", "09:00", "09:30"]).is_err());
    }

    #[test]
    fn negative_stock_reaches_the_handler() {
        let line = AdminLine::try_parse_from(["stock", "M0001", "-1"]).unwrap();
        assert_eq!(
            line.command,
            AdminCommand::Stock {
                medication_id: "M0001".to_string(),
                level: -1
            }
        );
    }

    #[test]
    fn staff_role_accepts_short_admin_name() {
        let line = AdminLine::try_parse_from([
            "staff", "add", "--role", "admin", "--name", "Tom Hill", "--gender", "Male", "--age", "33",
        ])
        .unwrap();
        match line.command {
            AdminCommand::Staff { action: StaffAction::Add(args) } => {
                assert_eq!(args.role, Role::Administrator);
                assert_eq!(args.specialisation, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn patient_words_map_to_commands() {
        let line = PatientLine::try_parse_from(["update-contact", "--email", "a@b.org"]).unwrap();
        assert_eq!(
            line.command,
            PatientCommand::UpdateContact {
                email: Some("a@b.org".to_string()),
                phone: None
            }
        );
        assert!(PatientLine::try_parse_from(["dispense", "RX0001"]).is_err());
    }
}
