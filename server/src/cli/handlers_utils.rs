// server/src/cli/handlers_utils.rs
//! Text rendering shared by the role handlers, plus the terminal helpers
//! used by the interactive console.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::{self, Stylize};
use crossterm::terminal::{size as terminal_size, Clear, ClearType};

use medical_knowledge::{ClinicWorkflow, PatientRecord};
use models::timestamp::DATE_FORMAT;
use models::{Appointment, Medication, Outcome, Prescription, ReplenishmentRequest, Slot, User};

/// What a handler prints, and whether the store must be saved afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub changed: bool,
}

impl Reply {
    pub fn view(text: impl Into<String>) -> Self {
        Reply { text: text.into(), changed: false }
    }

    pub fn changed(text: impl Into<String>) -> Self {
        Reply { text: text.into(), changed: true }
    }
}

/// Left aligned columns sized to their widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut lines = vec![
        format_row(headers.to_vec()),
        format_row(dashes.iter().map(String::as_str).collect()),
    ];
    lines.extend(rows.iter().map(|row| format_row(row.iter().map(String::as_str).collect())));
    lines.join("\n")
}

fn or_empty(text: String, rows: usize, what: &str) -> String {
    if rows == 0 {
        format!("No {}.", what)
    } else {
        text
    }
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn user_name(wf: &ClinicWorkflow, user_id: &str) -> String {
    wf.users()
        .get(user_id)
        .map(|u| u.name().to_string())
        .unwrap_or_else(|| user_id.to_string())
}

fn medication_name(wf: &ClinicWorkflow, medication_id: &str) -> String {
    wf.store()
        .medications
        .get(medication_id)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| medication_id.to_string())
}

pub fn render_slots(wf: &ClinicWorkflow, slots: &[&Slot]) -> String {
    let rows: Vec<Vec<String>> = slots
        .iter()
        .map(|s| {
            vec![
                s.slot_id.clone(),
                format!("{} ({})", user_name(wf, &s.doctor_id), s.doctor_id),
                s.date.format(DATE_FORMAT).to_string(),
                s.time_range(),
                s.status.to_string(),
            ]
        })
        .collect();
    or_empty(render_table(&["SLOT", "DOCTOR", "DATE", "TIME", "STATUS"], &rows), rows.len(), "slots")
}

pub fn render_appointments(wf: &ClinicWorkflow, appointments: &[&Appointment]) -> String {
    let rows: Vec<Vec<String>> = appointments
        .iter()
        .map(|a| {
            let (date, time) = wf
                .slot_of(a)
                .map(|s| (s.date.format(DATE_FORMAT).to_string(), s.time_range()))
                .unwrap_or_else(|| ("-".to_string(), "-".to_string()));
            vec![
                a.appointment_id.clone(),
                format!("{} ({})", user_name(wf, &a.patient_id), a.patient_id),
                format!("{} ({})", user_name(wf, &a.doctor_id), a.doctor_id),
                date,
                time,
                a.status.to_string(),
                optional(&a.outcome_id),
            ]
        })
        .collect();
    or_empty(
        render_table(&["APPOINTMENT", "PATIENT", "DOCTOR", "DATE", "TIME", "STATUS", "OUTCOME"], &rows),
        rows.len(),
        "appointments",
    )
}

pub fn render_medications(medications: &[&Medication]) -> String {
    let rows: Vec<Vec<String>> = medications
        .iter()
        .map(|m| {
            vec![
                m.medication_id.clone(),
                m.name.clone(),
                m.stock_level.to_string(),
                m.low_stock_alert_level.to_string(),
                if m.is_low_stock() { "LOW".to_string() } else { String::new() },
            ]
        })
        .collect();
    or_empty(render_table(&["MEDICATION", "NAME", "STOCK", "ALERT AT", ""], &rows), rows.len(), "medications")
}

pub fn render_prescriptions(wf: &ClinicWorkflow, prescriptions: &[&Prescription]) -> String {
    let rows: Vec<Vec<String>> = prescriptions
        .iter()
        .map(|p| {
            vec![
                p.prescription_id.clone(),
                p.appointment_id.clone(),
                format!("{} ({})", medication_name(wf, &p.medication_id), p.medication_id),
                p.quantity.to_string(),
                p.status.to_string(),
                optional(&p.notes),
            ]
        })
        .collect();
    or_empty(
        render_table(&["PRESCRIPTION", "APPOINTMENT", "MEDICATION", "QTY", "STATUS", "NOTES"], &rows),
        rows.len(),
        "prescriptions",
    )
}

pub fn render_outcome(wf: &ClinicWorkflow, outcome: &Outcome) -> String {
    let mut text = format!(
        "Outcome {} for {} on {}\n  Service: {}\n  Notes:   {}",
        outcome.outcome_id,
        outcome.appointment_id,
        outcome.date.format(DATE_FORMAT),
        outcome.service_provided,
        if outcome.consultation_notes.is_empty() { "-" } else { &outcome.consultation_notes },
    );
    for prescription in wf.prescriptions_for(outcome) {
        text.push_str(&format!(
            "\n  {} {} x{} [{}]",
            prescription.prescription_id,
            medication_name(wf, &prescription.medication_id),
            prescription.quantity,
            prescription.status
        ));
    }
    text
}

pub fn render_record(wf: &ClinicWorkflow, record: &PatientRecord<'_>) -> String {
    let patient = record.patient;
    let mut text = format!(
        "Medical record of {} ({})\n  Date of birth: {}\n  Gender: {}\n  Blood type: {}\n  Email: {}\n  Phone: {}",
        patient.account.name,
        patient.account.user_id,
        patient.date_of_birth.format(DATE_FORMAT),
        patient.account.gender,
        patient.blood_type,
        optional(&patient.account.email),
        optional(&patient.account.phone),
    );
    if record.entries.is_empty() {
        text.push_str("\n\nNo completed visits.");
    }
    for entry in &record.entries {
        text.push_str(&format!(
            "\n\n{} with {}\n{}",
            entry.appointment.appointment_id,
            user_name(wf, &entry.appointment.doctor_id),
            render_outcome(wf, entry.outcome)
        ));
    }
    text
}

pub fn render_users(users: &[&User]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.user_id().to_string(),
                u.name().to_string(),
                u.role().to_string(),
                u.account().gender.clone(),
                u.staff_age().map(|a| a.to_string()).unwrap_or_default(),
                u.as_doctor().map(|d| d.specialisation.clone()).unwrap_or_default(),
                optional(&u.account().email),
                optional(&u.account().phone),
            ]
        })
        .collect();
    or_empty(
        render_table(&["ID", "NAME", "ROLE", "GENDER", "AGE", "SPECIALISATION", "EMAIL", "PHONE"], &rows),
        rows.len(),
        "users",
    )
}

pub fn render_requests(wf: &ClinicWorkflow, requests: &[&ReplenishmentRequest]) -> String {
    let rows: Vec<Vec<String>> = requests
        .iter()
        .map(|r| {
            vec![
                r.request_id.clone(),
                format!("{} ({})", medication_name(wf, &r.medication_id), r.medication_id),
                r.quantity.to_string(),
                r.status.to_string(),
                r.requested_by.clone(),
                optional(&r.approved_by),
            ]
        })
        .collect();
    or_empty(
        render_table(&["REQUEST", "MEDICATION", "QTY", "STATUS", "REQUESTED BY", "APPROVED BY"], &rows),
        rows.len(),
        "replenishment requests",
    )
}

pub fn print_welcome_screen() {
    let (cols, _rows) = terminal_size().unwrap_or((80, 24));
    let total_width = (cols as usize).min(80);
    let border_char = '#';
    let line_str = border_char.to_string().repeat(total_width);

    let print_centered_colored = |text: &str, text_color: style::Color, is_bold: bool| {
        let content_width = total_width.saturating_sub(2);
        let padding_len = content_width.saturating_sub(text.len());
        let left_padding = padding_len / 2;
        let right_padding = padding_len - left_padding;
        let styled_text = if is_bold { text.with(text_color).bold() } else { text.with(text_color) };
        println!(
            "{}{}{}{}{}",
            border_char.with(style::Color::Cyan),
            " ".repeat(left_padding),
            styled_text,
            " ".repeat(right_padding),
            border_char.with(style::Color::Cyan)
        );
    };

    println!("{}", line_str.clone().with(style::Color::Cyan));
    print_centered_colored("", style::Color::Blue, false);
    print_centered_colored("Hospital Management System", style::Color::DarkCyan, true);
    print_centered_colored(concat!("Version ", env!("CARGO_PKG_VERSION")), style::Color::White, true);
    print_centered_colored("", style::Color::Blue, false);
    print_centered_colored("Log in with your user id and password.", style::Color::Green, true);
    print_centered_colored("Type 'help' after logging in for your commands.", style::Color::Yellow, false);
    print_centered_colored("Type 'exit' or 'quit' to leave.", style::Color::Red, false);
    print_centered_colored("", style::Color::Blue, false);
    println!("{}", line_str.with(style::Color::Cyan));
}

pub fn clear_terminal_screen() -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
        .context("Failed to clear terminal screen or move cursor")?;
    io::stdout().flush()?;
    Ok(())
}
