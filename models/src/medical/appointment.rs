// models/src/medical/appointment.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::errors::{EntityKind, ValidationError};

/// REQUESTED -> CONFIRMED | CANCELLED, CONFIRMED -> COMPLETED | CANCELLED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Requested,
    Confirmed,
    Completed,
    #[serde(alias = "CANCELED")]
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Requested => "REQUESTED",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }

    /// Whether the patient may still cancel or reschedule.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, AppointmentStatus::Requested | AppointmentStatus::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "REQUESTED" => Ok(AppointmentStatus::Requested),
            "CONFIRMED" => Ok(AppointmentStatus::Confirmed),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" | "CANCELED" => Ok(AppointmentStatus::Cancelled),
            _ => Err(ValidationError::unknown_variant("appointment status", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub slot_id: String,
    pub status: AppointmentStatus,
    pub outcome_id: Option<String>,
}

impl Appointment {
    pub fn requested(
        appointment_id: String,
        patient_id: &str,
        doctor_id: &str,
        slot_id: &str,
    ) -> Self {
        Appointment {
            appointment_id,
            patient_id: patient_id.to_string(),
            doctor_id: doctor_id.to_string(),
            slot_id: slot_id.to_string(),
            status: AppointmentStatus::Requested,
            outcome_id: None,
        }
    }
}

impl Entity for Appointment {
    const KIND: EntityKind = EntityKind::Appointment;

    fn id(&self) -> &str {
        &self.appointment_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_cancel_spellings_parse() {
        assert_eq!("CANCELED".parse::<AppointmentStatus>(), Ok(AppointmentStatus::Cancelled));
        assert_eq!("cancelled".parse::<AppointmentStatus>(), Ok(AppointmentStatus::Cancelled));
        assert!("DONE".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn terminal_states_are_not_cancellable() {
        for status in [AppointmentStatus::Completed, AppointmentStatus::Cancelled] {
            assert!(status.is_terminal());
            assert!(!status.is_cancellable());
        }
        assert!(AppointmentStatus::Requested.is_cancellable());
        assert!(AppointmentStatus::Confirmed.is_cancellable());
    }
}
