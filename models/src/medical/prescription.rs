use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::errors::{EntityKind, ValidationError, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrescriptionStatus {
    Pending,
    Dispensed,
}

impl PrescriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrescriptionStatus::Pending => "PENDING",
            PrescriptionStatus::Dispensed => "DISPENSED",
        }
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrescriptionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(PrescriptionStatus::Pending),
            "DISPENSED" => Ok(PrescriptionStatus::Dispensed),
            _ => Err(ValidationError::unknown_variant("prescription status", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub prescription_id: String,
    pub appointment_id: String,
    pub medication_id: String,
    pub quantity: u32,
    pub status: PrescriptionStatus,
    pub notes: Option<String>,
}

impl Prescription {
    pub fn is_pending(&self) -> bool {
        self.status == PrescriptionStatus::Pending
    }
}

impl Entity for Prescription {
    const KIND: EntityKind = EntityKind::Prescription;

    fn id(&self) -> &str {
        &self.prescription_id
    }
}

/// A doctor's request to prescribe, before it becomes a `Prescription`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionOrder {
    pub medication_id: String,
    pub quantity: u32,
    pub notes: Option<String>,
}

impl PrescriptionOrder {
    pub fn new(medication_id: &str, quantity: u32) -> Self {
        PrescriptionOrder {
            medication_id: medication_id.to_string(),
            quantity,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

impl FromStr for PrescriptionOrder {
    type Err = ValidationError;

    /// `MEDICATION_ID:QUANTITY[:NOTES]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prescription_order(s)
    }
}

pub fn parse_prescription_order(value: &str) -> ValidationResult<PrescriptionOrder> {
    let invalid = || ValidationError::InvalidPrescriptionOrder(value.to_string());
    let mut parts = value.splitn(3, ':');
    let medication_id = parts.next().map(str::trim).filter(|s| !s.is_empty()).ok_or_else(invalid)?;
    let quantity = parts
        .next()
        .and_then(|q| q.trim().parse::<u32>().ok())
        .ok_or_else(invalid)?;
    let notes = parts.next().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    Ok(PrescriptionOrder {
        medication_id: medication_id.to_string(),
        quantity,
        notes,
    })
}
