// models/src/errors.rs

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
pub use thiserror::Error;

/// The entity collections a lookup can fail against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Slot,
    Appointment,
    Outcome,
    Prescription,
    Medication,
    Request,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::Slot => "slot",
            EntityKind::Appointment => "appointment",
            EntityKind::Outcome => "outcome",
            EntityKind::Prescription => "prescription",
            EntityKind::Medication => "medication",
            EntityKind::Request => "replenishment request",
        };
        f.write_str(name)
    }
}

/// Coarse classification of a `ClinicError`, used by callers that only care
/// whether something was missing, in the wrong state, or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    InvalidArgument,
    Unauthorized,
    Storage,
}

#[derive(Debug, Serialize, Deserialize, Error, Clone, PartialEq)]
pub enum ClinicError {
    #[error("{entity} with identifier {id} was not found")]
    NotFound { entity: EntityKind, id: String },
    #[error("{entity} with identifier {id} already exists")]
    AlreadyExists { entity: EntityKind, id: String },
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("prescription {0} has already been dispensed")]
    AlreadyDispensed(String),
    #[error("replenishment request {0} has already been approved")]
    AlreadyApproved(String),
    #[error("insufficient stock for {medication_id}: requested {requested}, available {available}")]
    InsufficientStock {
        medication_id: String,
        requested: u32,
        available: u32,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Validation error: {0}")]
    Validation(ValidationError),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClinicError {
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        ClinicError::NotFound { entity, id: id.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClinicError::NotFound { .. } => ErrorKind::NotFound,
            ClinicError::InvalidState(_)
            | ClinicError::AlreadyDispensed(_)
            | ClinicError::AlreadyApproved(_)
            | ClinicError::InsufficientStock { .. } => ErrorKind::InvalidState,
            ClinicError::AlreadyExists { .. }
            | ClinicError::InvalidArgument(_)
            | ClinicError::Validation(_) => ErrorKind::InvalidArgument,
            ClinicError::Unauthorized(_) => ErrorKind::Unauthorized,
            ClinicError::Storage(_) | ClinicError::Io(_) | ClinicError::Configuration(_) => {
                ErrorKind::Storage
            }
        }
    }
}

impl From<io::Error> for ClinicError {
    fn from(err: io::Error) -> Self {
        ClinicError::Io(err.to_string())
    }
}

impl From<csv::Error> for ClinicError {
    fn from(err: csv::Error) -> Self {
        ClinicError::Storage(format!("CSV error: {}", err))
    }
}

impl From<ValidationError> for ClinicError {
    fn from(err: ValidationError) -> Self {
        ClinicError::Validation(err)
    }
}

/// Failures while turning user or file input into domain values.
#[derive(Debug, Serialize, Deserialize, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("identifier '{0}' is invalid")]
    InvalidIdentifier(String),
    #[error("identifier has invalid length")]
    InvalidIdentifierLength,
    #[error("field '{0}' must not be empty")]
    EmptyField(String),
    #[error("invalid date format: {0} (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),
    #[error("invalid time format: {0} (expected HH:MM)")]
    InvalidTimeFormat(String),
    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: String, value: String },
    #[error("invalid prescription order '{0}' (expected MEDICATION_ID:QUANTITY[:NOTES])")]
    InvalidPrescriptionOrder(String),
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("no identifiers left for prefix '{0}'")]
    SequenceExhausted(String),
}

impl ValidationError {
    pub fn unknown_variant(kind: &str, value: &str) -> Self {
        ValidationError::UnknownVariant {
            kind: kind.to_string(),
            value: value.to_string(),
        }
    }
}

/// A type alias for a `Result` that returns a `ClinicError` on failure.
pub type ClinicResult<T> = Result<T, ClinicError>;

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispensing_errors_are_state_errors() {
        assert_eq!(ClinicError::AlreadyDispensed("RX0001".into()).kind(), ErrorKind::InvalidState);
        assert_eq!(
            ClinicError::InsufficientStock {
                medication_id: "M0001".into(),
                requested: 5,
                available: 2
            }
            .kind(),
            ErrorKind::InvalidState
        );
    }

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = ClinicError::not_found(EntityKind::Medication, "M0042");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "medication with identifier M0042 was not found");
    }

    #[test]
    fn validation_errors_count_as_invalid_arguments() {
        let err: ClinicError = ValidationError::EmptyField("name".into()).into();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
