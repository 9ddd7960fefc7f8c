// models/src/identifiers.rs
//! String identifiers shared by every entity.
//!
//! Generated identifiers are a fixed prefix followed by a zero padded
//! sequence number (`AP0007`). The next number for a prefix is always one
//! past the highest number already in use, so identifiers stay unique after
//! the collections are reloaded from disk.

use crate::errors::{ValidationError, ValidationResult};

pub const MAX_IDENTIFIER_LENGTH: usize = 32;
const SEQUENCE_WIDTH: usize = 4;

pub const SLOT_PREFIX: &str = "SL";
pub const APPOINTMENT_PREFIX: &str = "AP";
pub const OUTCOME_PREFIX: &str = "OC";
pub const PRESCRIPTION_PREFIX: &str = "RX";
pub const MEDICATION_PREFIX: &str = "M";
pub const REQUEST_PREFIX: &str = "RQ";

/// Checks that `value` can be used as an entity identifier.
pub fn validate_identifier(value: &str) -> ValidationResult<()> {
    if value.is_empty() || value.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::InvalidIdentifierLength);
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ValidationError::InvalidIdentifier(value.to_string()));
    }
    Ok(())
}

pub fn format_id(prefix: &str, sequence: u32) -> String {
    format!("{}{:0width$}", prefix, sequence, width = SEQUENCE_WIDTH)
}

/// Returns the sequence number of `id` if it was generated with `prefix`.
///
/// `parse_sequence("AP", "AP0012") == Some(12)`, while an id belonging to a
/// longer prefix (`"A"` against `"AP0012"`) yields `None`.
pub fn parse_sequence(prefix: &str, id: &str) -> Option<u32> {
    let digits = id.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// One past the highest sequence used by `ids` under `prefix`.
pub fn next_sequence<'a, I>(prefix: &str, ids: I) -> ValidationResult<u32>
where
    I: IntoIterator<Item = &'a str>,
{
    match ids.into_iter().filter_map(|id| parse_sequence(prefix, id)).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| ValidationError::SequenceExhausted(prefix.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_not_accept_empty_identifier() {
        assert_eq!(validate_identifier(""), Err(ValidationError::InvalidIdentifierLength));
    }

    #[test]
    fn should_not_accept_too_long_identifier() {
        let long = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert_eq!(validate_identifier(&long), Err(ValidationError::InvalidIdentifierLength));
    }

    #[test]
    fn should_reject_punctuation() {
        assert_eq!(
            validate_identifier("AP 01"),
            Err(ValidationError::InvalidIdentifier("AP 01".to_string()))
        );
    }

    #[test]
    fn should_format_and_parse_sequence() {
        let id = format_id(APPOINTMENT_PREFIX, 7);
        assert_eq!(id, "AP0007");
        assert_eq!(parse_sequence(APPOINTMENT_PREFIX, &id), Some(7));
    }

    #[test]
    fn shorter_prefix_does_not_claim_longer_ids() {
        assert_eq!(parse_sequence("A", "AP0012"), None);
        assert_eq!(parse_sequence("P", "PH0003"), None);
        assert_eq!(parse_sequence("P", "P1001"), Some(1001));
    }

    #[test]
    fn next_sequence_skips_past_highest() {
        let ids = ["RX0001", "RX0009", "RQ0050", "RX0003"];
        assert_eq!(next_sequence(PRESCRIPTION_PREFIX, ids), Ok(10));
        assert_eq!(next_sequence(OUTCOME_PREFIX, ids), Ok(1));
    }

    #[test]
    fn exhausted_sequence_is_an_error() {
        let ids = ["RX0007", "RX4294967295"];
        assert_eq!(
            next_sequence(PRESCRIPTION_PREFIX, ids),
            Err(ValidationError::SequenceExhausted(PRESCRIPTION_PREFIX.to_string()))
        );
    }
}
