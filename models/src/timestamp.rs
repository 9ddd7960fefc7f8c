// models/src/timestamp.rs
//! Date and time parsing for slot scheduling input.

use chrono::{NaiveDate, NaiveTime};

use crate::errors::{ValidationError, ValidationResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub fn parse_date(value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDateFormat(value.to_string()))
}

/// Accepts `HH:MM` as well as `HH:MM:SS`.
pub fn parse_time(value: &str) -> ValidationResult<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTimeFormat(value.to_string()))
}

pub fn format_time(time: &NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}
