// models/src/medical/slot.rs
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::errors::{EntityKind, ValidationError};
use crate::timestamp::format_time;

/// Lifecycle of a doctor's slot.
///
/// The declaration order is the display priority used when a schedule is
/// listed: booked slots first, removed slots last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Booked,
    Pending,
    Available,
    Completed,
    Removed,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Booked => "BOOKED",
            SlotStatus::Pending => "PENDING",
            SlotStatus::Available => "AVAILABLE",
            SlotStatus::Completed => "COMPLETED",
            SlotStatus::Removed => "REMOVED",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BOOKED" => Ok(SlotStatus::Booked),
            "PENDING" => Ok(SlotStatus::Pending),
            "AVAILABLE" => Ok(SlotStatus::Available),
            "COMPLETED" => Ok(SlotStatus::Completed),
            "REMOVED" => Ok(SlotStatus::Removed),
            _ => Err(ValidationError::unknown_variant("slot status", s)),
        }
    }
}

/// What happens to a slot when its appointment is cancelled by the patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotReleasePolicy {
    /// The slot is retired (`REMOVED`) and cannot be booked again.
    #[default]
    Remove,
    /// The slot goes back to `AVAILABLE`.
    Release,
}

impl SlotReleasePolicy {
    pub fn released_status(&self) -> SlotStatus {
        match self {
            SlotReleasePolicy::Remove => SlotStatus::Removed,
            SlotReleasePolicy::Release => SlotStatus::Available,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub slot_id: String,
    pub doctor_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: SlotStatus,
}

impl Slot {
    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }

    /// True when both slots are on the same day and their intervals intersect.
    /// Touching intervals (`09:00-09:30` and `09:30-10:00`) do not overlap.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.date == other.date && self.start_time < other.end_time && other.start_time < self.end_time
    }

    /// Ordering used for schedule listings: status priority, then date, then start time.
    pub fn schedule_order(&self, other: &Slot) -> Ordering {
        self.status
            .cmp(&other.status)
            .then_with(|| self.date.cmp(&other.date))
            .then_with(|| self.start_time.cmp(&other.start_time))
    }

    pub fn time_range(&self) -> String {
        format!("{}-{}", format_time(&self.start_time), format_time(&self.end_time))
    }
}

impl Entity for Slot {
    const KIND: EntityKind = EntityKind::Slot;

    fn id(&self) -> &str {
        &self.slot_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::{parse_date, parse_time};

    fn slot(id: &str, date: &str, start: &str, end: &str, status: SlotStatus) -> Slot {
        Slot {
            slot_id: id.to_string(),
            doctor_id: "D0001".to_string(),
            date: parse_date(date).unwrap(),
            start_time: parse_time(start).unwrap(),
            end_time: parse_time(end).unwrap(),
            status,
        }
    }

    #[test]
    fn status_priority_orders_booked_first_removed_last() {
        let mut statuses = vec![
            SlotStatus::Removed,
            SlotStatus::Available,
            SlotStatus::Completed,
            SlotStatus::Booked,
            SlotStatus::Pending,
        ];
        statuses.sort();
        assert_eq!(
            statuses,
            vec![
                SlotStatus::Booked,
                SlotStatus::Pending,
                SlotStatus::Available,
                SlotStatus::Completed,
                SlotStatus::Removed,
            ]
        );
    }

    #[test]
    fn schedule_order_breaks_ties_on_date_then_time() {
        let mut slots = vec![
            slot("SL0003", "2024-05-02", "09:00", "09:30", SlotStatus::Available),
            slot("SL0002", "2024-05-01", "10:00", "10:30", SlotStatus::Available),
            slot("SL0001", "2024-05-01", "09:00", "09:30", SlotStatus::Available),
            slot("SL0004", "2024-06-01", "09:00", "09:30", SlotStatus::Booked),
        ];
        slots.sort_by(|a, b| a.schedule_order(b));
        let ids: Vec<&str> = slots.iter().map(|s| s.slot_id.as_str()).collect();
        assert_eq!(ids, vec!["SL0004", "SL0001", "SL0002", "SL0003"]);
    }

    #[test]
    fn adjacent_slots_do_not_overlap() {
        let a = slot("SL0001", "2024-05-01", "09:00", "09:30", SlotStatus::Available);
        let b = slot("SL0002", "2024-05-01", "09:30", "10:00", SlotStatus::Available);
        let c = slot("SL0003", "2024-05-01", "09:15", "09:45", SlotStatus::Available);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn release_policy_maps_to_slot_status() {
        assert_eq!(SlotReleasePolicy::default().released_status(), SlotStatus::Removed);
        assert_eq!(SlotReleasePolicy::Release.released_status(), SlotStatus::Available);
    }
}
