use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::errors::EntityKind;

/// The clinical record written when an appointment completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub outcome_id: String,
    pub appointment_id: String,
    /// Date of the slot the appointment took place in.
    pub date: NaiveDate,
    pub service_provided: String,
    pub prescription_ids: Vec<String>,
    pub consultation_notes: String,
}

impl Entity for Outcome {
    const KIND: EntityKind = EntityKind::Outcome;

    fn id(&self) -> &str {
        &self.outcome_id
    }
}
