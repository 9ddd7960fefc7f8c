// models/src/medical/replenishment_request.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::errors::{EntityKind, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(RequestStatus::Pending),
            "APPROVED" => Ok(RequestStatus::Approved),
            _ => Err(ValidationError::unknown_variant("request status", s)),
        }
    }
}

/// A pharmacist's ask for more stock of one medication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplenishmentRequest {
    pub request_id: String,
    pub medication_id: String,
    pub quantity: u32,
    pub status: RequestStatus,
    pub requested_by: String,
    pub approved_by: Option<String>,
}

impl ReplenishmentRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

impl Entity for ReplenishmentRequest {
    const KIND: EntityKind = EntityKind::Request;

    fn id(&self) -> &str {
        &self.request_id
    }
}
