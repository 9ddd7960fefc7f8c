// models/src/medical/patient.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::medical::user::Account;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub account: Account,
    pub date_of_birth: NaiveDate,
    pub blood_type: String, // A+, A-, B+, B-, AB+, AB-, O+, O-
}
