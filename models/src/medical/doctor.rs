// models/src/medical/doctor.rs
use serde::{Deserialize, Serialize};

use crate::medical::user::Account;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub account: Account,
    pub age: u32,
    pub specialisation: String,
}
