use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::errors::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub medication_id: String,
    pub name: String,
    pub stock_level: u32,
    pub low_stock_alert_level: u32,
}

impl Medication {
    pub fn is_low_stock(&self) -> bool {
        self.stock_level < self.low_stock_alert_level
    }
}

impl Entity for Medication {
    const KIND: EntityKind = EntityKind::Medication;

    fn id(&self) -> &str {
        &self.medication_id
    }
}
