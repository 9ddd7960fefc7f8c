// medical_knowledge/src/clinical_workflow/inventory.rs
//! Medication stock and replenishment requests.

use log::{info, warn};

use models::identifiers::{MEDICATION_PREFIX, REQUEST_PREFIX};
use models::{
    non_empty, ClinicError, ClinicResult, Medication, ReplenishmentRequest, RequestStatus,
};

use crate::clinical_workflow::ClinicWorkflow;

fn non_negative(what: &str, value: i64) -> ClinicResult<u32> {
    if value < 0 {
        return Err(ClinicError::InvalidArgument(format!("{} must not be negative, got {}", what, value)));
    }
    u32::try_from(value).map_err(|_| ClinicError::InvalidArgument(format!("{} {} is too large", what, value)))
}

impl ClinicWorkflow {
    pub fn medications(&self) -> &[Medication] {
        self.store.medications.list()
    }

    /// Sets the stock level outright.
    pub fn adjust_stock(&mut self, medication_id: &str, new_level: i64) -> ClinicResult<Medication> {
        let index = self.store.medications.position(medication_id)?;
        let level = non_negative("stock level", new_level)?;
        let medication = self.store.medications.at_mut(index);
        medication.stock_level = level;
        info!("Stock of {} set to {}", medication_id, level);
        Ok(medication.clone())
    }

    pub fn set_low_stock_alert(&mut self, medication_id: &str, level: i64) -> ClinicResult<Medication> {
        let index = self.store.medications.position(medication_id)?;
        let level = non_negative("low stock alert level", level)?;
        let medication = self.store.medications.at_mut(index);
        medication.low_stock_alert_level = level;
        info!("Low stock alert of {} set to {}", medication_id, level);
        Ok(medication.clone())
    }

    /// Medications whose stock is strictly below their alert level.
    pub fn low_stock_medications(&self) -> Vec<&Medication> {
        self.store.medications.filter(Medication::is_low_stock)
    }

    pub fn add_medication(&mut self, name: &str, stock_level: i64, low_stock_alert_level: i64) -> ClinicResult<Medication> {
        let name = non_empty("medication name", name)?;
        if self
            .store
            .medications
            .iter()
            .any(|m| m.name.eq_ignore_ascii_case(&name))
        {
            return Err(ClinicError::InvalidArgument(format!("a medication named {} already exists", name)));
        }
        let medication = Medication {
            medication_id: self.store.medications.next_id(MEDICATION_PREFIX)?,
            name,
            stock_level: non_negative("stock level", stock_level)?,
            low_stock_alert_level: non_negative("low stock alert level", low_stock_alert_level)?,
        };
        self.store.medications.add(medication.clone())?;
        info!("Added medication {} ({})", medication.medication_id, medication.name);
        Ok(medication)
    }

    /// Deletes a medication nothing still waits on: no pending prescription
    /// and no pending replenishment request.
    pub fn remove_medication(&mut self, medication_id: &str) -> ClinicResult<Medication> {
        self.store.medications.find(medication_id)?;
        if let Some(rx) = self
            .store
            .prescriptions
            .iter()
            .find(|p| p.medication_id == medication_id && p.is_pending())
        {
            return Err(ClinicError::InvalidState(format!(
                "{} is still prescribed by pending prescription {}",
                medication_id, rx.prescription_id
            )));
        }
        if let Some(request) = self
            .store
            .requests
            .iter()
            .find(|r| r.medication_id == medication_id && r.is_pending())
        {
            return Err(ClinicError::InvalidState(format!(
                "{} has pending replenishment request {}",
                medication_id, request.request_id
            )));
        }
        let removed = self.store.medications.remove(medication_id)?;
        info!("Removed medication {} ({})", removed.medication_id, removed.name);
        Ok(removed)
    }

    pub fn submit_replenishment_request(
        &mut self,
        medication_id: &str,
        quantity: u32,
        requested_by: &str,
    ) -> ClinicResult<ReplenishmentRequest> {
        self.store.medications.find(medication_id)?;
        self.store.users.find(requested_by)?;
        if quantity == 0 {
            return Err(ClinicError::InvalidArgument("replenishment quantity must be positive".to_string()));
        }
        let request = ReplenishmentRequest {
            request_id: self.store.requests.next_id(REQUEST_PREFIX)?,
            medication_id: medication_id.to_string(),
            quantity,
            status: RequestStatus::Pending,
            requested_by: requested_by.to_string(),
            approved_by: None,
        };
        self.store.requests.add(request.clone())?;
        info!("{} requested {} more of {} ({})", requested_by, quantity, medication_id, request.request_id);
        Ok(request)
    }

    /// Approves a pending request and adds its quantity to stock. A request
    /// is approved at most once.
    pub fn approve_request(&mut self, request_id: &str, approved_by: &str) -> ClinicResult<ReplenishmentRequest> {
        let request_index = self.store.requests.position(request_id)?;
        let request = self.store.requests.at(request_index);
        if !request.is_pending() {
            warn!("Replenishment request {} was already approved", request_id);
            return Err(ClinicError::AlreadyApproved(request_id.to_string()));
        }
        let medication_index = self.store.medications.position(&request.medication_id)?;
        let medication = self.store.medications.at(medication_index);
        let new_level = medication.stock_level.checked_add(request.quantity).ok_or_else(|| {
            ClinicError::InvalidArgument(format!("stock of {} would overflow", medication.medication_id))
        })?;

        self.store.medications.at_mut(medication_index).stock_level = new_level;
        let request = self.store.requests.at_mut(request_index);
        request.status = RequestStatus::Approved;
        request.approved_by = Some(approved_by.to_string());
        info!(
            "{} approved {}: {} restocked to {}",
            approved_by, request_id, request.medication_id, new_level
        );
        Ok(request.clone())
    }

    pub fn replenishment_requests(&self, pending_only: bool) -> Vec<&ReplenishmentRequest> {
        self.store.requests.filter(|r| !pending_only || r.is_pending())
    }
}
