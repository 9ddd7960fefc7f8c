// server/src/cli/handlers_pharmacist.rs

use clinic_lib::commands::PharmacistCommand;
use medical_knowledge::ClinicWorkflow;
use models::ClinicResult;

use crate::cli::handlers_utils::{render_medications, render_outcome, render_prescriptions, Reply};

pub fn handle_pharmacist_command(
    wf: &mut ClinicWorkflow,
    pharmacist_id: &str,
    action: PharmacistCommand,
) -> ClinicResult<Reply> {
    match action {
        PharmacistCommand::Outcomes => {
            let outcomes = wf.outcomes_with_pending();
            if outcomes.is_empty() {
                return Ok(Reply::view("No outcomes with pending prescriptions."));
            }
            let text = outcomes
                .iter()
                .map(|o| render_outcome(wf, o))
                .collect::<Vec<_>>()
                .join("\n\n");
            Ok(Reply::view(text))
        }
        PharmacistCommand::Pending => {
            let pending = wf.pending_prescriptions();
            Ok(Reply::view(render_prescriptions(wf, &pending)))
        }
        PharmacistCommand::Dispense { prescription_id } => {
            let prescription = wf.dispense(&prescription_id)?;
            let medication = wf.store().medications.find(&prescription.medication_id)?;
            let mut text = format!(
                "Dispensed {} x{} for {}. {} left in stock.",
                medication.name, prescription.quantity, prescription_id, medication.stock_level
            );
            if medication.is_low_stock() {
                text.push_str(&format!(
                    "\nWarning: {} is below its alert level of {}.",
                    medication.name, medication.low_stock_alert_level
                ));
            }
            Ok(Reply::changed(text))
        }
        PharmacistCommand::Inventory => {
            let medications: Vec<_> = wf.medications().iter().collect();
            Ok(Reply::view(render_medications(&medications)))
        }
        PharmacistCommand::LowStock => Ok(Reply::view(render_medications(&wf.low_stock_medications()))),
        PharmacistCommand::Request { medication_id, quantity } => {
            let request = wf.submit_replenishment_request(&medication_id, quantity, pharmacist_id)?;
            Ok(Reply::changed(format!(
                "Submitted replenishment request {} for {} x{}.",
                request.request_id, medication_id, quantity
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::{completed_visit, workflow};
    use models::ErrorKind;

    #[test]
    fn dispensing_below_alert_warns() {
        let mut wf = workflow();
        completed_visit(&mut wf, "P1001", "SL0001", &[("M0002", 45)]);
        let outcomes = handle_pharmacist_command(&mut wf, "PH0001", PharmacistCommand::Outcomes).unwrap();
        assert!(outcomes.text.contains("RX0001"));

        let reply = handle_pharmacist_command(
            &mut wf,
            "PH0001",
            PharmacistCommand::Dispense { prescription_id: "RX0001".into() },
        )
        .unwrap();
        assert!(reply.changed);
        assert!(reply.text.contains("5 left in stock"));
        assert!(reply.text.contains("Warning"));

        let again = handle_pharmacist_command(
            &mut wf,
            "PH0001",
            PharmacistCommand::Dispense { prescription_id: "RX0001".into() },
        )
        .unwrap_err();
        assert_eq!(again.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn requests_are_recorded_under_the_pharmacist() {
        let mut wf = workflow();
        handle_pharmacist_command(
            &mut wf,
            "PH0001",
            PharmacistCommand::Request { medication_id: "M0004".into(), quantity: 20 },
        )
        .unwrap();
        assert_eq!(wf.store().requests.find("RQ0001").unwrap().requested_by, "PH0001");
    }
}
