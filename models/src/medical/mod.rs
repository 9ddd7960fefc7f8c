// models/src/medical/mod.rs

pub mod appointment;
pub mod doctor;
pub mod medication;
pub mod outcome;
pub mod patient;
pub mod prescription;
pub mod replenishment_request;
pub mod slot;
pub mod user;

pub use appointment::{Appointment, AppointmentStatus};
pub use doctor::Doctor;
pub use medication::Medication;
pub use outcome::Outcome;
pub use patient::Patient;
pub use prescription::{parse_prescription_order, Prescription, PrescriptionOrder, PrescriptionStatus};
pub use replenishment_request::{ReplenishmentRequest, RequestStatus};
pub use slot::{Slot, SlotReleasePolicy, SlotStatus};
pub use user::{non_empty, Account, Administrator, Pharmacist, Role, User};
