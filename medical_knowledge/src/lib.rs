// medical_knowledge/src/lib.rs

pub mod clinical_workflow;

pub use clinical_workflow::*;
