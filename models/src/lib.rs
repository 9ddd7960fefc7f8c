// models/src/lib.rs

pub mod entity;
pub mod errors;
pub mod identifiers;
pub mod medical;
pub mod timestamp;

pub use entity::Entity;
pub use errors::*;
pub use medical::*;
