// lib/src/lib.rs
//! Shared plumbing for the clinic: the entity store and its persistence,
//! login state, configuration and the command grammar.

pub mod auth;
pub mod commands;
pub mod config;
pub mod storage_engine;

pub use auth::AuthService;
pub use config::{ClinicConfig, StorageEngineType};
pub use storage_engine::{create_storage, ClinicStore, Collection, StorageEngine};
