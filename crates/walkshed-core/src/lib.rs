//! Walkshed Core - Domain models, error taxonomy, configuration, and ports
//!
//! This crate contains the domain types shared by every layer of the walkshed
//! system and the port traits the upstream providers are adapted behind.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{ErrorCode, Result, WalkshedError};
