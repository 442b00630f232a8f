//! Core types for bot-schema
//!
//! Configuration, error types and constants shared by the storage and cli crates.

pub mod config;
pub mod constants;
mod env_config;
mod error;

pub use config::{Config, DbConfig, LogConfig, LogFormat};
pub use constants::*;
pub use error::*;
