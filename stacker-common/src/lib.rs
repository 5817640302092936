//! # Stacker Common Library
//!
//! Shared code for the Stacker session crates:
//! - Error type
//! - Configuration file resolution and TOML loading
//! - Logging initialisation
//! - Human-readable time formatting

pub mod config;
pub mod error;
pub mod human_time;
pub mod logging;

pub use error::{Error, Result};
