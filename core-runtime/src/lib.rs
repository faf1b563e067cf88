//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the frame sync service:
//! - Configuration loading and validation
//! - Logging and tracing setup
//! - Event bus
//!
//! Every other core crate depends on these conventions, but this crate knows
//! nothing about TVs beyond the vocabulary in `bridge-traits`.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
