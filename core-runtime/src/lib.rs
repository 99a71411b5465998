//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the keepItFit client core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! Every other core crate depends on this one. It establishes the logging
//! conventions, the fail-fast configuration builder and the broadcast channel
//! the session and language managers publish state changes on.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
