//! Core application module
//!
//! This module provides the process-wide application layer including:
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system

pub mod config;
pub mod error;
pub mod logging;

pub use config::{AuthMode, Config};
pub use error::{AuthError, ErrorResponse, KeygateError, Result};
pub use logging::Logger;
