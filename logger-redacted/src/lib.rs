//! Logging for the Clarte billing dashboard.
//!
//! Installs the process-wide `tracing` subscriber and provides a PII redactor
//! for any free text (upstream error bodies, search strings) that has to be
//! logged. Billing records carry patient names and contact details, so
//! nothing user-supplied goes to the log without passing through
//! [`PiiRedactor`] first.
//!
//! # Detected Data Types
//!
//! - **Email Addresses**: user@example.com → u***@e***
//! - **Phone Numbers**: (555) 123-4567 → (***) ***-****
//! - **SSN**: 123-45-6789 → ***-**-****
//! - **Patient names**: reduced to initials with [`mask_name`]
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_logging, LoggerConfig, PiiRedactor, RedactionConfig};
//!
//! init_logging(&LoggerConfig::default()).expect("logger");
//! let redactor = PiiRedactor::new(RedactionConfig::default());
//! logger_redacted::redacted_warn!(redactor, "upstream said: {}", "contact jane@example.com");
//! ```

pub mod redactor;
pub mod macros;
pub mod config;

pub use redactor::*;
pub use config::*;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Logger already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global subscriber. Events go to stderr so that command
/// output on stdout stays machine-readable.
///
/// `RUST_LOG` wins over `config.log_level` when set.
pub fn init_logging(config: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| LoggerError::InvalidFilter {
            directive: config.log_level.clone(),
            reason: e.to_string(),
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}
