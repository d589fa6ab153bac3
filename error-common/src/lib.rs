//! Common error handling utilities for the Clarte billing dashboard
//!
//! Provides the error types, stable error codes and error context shared by
//! every crate in the workspace.
//!
//! # Error Categories
//!
//! - **WithContext**: a domain error (fetch, decode, invalid record) carried
//!   across a crate boundary with its own code and context
//! - **Config**: configuration could not be loaded or is inconsistent
//! - **Logging**: the tracing subscriber could not be installed
//!
//! # Example
//!
//! ```rust
//! use error_common::{ClarteError, ErrorContext};
//!
//! fn fixture_path(office_id: &str) -> Result<String, ClarteError> {
//!     Err(ClarteError::Config("record_source.fixture_path is required".to_string())
//!         .with_context(ErrorContext::new().with_office_id(office_id)))
//! }
//!
//! let err = fixture_path("office-1").unwrap_err();
//! assert_eq!(err.code(), "CONFIG_5001");
//! ```

pub mod types;
pub mod context;
pub mod codes;

pub use types::*;
pub use context::*;
pub use codes::*;
