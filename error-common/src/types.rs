use thiserror::Error;

use crate::codes;
use crate::context::ErrorContext;

/// Top-level error for binaries and cross-crate boundaries
#[derive(Error, Debug)]
pub enum ClarteError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logging subsystem could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),

    /// Error carrying structured context
    #[error("{message}")]
    WithContext {
        message: String,
        code: &'static str,
        context: ErrorContext,
    },

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClarteError {
    /// Stable error code for reporting
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => codes::configuration::INVALID_CONFIG,
            Self::Logging(_) => codes::configuration::INVALID_CONFIG,
            Self::WithContext { code, .. } => code,
            Self::Other(_) => "INTERNAL_9001",
        }
    }

    /// Attach context to an error, keeping its code
    pub fn with_context(self, context: ErrorContext) -> Self {
        let code = self.code();
        Self::WithContext {
            message: self.to_string(),
            code,
            context,
        }
    }
}

/// Result type alias for Clarte operations
pub type Result<T> = std::result::Result<T, ClarteError>;

/// Log an error with its code
pub fn log_error(context: &str, error: &ClarteError) {
    tracing::error!(
        context = context,
        error_code = error.code(),
        error = %error,
        "Clarte error occurred"
    );
}
