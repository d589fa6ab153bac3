// Logger configuration
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Run free text through the PII redactor before logging it
    pub redaction_enabled: bool,
    /// Emit JSON lines instead of the human-readable format
    pub json: bool,
    /// Default filter directive, overridden by `RUST_LOG`
    pub log_level: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            redaction_enabled: true,
            json: false,
            log_level: "info".to_string(),
        }
    }
}
