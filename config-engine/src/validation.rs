// Configuration validation
use secrecy::ExposeSecret;

use crate::error::{ConfigError, Result};
use crate::{ClarteConfig, RecordSourceKind};

pub fn validate(config: &ClarteConfig) -> Result<()> {
    let source = &config.record_source;
    match source.kind {
        RecordSourceKind::Hosted => {
            let url = source.url.as_deref().unwrap_or_default().trim();
            if url.is_empty() {
                return Err(ConfigError::ValidationError(
                    "record_source.url is required for a hosted record source".to_string(),
                ));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError(format!(
                    "record_source.url must be an http(s) URL, got '{url}'"
                )));
            }
            let has_key = source
                .api_key
                .as_ref()
                .is_some_and(|key| !key.expose_secret().trim().is_empty());
            if !has_key {
                return Err(ConfigError::ValidationError(
                    "record_source.api_key is required for a hosted record source".to_string(),
                ));
            }
        }
        RecordSourceKind::Fixture => {
            if source.fixture_path.is_none() {
                return Err(ConfigError::ValidationError(
                    "record_source.fixture_path is required for a fixture record source".to_string(),
                ));
            }
        }
    }

    if source.timeout_seconds == 0 {
        return Err(ConfigError::ValidationError(
            "record_source.timeout_seconds must be greater than zero".to_string(),
        ));
    }

    if config.dashboard.recent_claim_window_days == 0 {
        return Err(ConfigError::ValidationError(
            "dashboard.recent_claim_window_days must be greater than zero".to_string(),
        ));
    }

    if config.flagging.high_value_threshold.is_sign_negative() {
        return Err(ConfigError::ValidationError(
            "flagging.high_value_threshold must not be negative".to_string(),
        ));
    }

    Ok(())
}
