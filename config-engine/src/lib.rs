//! Configuration for the Clarte billing dashboard.
//!
//! Values are layered with `figment`, later layers winning:
//!
//! 1. built-in defaults ([`ClarteConfig::default`])
//! 2. an optional YAML or TOML file
//! 3. environment variables prefixed `CLARTE_`, nested with `__`
//!    (e.g. `CLARTE_RECORD_SOURCE__API_KEY`)
//!
//! # Example
//!
//! ```yaml
//! record_source:
//!   kind: hosted
//!   url: "https://abc.supabase.co"
//!   timeout_seconds: 15
//! logging:
//!   log_level: "debug"
//!   json: true
//! flagging:
//!   flag_denied: true
//!   flag_high_value: true
//!   high_value_threshold: 1000
//! carrier_rules:
//!   - insurer: "Delta Dental"
//!     note: "Attach x-rays to every claim"
//! ```

pub mod providers;
pub mod validation;
pub mod error;

pub use providers::*;
pub use error::*;

use std::path::{Path, PathBuf};

use billing_dashboard::{AutoFlagRules, CarrierRule, DashboardOptions};
use logger_redacted::LoggerConfig;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ClarteConfig {
    pub record_source: RecordSourceConfig,
    pub logging: LoggerConfig,
    pub flagging: AutoFlagRules,
    pub carrier_rules: Vec<CarrierRule>,
    pub dashboard: DashboardSettings,
}

/// Where billing records come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSourceKind {
    /// Hosted store reached over HTTPS
    #[default]
    Hosted,
    /// Local JSON fixture file
    Fixture,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RecordSourceConfig {
    pub kind: RecordSourceKind,

    /// Base URL of the hosted store
    pub url: Option<String>,

    /// API key sent as `apikey` and bearer token
    #[serde(skip_serializing)]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    pub fixture_path: Option<PathBuf>,
}

impl Default for RecordSourceConfig {
    fn default() -> Self {
        Self {
            kind: RecordSourceKind::default(),
            url: None,
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
            fixture_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Claims submitted within this many days count as recent ("OI 0-30")
    pub recent_claim_window_days: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            recent_claim_window_days: billing_dashboard::RECENT_CLAIM_WINDOW_DAYS,
        }
    }
}

fn default_timeout_seconds() -> u64 {
    billing_dashboard::DEFAULT_TIMEOUT.as_secs()
}

impl ClarteConfig {
    /// Load and validate configuration
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let config: ClarteConfig = providers::figment(file)?.extract()?;
        config.validate()?;
        tracing::debug!(
            source = ?config.record_source.kind,
            log_level = %config.logging.log_level,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Load without validating, for callers that patch values before use
    pub fn load_unchecked(file: Option<&Path>) -> Result<Self> {
        Ok(providers::figment(file)?.extract()?)
    }

    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Dashboard settings, flag rules and carrier rules for the loader
    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            recent_claim_window_days: self.dashboard.recent_claim_window_days,
            flag_rules: self.flagging.clone(),
            carrier_rules: self.carrier_rules.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rust_decimal::Decimal;
    use secrecy::ExposeSecret;

    fn to_figment_err(err: ConfigError) -> figment::Error {
        figment::Error::from(err.to_string())
    }

    #[test]
    fn test_defaults_require_a_hosted_url() {
        Jail::expect_with(|_jail| {
            let err = ClarteConfig::load(None).unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("url")));

            let config = ClarteConfig::load_unchecked(None).map_err(to_figment_err)?;
            assert_eq!(config.record_source.kind, RecordSourceKind::Hosted);
            assert_eq!(config.record_source.timeout_seconds, 30);
            assert_eq!(config.dashboard.recent_claim_window_days, 30);
            assert!(config.flagging.flag_denied);
            assert!(!config.flagging.flag_high_value);
            assert_eq!(config.logging.log_level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_yaml_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "clarte.yaml",
                r#"
record_source:
  kind: hosted
  url: "https://office.example.co"
  timeout_seconds: 10
flagging:
  flag_high_value: true
  high_value_threshold: 500
carrier_rules:
  - insurer: "Delta Dental"
    note: "Attach x-rays"
"#,
            )?;
            jail.set_env("CLARTE_RECORD_SOURCE__API_KEY", "anon-key");
            jail.set_env("CLARTE_LOGGING__LOG_LEVEL", "debug");

            let config = ClarteConfig::load(Some(Path::new("clarte.yaml"))).map_err(to_figment_err)?;
            assert_eq!(config.record_source.url.as_deref(), Some("https://office.example.co"));
            assert_eq!(config.record_source.timeout_seconds, 10);
            assert_eq!(
                config.record_source.api_key.as_ref().map(|k| k.expose_secret().clone()),
                Some("anon-key".to_string())
            );
            assert_eq!(config.logging.log_level, "debug");
            assert!(config.flagging.flag_high_value);
            assert_eq!(config.flagging.high_value_threshold, Decimal::from(500));
            assert_eq!(config.carrier_rules.len(), 1);

            let options = config.dashboard_options();
            assert_eq!(options.recent_claim_window_days, 30);
            assert_eq!(options.flag_rules, config.flagging);
            assert_eq!(options.carrier_rules[0].insurer, "Delta Dental");
            Ok(())
        });
    }

    #[test]
    fn test_toml_fixture_source() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "clarte.toml",
                r#"
[record_source]
kind = "fixture"
fixture_path = "office.json"
"#,
            )?;

            let config = ClarteConfig::load(Some(Path::new("clarte.toml"))).map_err(to_figment_err)?;
            assert_eq!(config.record_source.kind, RecordSourceKind::Fixture);
            assert_eq!(config.record_source.fixture_path, Some(PathBuf::from("office.json")));
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_reported() {
        Jail::expect_with(|_jail| {
            let err = ClarteConfig::load(Some(Path::new("nope.yaml"))).unwrap_err();
            assert!(matches!(err, ConfigError::SourceNotFound(_)));
            Ok(())
        });
    }

    #[test]
    fn test_fixture_source_without_path_is_invalid() {
        Jail::expect_with(|jail| {
            jail.set_env("CLARTE_RECORD_SOURCE__KIND", "fixture");
            let err = ClarteConfig::load(None).unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("fixture_path")));
            Ok(())
        });
    }
}
