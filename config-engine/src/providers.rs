// Configuration providers: defaults, then an optional file, then the environment
use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;

use crate::error::{ConfigError, Result};
use crate::ClarteConfig;

/// Prefix for environment overrides, nested keys are separated by `__`
pub const ENV_PREFIX: &str = "CLARTE_";

/// Build the layered figment for an optional config file
pub fn figment(file: Option<&Path>) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(ClarteConfig::default()));

    if let Some(path) = file {
        if !path.exists() {
            return Err(ConfigError::SourceNotFound(path.display().to_string()));
        }
        figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => figment.merge(Toml::file(path)),
            Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
            other => {
                return Err(ConfigError::ParseError(format!(
                    "unsupported config format: {}",
                    other.unwrap_or("<none>")
                )))
            }
        };
    }

    Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
}
