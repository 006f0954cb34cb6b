//! Optional `ventcalc.toml` defaults file.
//!
//! ```toml
//! format = "json"
//! lfl_percent = 5.0
//! safety_factor = 0.25
//!
//! [settings]
//! default_vent_type = "SharpEdged"
//! default_obstruction = "StandardLouver"
//! default_gas_type = "LighterThanAir"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vent_core::GlobalSettings;

use crate::OutputFormat;

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "ventcalc.toml";

/// CLI defaults. Every field is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format when `--format` is not given
    pub format: Option<OutputFormat>,
    /// Default LFL (% v/v) for the Fugitive Emission Method
    pub lfl_percent: Option<f64>,
    /// Default safety factor C for the Fugitive Emission Method
    pub safety_factor: Option<f64>,
    /// Project defaults applied to new inputs and stored in saved projects
    pub settings: GlobalSettings,
}

/// Load `path`, or `ventcalc.toml` from the working directory if present,
/// or fall back to defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    let (path, required) = match path {
        Some(p) => (p, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };

    if !required && !path.exists() {
        debug!("no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("failed to parse config {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vent_core::site_factors::Obstruction;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            format = "json"
            lfl_percent = 2.1
            safety_factor = 0.25

            [settings]
            default_obstruction = { Custom = 0.6 }
            default_gas_type = "HeavierThanAir"
            "#,
        )
        .unwrap();

        assert_eq!(config.format, Some(OutputFormat::Json));
        assert_eq!(config.lfl_percent, Some(2.1));
        assert_eq!(config.settings.default_obstruction, Obstruction::Custom(0.6));
        assert_eq!(config.settings.code, GlobalSettings::default().code);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_or_default(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
