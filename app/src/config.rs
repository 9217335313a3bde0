//! FILENAME: app/src/config.rs
//! Application configuration, read from an optional JSON file.
//!
//! Every field has a default, so an empty object (or no file at all) is a
//! valid configuration. Command-line flags override what the file says.

use std::path::{Path, PathBuf};

use abtest_engine::{DisplayOptions, MetricsPolicy};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::logging::parse_level;

pub const DEFAULT_DATA_SOURCE: &str = "data.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Dataset location: a file path or an http(s) URL.
    pub data_source: String,
    /// Log file path. Console-only logging when absent.
    pub log_file: Option<PathBuf>,
    /// Level for records coming through the `log` facade.
    pub log_level: String,
    pub policy: MetricsPolicy,
    pub display: DisplayOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            log_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            policy: MetricsPolicy::default(),
            display: DisplayOptions::default(),
        }
    }
}

impl AppConfig {
    /// Reads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json_str(text: &str) -> Result<Self, String> {
        let config: AppConfig = serde_json::from_str(text).map_err(|e| e.to_string())?;
        config.level_filter().map_err(|e| e.to_string())?;
        Ok(config)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, AppError> {
        parse_level(&self.log_level)
            .ok_or_else(|| AppError::Config(format!("unknown log level '{}'", self.log_level)))
    }

    /// Applies command-line overrides on top of the file values.
    pub fn with_overrides(mut self, data_source: Option<String>, log_file: Option<PathBuf>) -> Self {
        if let Some(source) = data_source {
            self.data_source = source;
        }
        if let Some(path) = log_file {
            self.log_file = Some(path);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_object_is_all_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.policy.target_rpv_lift_pct, 5.0);
        assert_eq!(config.display.currency_symbol, "₽");
    }

    #[test]
    fn test_partial_nested_sections() {
        let config = AppConfig::from_json_str(
            r#"{"policy": {"discount_loss_rate": 0.02}, "display": {"currency_symbol": "$"}}"#,
        )
        .unwrap();

        assert_eq!(config.policy.discount_loss_rate, 0.02);
        assert_eq!(config.policy.target_rpv_lift_pct, 5.0);
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(config.display.variant_a_label, "A (control)");
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        assert!(AppConfig::from_json_str(r#"{"log_level": "chatty"}"#).is_err());
    }

    #[test]
    fn test_load_errors_are_config_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let missing = AppConfig::load(Path::new("/nonexistent/abtest.json")).unwrap_err();
        assert!(matches!(missing, AppError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default()
            .with_overrides(Some("https://example.test/data.json".to_string()), None);
        assert_eq!(config.data_source, "https://example.test/data.json");
        assert_eq!(config.log_file, None);
    }
}
