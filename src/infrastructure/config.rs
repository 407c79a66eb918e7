//! Configuration management for the catalog pipeline
//!
//! Layered loading with the `config` crate: built-in defaults, then an
//! optional TOML/JSON file, then `GROCERY_CATALOG__*` environment variables.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::category::CategoryTarget;

/// 환경 변수 접두사 (`GROCERY_CATALOG__UPLOAD__BATCH_SIZE=50` 형태)
pub const ENV_PREFIX: &str = "GROCERY_CATALOG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    FileLoad {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

impl ConfigError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
    pub categories: Vec<CategoryTarget>,
    /// Comma-separated URL substrings selecting a subset of `categories`
    pub category_filter: Option<String>,
}

/// Where scraper dumps are read from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub dump_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
    /// Write duplicate / cross-category / summary text reports
    pub write_reports: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub enabled: bool,
    /// JSON file backing the catalog store
    pub store_path: PathBuf,
    pub batch_size: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// JSON formatted file logs
    pub json_format: bool,

    pub console_output: bool,

    pub file_output: bool,

    /// Log directory; `logs/` next to the executable when unset
    pub log_dir: Option<PathBuf>,

    pub file_name: String,

    /// Number of log files to keep when cleanup is enabled
    pub max_files: u32,

    pub auto_cleanup_logs: bool,

    /// Module-specific log level filters (e.g., "grocery_catalog_lib::application": "debug")
    pub module_filters: HashMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            output: OutputConfig::default(),
            upload: UploadConfig::default(),
            logging: LoggingConfig::default(),
            categories: CategoryTarget::defaults(),
            category_filter: None,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dump_dir: PathBuf::from(defaults::DUMP_DIR),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            write_reports: true,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            store_path: PathBuf::from(defaults::STORE_PATH),
            batch_size: defaults::UPLOAD_BATCH_SIZE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: true,
            log_dir: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            max_files: defaults::MAX_LOG_FILES,
            auto_cleanup_logs: true,
            module_filters: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// 설정값 유효성 검증
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::validation("logging.level must not be empty"));
        }

        if self.upload.batch_size == 0 {
            return Err(ConfigError::validation(
                "upload.batch_size must be greater than 0",
            ));
        }

        let mut names = HashSet::new();
        for target in &self.categories {
            if target.name.trim().is_empty() {
                return Err(ConfigError::validation(format!(
                    "category with url '{}' has an empty name",
                    target.url
                )));
            }
            if !names.insert(target.name.as_str()) {
                return Err(ConfigError::validation(format!(
                    "duplicate category name '{}'",
                    target.name
                )));
            }
        }

        Ok(())
    }
}

/// Configuration loader
pub struct ConfigManager {
    config_path: Option<PathBuf>,
    required: bool,
}

impl ConfigManager {
    /// `~/.config/grocery-catalog`
    pub fn get_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(defaults::APP_DIR_NAME))
    }

    /// Optional config file in the user config directory
    pub fn new() -> Self {
        Self {
            config_path: Self::get_config_dir().map(|dir| dir.join(defaults::CONFIG_FILE_STEM)),
            required: false,
        }
    }

    /// Explicit config file; loading fails if it is missing
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
            required: true,
        }
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = &self.config_path {
            debug!("Config file candidate: {:?} (required: {})", path, self.required);
            builder = builder.add_source(
                config::File::with_name(&path.to_string_lossy()).required(self.required),
            );
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        info!(
            "Loaded configuration: {} categories, output {:?}",
            config.categories.len(),
            config.output.output_dir
        );
        Ok(config)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Default configuration values
pub mod defaults {
    pub const APP_DIR_NAME: &str = "grocery-catalog";
    pub const CONFIG_FILE_STEM: &str = "catalog";

    pub const DUMP_DIR: &str = "data/raw";
    pub const OUTPUT_DIR: &str = "output";
    pub const STORE_PATH: &str = "output/catalog_store.json";

    pub const UPLOAD_BATCH_SIZE: usize = crate::domain::constants::upload::DEFAULT_BATCH_SIZE;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_FILE_NAME: &str = "grocery-catalog.log";
    pub const MAX_LOG_FILES: u32 = 10;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.upload.batch_size, 100);
        assert_eq!(config.categories.len(), 14);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.upload.batch_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
        config.upload.batch_size = 10;

        config.categories.push(CategoryTarget::new("bakery", "https://elsewhere"));
        assert!(config.validate().is_err());
        config.categories.pop();

        config.logging.level = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(
            file,
            r#"
category_filter = "bakery,pet"

[output]
output_dir = "/tmp/catalog-out"

[upload]
batch_size = 25

[[categories]]
name = "bakery"
url = "https://www.coles.com.au/browse/bakery"
"#
        )
        .expect("write");

        let config = ConfigManager::with_path(&path).load_config().expect("loads");
        assert_eq!(config.category_filter.as_deref(), Some("bakery,pet"));
        assert_eq!(config.output.output_dir, PathBuf::from("/tmp/catalog-out"));
        assert!(config.output.write_reports);
        assert_eq!(config.upload.batch_size, 25);
        assert!(!config.upload.enabled);
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = ConfigManager::with_path(dir.path().join("absent.toml")).load_config();
        assert!(matches!(result, Err(ConfigError::FileLoad { .. })));
    }
}
