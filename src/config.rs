use crate::app::ports::IfExists;
use crate::constants::DEFAULT_LOG_DIR;
use crate::error::{EtlError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Run configuration. Every field has a default so a missing config file
/// means "reference behavior".
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EtlConfig {
    /// What to do when `disaster_data` already exists in the destination.
    pub if_exists: IfExists,
    /// Check every row's category names against the first row's.
    pub validate_category_names: bool,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub file_logging: bool,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            if_exists: IfExists::Fail,
            validate_category_names: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            file_logging: true,
        }
    }
}

impl EtlConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            EtlError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EtlConfig = toml::from_str(content)?;
        Ok(config)
    }
}
