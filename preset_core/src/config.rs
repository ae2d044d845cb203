//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/clip2cook/config.toml`.

use crate::{Error, Result, RuleVariant};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub request: RequestConfig,

    #[serde(default)]
    pub data: DataConfig,
}

/// Which rule revision the resolver applies
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct RulesConfig {
    #[serde(default)]
    pub variant: RuleVariant,
}

/// Defaults for outgoing conversion requests
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestConfig {
    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default)]
    pub exclude_allergens: Vec<String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            exclude_allergens: Vec::new(),
        }
    }
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clip2cook")
}

fn default_locale() -> String {
    "en".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("clip2cook")
            .join("config.toml")
    }

    /// Reject values the rest of the system cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.request.locale.trim().is_empty() {
            return Err(Error::Config("request.locale must not be empty".into()));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
