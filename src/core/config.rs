use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co";

/// Environment variable consulted before the config file for the API key.
pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AlphaVantageConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub alpha_vantage: Option<AlphaVantageConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            alpha_vantage: Some(AlphaVantageConfig {
                base_url: DEFAULT_ALPHA_VANTAGE_URL.to_string(),
                api_key: None,
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Spreadsheet export holding the transaction batch.
    pub statement_path: String,
    /// JSON file with the watched currency and stock lists.
    pub settings_path: String,
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Currency that quote lookups resolve against.
    pub base_currency: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "finsight", "finsight")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Quote provider base URL, honoring an override in the config file.
    pub fn alpha_vantage_url(&self) -> &str {
        self.providers
            .alpha_vantage
            .as_ref()
            .map_or(DEFAULT_ALPHA_VANTAGE_URL, |p| &p.base_url)
    }

    /// API key from the environment, falling back to the config file.
    pub fn api_key(&self) -> Option<String> {
        env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| {
                self.providers
                    .alpha_vantage
                    .as_ref()
                    .and_then(|p| p.api_key.clone())
            })
    }
}
