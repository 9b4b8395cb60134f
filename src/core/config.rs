use anyhow::{Context, Result, ensure};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

use crate::core::session::{DEFAULT_BASE_CURRENCY, DEFAULT_TARGET_CURRENCY};
use crate::providers::currency_api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_base_currency() -> String {
    DEFAULT_BASE_CURRENCY.to_string()
}

fn default_target_currency() -> String {
    DEFAULT_TARGET_CURRENCY.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CurrencyApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl CurrencyApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CurrencyApiConfig {
    fn default() -> Self {
        CurrencyApiConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub currency_api: CurrencyApiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_target_currency")]
    pub target_currency: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            base_currency: default_base_currency(),
            target_currency: default_target_currency(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "curconv", "curconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        ensure!(
            config.providers.currency_api.timeout_secs > 0,
            "Invalid config file {}: providers.currency_api.timeout_secs must be greater than 0",
            path.as_ref().display()
        );
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  currency_api:
    base_url: "http://example.com/currencies"
    timeout_secs: 5
base_currency: "GBP"
target_currency: "JPY"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.providers.currency_api.base_url,
            "http://example.com/currencies"
        );
        assert_eq!(config.providers.currency_api.timeout(), Duration::from_secs(5));
        assert_eq!(config.base_currency, "GBP");
        assert_eq!(config.target_currency, "JPY");
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.providers.currency_api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.providers.currency_api.timeout_secs, 30);
        assert_eq!(config.base_currency, "USD");
        assert_eq!(config.target_currency, "EUR");

        let partial = r#"
providers:
  currency_api:
    base_url: "http://localhost:8080"
"#;
        let config: AppConfig = serde_yaml::from_str(partial).unwrap();
        assert_eq!(config.providers.currency_api.base_url, "http://localhost:8080");
        assert_eq!(config.providers.currency_api.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/curconv/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(
            &config_path,
            "providers:\n  currency_api:\n    timeout_secs: 0\n",
        )
        .expect("Failed to write config file");

        let err = AppConfig::load_from_path(&config_path).unwrap_err();
        assert!(
            err.to_string().contains("timeout_secs must be greater than 0"),
            "unexpected error: {err}"
        );

        fs::write(
            &config_path,
            "providers:\n  currency_api:\n    timeout_secs: 1\n",
        )
        .expect("Failed to write config file");
        let config = AppConfig::load_from_path(&config_path).expect("Failed to load config");
        assert_eq!(config.providers.currency_api.timeout(), Duration::from_secs(1));
    }
}
