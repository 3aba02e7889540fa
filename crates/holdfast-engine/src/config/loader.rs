use super::schema::{BrowserKind, HoldfastConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./holdfast.yaml
    /// 2. ~/.holdfast/config.yaml
    /// 3. Default configuration
    ///
    /// `HOLDFAST_BROWSER` and `HOLDFAST_HEADLESS` override whatever was loaded.
    pub async fn load_default() -> Result<HoldfastConfig, ConfigError> {
        Self::load(None).await
    }

    /// Load `path` when given, otherwise the default locations, then apply
    /// environment overrides.
    pub async fn load(path: Option<&Path>) -> Result<HoldfastConfig, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path).await?,
            None => Self::load_file_or_default().await?,
        };
        Self::apply_env(&mut config, |key| std::env::var(key).ok())?;
        Self::validate(&config)?;
        Ok(config)
    }

    async fn load_file_or_default() -> Result<HoldfastConfig, ConfigError> {
        let local_config = PathBuf::from("./holdfast.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".holdfast").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        Ok(HoldfastConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<HoldfastConfig, ConfigError> {
        debug!(path = %path.display(), "loading config");
        let content = tokio::fs::read_to_string(path).await?;
        let config: HoldfastConfig = serde_yaml::from_str(&content)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(config: &mut HoldfastConfig, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(browser) = lookup("HOLDFAST_BROWSER") {
            config.browser.kind = browser
                .parse::<BrowserKind>()
                .map_err(ConfigError::Invalid)?;
        }
        if let Some(headless) = lookup("HOLDFAST_HEADLESS") {
            config.browser.headless = match headless.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(ConfigError::Invalid(format!(
                        "HOLDFAST_HEADLESS must be true or false, got {:?}",
                        other
                    )));
                }
            };
        }
        Ok(())
    }

    pub fn validate(config: &HoldfastConfig) -> Result<(), ConfigError> {
        url::Url::parse(&config.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url {:?}: {}", config.base_url, e)))?;

        let executor = &config.executor;
        if executor.candidate_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "executor.candidate_timeout_ms must be positive".into(),
            ));
        }
        if executor.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "executor.poll_interval_ms must be positive".into(),
            ));
        }
        if config.scenario.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "scenario.timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}
