use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::Deserialize;
use workshop_engine::{ClientSettings, EngineConfig, RetryPolicy};
use workshop_logging::LogDestination;

pub(crate) const CONFIG_FILENAME: &str = "workshop.ron";
pub(crate) const API_URL_ENV: &str = "WORKSHOP_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub coaching_timeout_secs: u64,
    pub coaching_retries: u32,
    pub coaching_backoff_ms: u64,
    pub max_document_bytes: u64,
    pub document_title: String,
    /// `file`, `terminal` or `both`.
    pub log_destination: String,
    pub log_level: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        let retry = RetryPolicy::default();
        Self {
            api_base_url: client.base_url,
            data_dir: PathBuf::from(".workshop"),
            output_dir: PathBuf::from("output"),
            coaching_timeout_secs: client.coaching_timeout.as_secs(),
            coaching_retries: retry.retries,
            coaching_backoff_ms: retry.backoff.as_millis() as u64,
            max_document_bytes: client.max_document_bytes,
            document_title: "Businessplan".to_string(),
            log_destination: "file".to_string(),
            log_level: "info".to_string(),
            user_name: None,
            user_email: None,
        }
    }
}

impl AppConfig {
    /// Reads `path`, or `workshop.ron` in the working directory when no path
    /// is given. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(CONFIG_FILENAME);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_override(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub(crate) fn parse(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    pub(crate) fn apply_env_override(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
    }

    pub(crate) fn log_destination(&self) -> LogDestination {
        LogDestination::from_name(&self.log_destination).unwrap_or_default()
    }

    pub(crate) fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub(crate) fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default_with_output(self.output_dir.clone());
        config.client = ClientSettings {
            base_url: self.api_base_url.clone(),
            coaching_timeout: Duration::from_secs(self.coaching_timeout_secs),
            max_document_bytes: self.max_document_bytes,
        };
        config.retry = RetryPolicy {
            retries: self.coaching_retries,
            backoff: Duration::from_millis(self.coaching_backoff_ms),
        };
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::parse(
            r#"(
                api_base_url: "https://api.example.org",
                coaching_retries: 4,
                user_name: Some("Anna"),
            )"#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.org");
        assert_eq!(config.coaching_retries, 4);
        assert_eq!(config.user_name.as_deref(), Some("Anna"));
        assert_eq!(config.coaching_timeout_secs, 30);
        assert_eq!(config.document_title, "Businessplan");
    }

    #[test]
    fn env_override_wins_over_file() {
        let mut config = AppConfig::default();
        config.apply_env_override(Some(" http://10.0.0.2:9000 ".into()));
        assert_eq!(config.api_base_url, "http://10.0.0.2:9000");

        config.apply_env_override(Some("   ".into()));
        assert_eq!(config.api_base_url, "http://10.0.0.2:9000");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&temp.path().join("nope.ron"))).is_err());
    }

    #[test]
    fn engine_config_carries_coaching_settings() {
        let config = AppConfig {
            coaching_timeout_secs: 5,
            coaching_backoff_ms: 250,
            ..AppConfig::default()
        };
        let engine = config.engine_config();
        assert_eq!(engine.client.coaching_timeout, Duration::from_secs(5));
        assert_eq!(engine.retry.backoff, Duration::from_millis(250));
        assert_eq!(engine.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn unknown_log_settings_fall_back() {
        let config = AppConfig {
            log_destination: "syslog".into(),
            log_level: "loud".into(),
            ..AppConfig::default()
        };
        assert!(matches!(config.log_destination(), LogDestination::File));
        assert_eq!(config.log_level(), LevelFilter::Info);
    }
}
