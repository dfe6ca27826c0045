//! Configuration management for the agency
//!
//! Configuration is assembled from:
//! - Default values
//! - A configuration file (TOML, JSON or YAML, by extension)
//! - Environment variables prefixed with `AGENCY__`

use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration for the agency
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgencyConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Coordinator and agent loop settings
    #[serde(default)]
    pub agency: AgencySettings,

    /// Model backend settings
    #[serde(default)]
    pub model: ModelSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format
    #[serde(default)]
    pub json: bool,
}

/// Coordinator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgencySettings {
    /// How long teardown waits for running workers
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,

    /// Upper bound on loop iterations per agent run (unbounded when absent)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: Option<usize>,
}

/// Model backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_shutdown_timeout_secs() -> u64 {
    30
}

fn default_max_iterations() -> Option<usize> {
    Some(25)
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AgencySettings {
    fn default() -> Self {
        Self {
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl AgencySettings {
    /// Teardown timeout as a `Duration`
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ModelSettings {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Load configuration from a file
///
/// Supports TOML, JSON, and YAML formats based on file extension.
/// Environment variables such as `AGENCY__MODEL__MODEL=llama3` override
/// file values.
///
/// # Example
///
/// ```no_run
/// use agent_core::config::load_config;
///
/// let config = load_config("agency.toml").unwrap();
/// println!("Model: {}", config.model.model);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AgencyConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AgentError::config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("AGENCY").separator("__"))
        .build()?;

    let config: AgencyConfig = settings.try_deserialize()?;

    tracing::info!("Configuration loaded from {}", path.display());

    Ok(config)
}

/// Load configuration with defaults if the file doesn't exist or is invalid
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> AgencyConfig {
    match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            AgencyConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AgencyConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.agency.shutdown_timeout_secs, 30);
        assert_eq!(config.agency.max_iterations, Some(25));
        assert_eq!(config.model.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "logging": { "level": "debug", "json": true },
            "agency": { "shutdown_timeout_secs": 5, "max_iterations": null },
            "model": { "base_url": "http://localhost:11434/v1", "model": "llama3" }
        }"#;

        let config: AgencyConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.agency.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(config.agency.max_iterations, None);
        assert_eq!(config.model.model, "llama3");
        assert_eq!(config.model.timeout_secs, 60);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: AgencyConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.model.base_url, "https://api.openai.com/v1");
        assert_eq!(config.agency.max_iterations, Some(25));
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[model]\nmodel = \"kimi-k2\"\nbase_url = \"http://localhost:11434/v1\"\n\n[agency]\nshutdown_timeout_secs = 2"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.model.model, "kimi-k2");
        assert_eq!(config.agency.shutdown_timeout_secs, 2);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(AgentError::Config(_))));
    }

    #[test]
    fn test_load_or_default() {
        let config = load_config_or_default("nonexistent.toml");
        assert_eq!(config.model.model, "gpt-4o-mini");
    }
}
