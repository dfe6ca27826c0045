//! Logging setup for the agency
//!
//! Structured logging through `tracing`. Worker threads log with the
//! agent name and id as fields, so a single subscriber installed at
//! startup covers every agent.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AgentError, Result};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (e.g., "info", "debug", "trace")
    pub level: String,
    /// Whether to use JSON format (vs. human-readable)
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl From<&crate::config::LoggingConfig> for LogConfig {
    fn from(config: &crate::config::LoggingConfig) -> Self {
        Self {
            level: config.level.clone(),
            json: config.json,
        }
    }
}

/// Initialize logging for the application
///
/// `RUST_LOG` takes precedence over the configured level. Panics if a
/// global subscriber is already installed; use [`try_init_logging`] when
/// that can happen (tests, embedding).
///
/// # Example
///
/// ```
/// use agent_core::logging::{init_logging, LogConfig};
///
/// init_logging(LogConfig {
///     level: "debug".to_string(),
///     json: false,
/// });
/// ```
pub fn init_logging(config: LogConfig) {
    if let Err(e) = try_init_logging(config) {
        panic!("{}", e);
    }
}

/// Initialize logging, returning an error if a subscriber is already set
pub fn try_init_logging(config: LogConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_thread_names(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_thread_names(true))
            .try_init()
    };

    result.map_err(|e| AgentError::logging(e.to_string()))?;

    tracing::info!("Logging initialized at level: {}", config.level);
    Ok(())
}
