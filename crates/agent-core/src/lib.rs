//! Agent Core
//!
//! Shared foundation for the agency workspace: the base error type,
//! configuration loading, and logging setup.

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{load_config, load_config_or_default, AgencyConfig};
pub use error::{AgentError, Result};
pub use logging::{init_logging, try_init_logging, LogConfig};
