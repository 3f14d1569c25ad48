//! Configuration file loading.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path};
pub use types::{BookConfig, LoggingConfig, ResolvedConfig, SiteOptions, StagingConfig};
