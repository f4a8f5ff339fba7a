//! Configuration module for modhost
//!
//! Resolution order, highest first:
//! 1. CLI flags
//! 2. Environment variables (MODHOST_*)
//! 3. `--config <file>`, else `./modhost.toml`
//! 4. User config (`$MODHOST_CONFIG_HOME/config.toml` or `<config dir>/modhost/config.toml`)
//! 5. Built-in defaults

mod env_validator;
mod loader;
mod types;

pub use env_validator::{parse_bool, EnvVarValidator};
pub use loader::{
    discover_with, parse_with_warnings, with_env_overrides, ConfigSource, ConfigWarning,
    LoadedConfig, CONFIG_HOME_VAR, PROJECT_CONFIG_FILE,
};
pub use types::{Config, LoaderConfig, ModulesConfig, PathsConfig, WatchConfig};
