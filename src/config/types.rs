//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::WatchOptions;
use crate::domain::services::Staleness;
use crate::error::LoaderResult;
use crate::loaders::PrecompiledOptions;

use super::loader::{self, ConfigWarning, LoadedConfig};

/// Where the host keeps its modules and caches, as virtual paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Physical directory `~/` maps to, relative to the config file
    #[serde(default = "default_app_root")]
    pub app_root: PathBuf,

    #[serde(default = "default_modules")]
    pub modules: Vec<String>,

    #[serde(default = "default_probing")]
    pub probing: String,

    #[serde(default = "default_dependencies")]
    pub dependencies: String,

    #[serde(default = "default_restart_marker")]
    pub restart_marker: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            app_root: default_app_root(),
            modules: default_modules(),
            probing: default_probing(),
            dependencies: default_dependencies(),
            restart_marker: default_restart_marker(),
        }
    }
}

fn default_app_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_modules() -> Vec<String> {
    vec!["~/Modules".to_string()]
}

fn default_probing() -> String {
    "~/App_Data/Dependencies".to_string()
}

fn default_dependencies() -> String {
    "~/App_Data/Dependencies/dependencies.toml".to_string()
}

fn default_restart_marker() -> String {
    "~/App_Data/restart.txt".to_string()
}

/// Precompiled loader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub precompiled_disabled: bool,

    #[serde(default = "default_binary_extension")]
    pub binary_extension: String,

    /// A stored copy is stale only if the source is newer by more than this
    #[serde(default)]
    pub timestamp_tolerance_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            precompiled_disabled: false,
            binary_extension: default_binary_extension(),
            timestamp_tolerance_ms: 0,
        }
    }
}

fn default_binary_extension() -> String {
    "dll".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulesConfig {
    /// Module ids that are never loaded
    #[serde(default)]
    pub disabled: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    crate::application::DEBOUNCE_MS
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub modules: ModulesConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> LoaderResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> LoaderResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Resolve the configuration hierarchy and apply `MODHOST_*` overrides
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> LoaderResult<LoadedConfig> {
        loader::discover(explicit, cwd)
    }

    /// Apply environment variable overrides (MODHOST_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self, |key| std::env::var(key).ok())
    }

    /// Physical application root, resolved against `base_dir`
    pub fn app_root(&self, base_dir: &Path) -> PathBuf {
        if self.paths.app_root.is_absolute() {
            self.paths.app_root.clone()
        } else {
            base_dir.join(&self.paths.app_root)
        }
    }

    pub fn staleness(&self) -> Staleness {
        let millis = i64::try_from(self.loader.timestamp_tolerance_ms).unwrap_or(i64::MAX);
        Staleness::with_tolerance(chrono::Duration::milliseconds(millis))
    }

    pub fn precompiled_options(&self) -> PrecompiledOptions {
        PrecompiledOptions {
            disabled: self.loader.precompiled_disabled,
            binary_extension: self.loader.binary_extension.clone(),
            staleness: self.staleness(),
        }
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions::default().with_debounce(Duration::from_millis(self.watch.debounce_ms))
    }
}
