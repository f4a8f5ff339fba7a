//! Configuration loading and the file hierarchy

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LoaderError, LoaderResult};

use super::env_validator::{levenshtein, parse_bool, EnvVarValidator};
use super::types::Config;

/// Project config file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "modhost.toml";

/// Overrides the user config directory (tests, containers)
pub const CONFIG_HOME_VAR: &str = "MODHOST_CONFIG_HOME";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{suggestion}'?)")?;
        }
        Ok(())
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Project(PathBuf),
    User(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::User(p) => Some(p),
            Self::Defaults => None,
        }
    }
}

/// Result of resolving the configuration hierarchy
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub warnings: Vec<ConfigWarning>,
    pub source: ConfigSource,
    /// Directory relative `app_root` values resolve against
    pub base_dir: PathBuf,
}

impl LoadedConfig {
    pub fn app_root(&self) -> PathBuf {
        self.config.app_root(&self.base_dir)
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> LoaderResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| LoaderError::io(path, e))?;
    parse_with_warnings(&content, path)
}

/// Parse TOML `content` read from `path`
pub fn parse_with_warnings(
    content: &str,
    path: &Path,
) -> LoaderResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| LoaderError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
                file: path.to_path_buf(),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve explicit file, project file, user file, then defaults; the
/// first that exists wins and `MODHOST_*` overrides apply on top.
pub fn discover(explicit: Option<&Path>, cwd: &Path) -> LoaderResult<LoadedConfig> {
    discover_with(explicit, cwd, |key| std::env::var(key).ok())
}

pub fn discover_with<F>(explicit: Option<&Path>, cwd: &Path, lookup: F) -> LoaderResult<LoadedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let source = match explicit {
        Some(path) => ConfigSource::Explicit(absolute(path, cwd)),
        None => {
            let project = cwd.join(PROJECT_CONFIG_FILE);
            let user = user_config_path(&lookup);
            if project.is_file() {
                ConfigSource::Project(project)
            } else if let Some(user) = user.filter(|p| p.is_file()) {
                ConfigSource::User(user)
            } else {
                ConfigSource::Defaults
            }
        }
    };

    let (config, warnings, base_dir) = match source.path() {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            let (config, warnings) = load_with_warnings(path)?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.to_path_buf());
            (config, warnings, base_dir)
        }
        None => (Config::default(), Vec::new(), cwd.to_path_buf()),
    };

    Ok(LoadedConfig {
        config: with_env_overrides(config, lookup),
        warnings,
        source,
        base_dir,
    })
}

/// Apply environment variable overrides (MODHOST_* prefix)
pub fn with_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(root) = lookup("MODHOST_APP_ROOT").filter(|v| !v.trim().is_empty()) {
        config.paths.app_root = PathBuf::from(root);
    }

    if let Some(val) = lookup("MODHOST_PRECOMPILED_DISABLED") {
        let validator = EnvVarValidator::new(
            "MODHOST_PRECOMPILED_DISABLED",
            &["true", "false", "1", "0"],
        );
        if let Some(disabled) = validator.parse(&val, parse_bool) {
            config.loader.precompiled_disabled = disabled;
        }
    }

    if let Some(ext) = lookup("MODHOST_BINARY_EXTENSION") {
        let ext = ext.trim().trim_start_matches('.');
        if !ext.is_empty() {
            config.loader.binary_extension = ext.to_string();
        }
    }

    if let Some(val) = lookup("MODHOST_TIMESTAMP_TOLERANCE_MS") {
        let validator = EnvVarValidator::new("MODHOST_TIMESTAMP_TOLERANCE_MS", &[]);
        if let Some(ms) = validator.parse(&val, |v| v.parse::<u64>().ok()) {
            config.loader.timestamp_tolerance_ms = ms;
        }
    }

    config
}

/// `$MODHOST_CONFIG_HOME/config.toml`, else the platform config dir
pub fn user_config_path<F>(lookup: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(home) = lookup(CONFIG_HOME_VAR).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(home).join("config.toml"));
    }
    dirs::config_dir().map(|dir| dir.join("modhost").join("config.toml"))
}

fn absolute(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "paths",
        "app_root",
        "modules",
        "probing",
        "dependencies",
        "restart_marker",
        "loader",
        "precompiled_disabled",
        "binary_extension",
        "timestamp_tolerance_ms",
        "disabled",
        "watch",
        "debounce_ms",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (*candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}
