//! Error types for modhost
//!
//! Uses `thiserror` for library errors. "Not found" and "disabled" are not
//! errors in this crate: loaders answer them with `None` or an empty list.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for modhost operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Main error type for modhost operations
#[derive(Error, Debug)]
pub enum LoaderError {
    /// I/O failure on a known path
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored binary exists but cannot be mapped into the process
    #[error("assembly '{name}' at {path} cannot be loaded: {message}")]
    CorruptAssembly {
        name: String,
        path: PathBuf,
        message: String,
    },

    /// Invalid module manifest
    #[error("invalid module manifest {file}: {message}")]
    InvalidManifest { file: PathBuf, message: String },

    /// Invalid dependencies file
    #[error("invalid dependencies file {file}: {message}")]
    InvalidDependencies { file: PathBuf, message: String },

    /// Invalid configuration file
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Modules depend on each other in a loop
    #[error("dependency cycle between modules: {}", modules.join(" -> "))]
    DependencyCycle { modules: Vec<String> },

    /// File watcher could not be set up
    #[error("cannot watch {path}: {message}")]
    Watch { path: PathBuf, message: String },

    /// Another rebuild holds the probing folder lock
    #[error("cannot lock {path}: {message}")]
    Lock { path: PathBuf, message: String },
}

impl LoaderError {
    /// Wrap an `std::io::Error` with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoaderError::Io {
            path: path.into(),
            source,
        }
    }
}
