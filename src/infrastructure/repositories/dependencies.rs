//! TOML Dependencies Folder
//!
//! Persists the outcome of the last committed rebuild, by default at
//! `~/App_Data/Dependencies/dependencies.toml`:
//!
//! ```toml
//! version = 1
//!
//! [[dependencies]]
//! name = "Foo"
//! loader_name = "precompiled"
//! virtual_path = "~/Modules/Foo/bin/Foo.dll"
//!
//! [[dependencies.references]]
//! name = "Markdig"
//! loader_name = "precompiled"
//! virtual_path = "~/Modules/Foo/bin/Markdig.dll"
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::domain::entities::DependencyDescriptor;
use crate::domain::ports::DependenciesFolder;
use crate::error::{LoaderError, LoaderResult};

pub const DEPENDENCIES_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct TomlDependencies {
    version: u32,
    #[serde(default)]
    dependencies: Vec<DependencyDescriptor>,
}

/// Parse the content of a dependencies file read from `file`
pub fn parse_dependencies(content: &str, file: &Path) -> LoaderResult<Vec<DependencyDescriptor>> {
    let invalid = |message: String| LoaderError::InvalidDependencies {
        file: file.to_path_buf(),
        message,
    };
    let parsed: TomlDependencies = toml::from_str(content).map_err(|e| invalid(e.to_string()))?;
    if parsed.version > DEPENDENCIES_FORMAT_VERSION {
        return Err(invalid(format!(
            "unsupported version {} (this build reads up to {})",
            parsed.version, DEPENDENCIES_FORMAT_VERSION
        )));
    }
    Ok(parsed.dependencies)
}

pub struct TomlDependenciesFolder {
    path: PathBuf,
}

impl TomlDependenciesFolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn invalid(&self, message: impl Into<String>) -> LoaderError {
        LoaderError::InvalidDependencies {
            file: self.path.clone(),
            message: message.into(),
        }
    }
}

impl DependenciesFolder for TomlDependenciesFolder {
    fn load_descriptors(&self) -> LoaderResult<Vec<DependencyDescriptor>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| LoaderError::io(&self.path, e))?;
        parse_dependencies(&content, &self.path)
    }

    fn store_descriptors(&self, descriptors: &[DependencyDescriptor]) -> LoaderResult<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| LoaderError::io(parent, e))?;

        let mut sorted = descriptors.to_vec();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        let content = toml::to_string_pretty(&TomlDependencies {
            version: DEPENDENCIES_FORMAT_VERSION,
            dependencies: sorted,
        })
        .map_err(|e| self.invalid(e.to_string()))?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| LoaderError::io(parent, e))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| LoaderError::io(temp.path(), e))?;
        temp.persist(&self.path)
            .map_err(|e| LoaderError::io(&self.path, e.error))?;
        Ok(())
    }
}
