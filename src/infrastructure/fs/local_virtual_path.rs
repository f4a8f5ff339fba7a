//! Local Virtual Path Provider
//!
//! Maps `~/`-rooted virtual paths onto a directory of the local disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::ports::VirtualPathProvider;
use crate::domain::value_objects::virtual_path;
use crate::error::{LoaderError, LoaderResult};

/// Virtual path provider backed by the local file system
///
/// `~/Modules/Foo` resolves to `<root>/Modules/Foo`.
#[derive(Debug, Clone)]
pub struct LocalVirtualPathProvider {
    root: PathBuf,
}

impl LocalVirtualPathProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Application root every virtual path is resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the directory entries accepted by `keep`, as virtual paths
    fn list_entries(
        &self,
        directory: &str,
        keep: impl Fn(&fs::FileType) -> bool,
    ) -> LoaderResult<Vec<String>> {
        let physical = self.map_path(directory);
        let entries = match fs::read_dir(&physical) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LoaderError::io(physical, e)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LoaderError::io(&physical, e))?;
            let file_type = entry.file_type().map_err(|e| LoaderError::io(entry.path(), e))?;
            if !keep(&file_type) {
                continue;
            }
            // Virtual paths are UTF-8 only
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            paths.push(virtual_path::combine(&[directory, name.as_str()]));
        }
        paths.sort();
        Ok(paths)
    }
}

impl VirtualPathProvider for LocalVirtualPathProvider {
    fn map_path(&self, path: &str) -> PathBuf {
        let relative = virtual_path::relative_to_root(path);
        if relative.is_empty() {
            return self.root.clone();
        }
        self.root.join(relative)
    }

    fn file_exists(&self, path: &str) -> bool {
        self.map_path(path).is_file()
    }

    fn directory_exists(&self, path: &str) -> bool {
        self.map_path(path).is_dir()
    }

    fn list_files(&self, path: &str) -> LoaderResult<Vec<String>> {
        self.list_entries(path, |t| t.is_file())
    }

    fn list_directories(&self, path: &str) -> LoaderResult<Vec<String>> {
        self.list_entries(path, |t| t.is_dir())
    }

    fn get_file_last_write_time_utc(&self, path: &str) -> LoaderResult<DateTime<Utc>> {
        let physical = self.map_path(path);
        let modified = fs::metadata(&physical)
            .and_then(|m| m.modified())
            .map_err(|e| LoaderError::io(&physical, e))?;
        Ok(DateTime::<Utc>::from(modified))
    }
}
