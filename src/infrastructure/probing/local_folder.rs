//! Local Probing Folder
//!
//! Stores module binaries as `<root>/<name>.<ext>` and maps them into the
//! process with `libloading`.

use std::ffi::{c_char, CStr};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use libloading::{Library, Symbol};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::entities::LoadedAssembly;
use crate::domain::ports::{AssemblyProbingFolder, StoredAssembly};
use crate::domain::value_objects::AssemblyIdentity;
use crate::error::{LoaderError, LoaderResult};
use crate::infrastructure::host::LoadedAssemblies;

/// Optional symbol listing the types a binary exports, newline separated
pub const EXPORTED_TYPES_SYMBOL: &[u8] = b"modhost_exported_types\0";

type ExportedTypesFn = unsafe extern "C" fn() -> *const c_char;

pub struct LocalProbingFolder {
    root: PathBuf,
    extension: String,
    loaded: Arc<LoadedAssemblies>,
}

impl LocalProbingFolder {
    pub fn new(root: impl Into<PathBuf>, loaded: Arc<LoadedAssemblies>) -> Self {
        Self {
            root: root.into(),
            extension: "dll".to_string(),
            loaded,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Physical path of the stored copy of `name`
    pub fn assembly_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{}", self.extension))
    }

    fn is_binary(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }

    fn map_library(&self, name: &str, path: &Path) -> LoaderResult<LoadedAssembly> {
        let bytes = fs::read(path).map_err(|e| LoaderError::io(path, e))?;
        let identity = AssemblyIdentity::from_bytes(name, &bytes);

        // SAFETY: running a binary's initializers is what loading a module
        // means; only binaries copied from module `bin` folders land here.
        let library = unsafe { Library::new(path) }.map_err(|e| LoaderError::CorruptAssembly {
            name: name.to_string(),
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let exported_types = read_exported_types(&library);

        Ok(LoadedAssembly {
            name: name.to_string(),
            identity,
            location: path.to_path_buf(),
            exported_types,
            handle: Some(Arc::new(library)),
        })
    }
}

fn read_exported_types(library: &Library) -> Vec<String> {
    // SAFETY: the symbol, when present, has the documented signature.
    let symbol: Symbol<ExportedTypesFn> = match unsafe { library.get(EXPORTED_TYPES_SYMBOL) } {
        Ok(symbol) => symbol,
        Err(_) => return Vec::new(),
    };
    let ptr = unsafe { symbol() };
    if ptr.is_null() {
        return Vec::new();
    }
    // SAFETY: the function returns a NUL-terminated static string.
    let text = unsafe { CStr::from_ptr(ptr) }.to_string_lossy();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl AssemblyProbingFolder for LocalProbingFolder {
    fn assembly_exists(&self, name: &str) -> bool {
        self.assembly_path(name).is_file()
    }

    fn get_assembly_date_time_utc(&self, name: &str) -> LoaderResult<Option<DateTime<Utc>>> {
        let path = self.assembly_path(name);
        match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => Ok(Some(DateTime::<Utc>::from(modified))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LoaderError::io(path, e)),
        }
    }

    fn store_assembly(&self, name: &str, source: &Path) -> LoaderResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| LoaderError::io(&self.root, e))?;
        let target = self.assembly_path(name);

        let mut input = fs::File::open(source).map_err(|e| LoaderError::io(source, e))?;
        let source_modified = input
            .metadata()
            .and_then(|m| m.modified())
            .map_err(|e| LoaderError::io(source, e))?;

        // Write next to the target and rename, so a reader never sees a
        // half-written binary
        let mut temp = NamedTempFile::new_in(&self.root).map_err(|e| LoaderError::io(&self.root, e))?;
        io::copy(&mut input, temp.as_file_mut()).map_err(|e| LoaderError::io(temp.path(), e))?;
        // The stored copy carries the source timestamp; staleness compares the two
        temp.as_file()
            .set_modified(source_modified)
            .map_err(|e| LoaderError::io(temp.path(), e))?;
        temp.persist(&target)
            .map_err(|e| LoaderError::io(&target, e.error))?;

        debug!("Stored \"{name}\" at {}", target.display());
        Ok(())
    }

    fn delete_assembly(&self, name: &str) -> LoaderResult<()> {
        let path = self.assembly_path(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted \"{name}\" from {}", self.root.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LoaderError::io(path, e)),
        }
    }

    fn load_assembly(&self, name: &str) -> LoaderResult<Option<LoadedAssembly>> {
        if let Some(assembly) = self.loaded.get(name) {
            return Ok(Some(assembly));
        }

        let path = self.assembly_path(name);
        if !path.is_file() {
            return Ok(None);
        }
        let assembly = self.map_library(name, &path)?;
        Ok(Some(self.loaded.record(assembly)))
    }

    fn list_assemblies(&self) -> LoaderResult<Vec<StoredAssembly>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LoaderError::io(&self.root, e)),
        };

        let mut stored = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LoaderError::io(&self.root, e))?;
            let path = entry.path();
            if !path.is_file() || !self.is_binary(&path) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let metadata = entry.metadata().map_err(|e| LoaderError::io(&path, e))?;
            let modified = metadata.modified().map_err(|e| LoaderError::io(&path, e))?;
            stored.push(StoredAssembly {
                name,
                last_write_time_utc: DateTime::<Utc>::from(modified),
                size: metadata.len(),
                path,
            });
        }
        stored.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(stored)
    }
}
