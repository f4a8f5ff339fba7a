//! In-memory implementations of the domain ports for unit tests
//!
//! Uses `Mutex` internally so fakes can be shared through `Arc` with the
//! loader under test while the test keeps a handle to inspect them.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::entities::{DependencyDescriptor, ExtensionDescriptor, LoadedAssembly};
use crate::domain::ports::{
    AssemblyProbingFolder, DependenciesFolder, ExtensionFolders, HostEnvironment, StoredAssembly,
    VirtualPathMonitor, VirtualPathProvider,
};
use crate::domain::value_objects::{virtual_path, AssemblyIdentity, ChangeToken};
use crate::error::{LoaderError, LoaderResult};

pub const SITE_ROOT: &str = "/site";

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

#[derive(Default)]
pub struct FakePaths {
    files: Mutex<BTreeMap<String, DateTime<Utc>>>,
    dirs: Mutex<BTreeSet<String>>,
}

impl FakePaths {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Add a file and all of its parent directories
    pub fn add_file(&self, path: &str, modified: DateTime<Utc>) {
        self.files.lock().unwrap().insert(path.to_string(), modified);
        self.add_dir(virtual_path::directory_name(path));
    }

    pub fn add_dir(&self, path: &str) {
        let mut dirs = self.dirs.lock().unwrap();
        let mut current = path.to_string();
        while !current.is_empty() && current != "/" && current != "~" {
            dirs.insert(current.clone());
            current = virtual_path::directory_name(&current).to_string();
        }
    }

    pub fn touch(&self, path: &str, modified: DateTime<Utc>) {
        self.add_file(path, modified);
    }

    pub fn remove_file(&self, path: &str) {
        self.files.lock().unwrap().remove(path);
    }

    fn modified_by_physical(&self, physical: &Path) -> Option<DateTime<Utc>> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .find(|(path, _)| self.map_path(path) == physical)
            .map(|(_, time)| *time)
    }
}

impl VirtualPathProvider for FakePaths {
    fn map_path(&self, path: &str) -> PathBuf {
        PathBuf::from(SITE_ROOT).join(virtual_path::relative_to_root(path))
    }

    fn file_exists(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn directory_exists(&self, path: &str) -> bool {
        self.dirs.lock().unwrap().contains(path)
    }

    fn list_files(&self, path: &str) -> LoaderResult<Vec<String>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|f| virtual_path::directory_name(f) == path)
            .cloned()
            .collect())
    }

    fn list_directories(&self, path: &str) -> LoaderResult<Vec<String>> {
        Ok(self
            .dirs
            .lock()
            .unwrap()
            .iter()
            .filter(|d| virtual_path::directory_name(d) == path)
            .cloned()
            .collect())
    }

    fn get_file_last_write_time_utc(&self, path: &str) -> LoaderResult<DateTime<Utc>> {
        self.files.lock().unwrap().get(path).copied().ok_or_else(|| {
            LoaderError::io(
                self.map_path(path),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            )
        })
    }
}

/// Probing folder that copies timestamps from `FakePaths`
pub struct FakeStore {
    paths: Arc<FakePaths>,
    stored: Mutex<BTreeMap<String, DateTime<Utc>>>,
    corrupt: Mutex<BTreeSet<String>>,
    exports: Mutex<HashMap<String, Vec<String>>>,
    pub operations: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn new(paths: Arc<FakePaths>) -> Arc<Self> {
        Arc::new(Self {
            paths,
            stored: Mutex::new(BTreeMap::new()),
            corrupt: Mutex::new(BTreeSet::new()),
            exports: Mutex::new(HashMap::new()),
            operations: Mutex::new(Vec::new()),
        })
    }

    pub fn put(&self, name: &str, modified: DateTime<Utc>) {
        self.stored.lock().unwrap().insert(name.to_string(), modified);
    }

    pub fn mark_corrupt(&self, name: &str) {
        self.corrupt.lock().unwrap().insert(name.to_string());
    }

    pub fn set_exports(&self, name: &str, types: &[&str]) {
        self.exports.lock().unwrap().insert(
            name.to_string(),
            types.iter().map(|t| t.to_string()).collect(),
        );
    }

    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().unwrap().clone()
    }
}

impl AssemblyProbingFolder for FakeStore {
    fn assembly_exists(&self, name: &str) -> bool {
        self.stored.lock().unwrap().contains_key(name)
    }

    fn get_assembly_date_time_utc(&self, name: &str) -> LoaderResult<Option<DateTime<Utc>>> {
        Ok(self.stored.lock().unwrap().get(name).copied())
    }

    fn store_assembly(&self, name: &str, source: &Path) -> LoaderResult<()> {
        let modified = self.paths.modified_by_physical(source).ok_or_else(|| {
            LoaderError::io(
                source,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            )
        })?;
        self.stored.lock().unwrap().insert(name.to_string(), modified);
        self.operations.lock().unwrap().push(format!("store {name}"));
        Ok(())
    }

    fn delete_assembly(&self, name: &str) -> LoaderResult<()> {
        self.stored.lock().unwrap().remove(name);
        self.operations.lock().unwrap().push(format!("delete {name}"));
        Ok(())
    }

    fn load_assembly(&self, name: &str) -> LoaderResult<Option<LoadedAssembly>> {
        if !self.assembly_exists(name) {
            return Ok(None);
        }
        let location = PathBuf::from("/store").join(format!("{name}.dll"));
        if self.corrupt.lock().unwrap().contains(name) {
            return Err(LoaderError::CorruptAssembly {
                name: name.to_string(),
                path: location,
                message: "not a valid binary".to_string(),
            });
        }
        let exported_types = self
            .exports
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default();
        Ok(Some(LoadedAssembly {
            name: name.to_string(),
            identity: AssemblyIdentity::from_bytes(name, name.as_bytes()),
            location,
            exported_types,
            handle: None,
        }))
    }

    fn list_assemblies(&self) -> LoaderResult<Vec<StoredAssembly>> {
        Ok(self
            .stored
            .lock()
            .unwrap()
            .iter()
            .map(|(name, time)| StoredAssembly {
                name: name.clone(),
                path: PathBuf::from("/store").join(format!("{name}.dll")),
                last_write_time_utc: *time,
                size: 0,
            })
            .collect())
    }
}

#[derive(Default)]
pub struct FakeHost {
    loaded: Mutex<BTreeSet<String>>,
    pub restarts: Mutex<Vec<Vec<String>>>,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn mark_loaded(&self, name: &str) {
        self.loaded.lock().unwrap().insert(name.to_string());
    }

    pub fn restart_count(&self) -> usize {
        self.restarts.lock().unwrap().len()
    }
}

impl HostEnvironment for FakeHost {
    fn is_assembly_loaded(&self, name: &str) -> bool {
        self.loaded.lock().unwrap().contains(name)
    }

    fn restart_app_domain(&self, reasons: &[String]) -> LoaderResult<()> {
        self.restarts.lock().unwrap().push(reasons.to_vec());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeMonitor {
    tokens: Mutex<Vec<ChangeToken>>,
}

impl FakeMonitor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn watched(&self) -> Vec<String> {
        self.tokens
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.path().to_string())
            .collect()
    }

    pub fn fire(&self, path: &str) {
        for token in self.tokens.lock().unwrap().iter() {
            if token.path() == path {
                token.invalidate();
            }
        }
    }
}

impl VirtualPathMonitor for FakeMonitor {
    fn when_path_changes(&self, path: &str) -> LoaderResult<ChangeToken> {
        let token = ChangeToken::new(path);
        self.tokens.lock().unwrap().push(token.clone());
        Ok(token)
    }
}

#[derive(Default)]
pub struct FakeDependencies {
    descriptors: Mutex<Vec<DependencyDescriptor>>,
}

impl FakeDependencies {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl DependenciesFolder for FakeDependencies {
    fn load_descriptors(&self) -> LoaderResult<Vec<DependencyDescriptor>> {
        Ok(self.descriptors.lock().unwrap().clone())
    }

    fn store_descriptors(&self, descriptors: &[DependencyDescriptor]) -> LoaderResult<()> {
        *self.descriptors.lock().unwrap() = descriptors.to_vec();
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeFolders {
    modules: Mutex<Vec<ExtensionDescriptor>>,
}

impl FakeFolders {
    pub fn new(modules: Vec<ExtensionDescriptor>) -> Arc<Self> {
        Arc::new(Self {
            modules: Mutex::new(modules),
        })
    }
}

impl ExtensionFolders for FakeFolders {
    fn available_extensions(&self) -> LoaderResult<Vec<ExtensionDescriptor>> {
        Ok(self.modules.lock().unwrap().clone())
    }
}
