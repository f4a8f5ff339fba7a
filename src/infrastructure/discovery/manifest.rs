//! Manifest-based module discovery
//!
//! A module is a directory directly under a modules root that contains a
//! `module.toml`:
//!
//! ```toml
//! name = "Foo"
//! version = "1.0"
//! description = "Blog widgets"
//! dependencies = ["Common"]
//! ```
//!
//! Every key is optional. Directories without a manifest are not modules.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::entities::ExtensionDescriptor;
use crate::domain::ports::{ExtensionFolders, VirtualPathMonitor, VirtualPathProvider};
use crate::domain::value_objects::{virtual_path, ChangeToken};
use crate::error::{LoaderError, LoaderResult};

pub const MANIFEST_FILE_NAME: &str = "module.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModuleManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ModuleManifest {
    /// Parse a manifest, returning the dotted paths of unknown keys
    pub fn parse(content: &str, file: &Path) -> LoaderResult<(Self, Vec<String>)> {
        let mut unknown = Vec::new();
        let deserializer = toml::de::Deserializer::new(content);
        let manifest: ModuleManifest = serde_ignored::deserialize(deserializer, |path| {
            unknown.push(path.to_string());
        })
        .map_err(|e| LoaderError::InvalidManifest {
            file: file.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok((manifest, unknown))
    }

    pub fn into_descriptor(self, id: &str, location: &str) -> ExtensionDescriptor {
        let mut descriptor = ExtensionDescriptor::new(id, location).with_dependencies(
            self.dependencies
                .into_iter()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        );
        if let Some(name) = self.name.filter(|n| !n.trim().is_empty()) {
            descriptor = descriptor.with_name(name);
        }
        descriptor.version = self.version;
        descriptor.description = self.description;
        descriptor
    }
}

pub struct ManifestDiscovery {
    paths: Arc<dyn VirtualPathProvider>,
    roots: Vec<String>,
    monitor: Option<Arc<dyn VirtualPathMonitor>>,
}

impl ManifestDiscovery {
    pub fn new(paths: Arc<dyn VirtualPathProvider>, roots: Vec<String>) -> Self {
        Self {
            paths,
            roots,
            monitor: None,
        }
    }

    /// Watch roots and manifests through `monitor`
    pub fn with_monitor(mut self, monitor: Arc<dyn VirtualPathMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Descriptors of every module under the configured roots
    ///
    /// When two roots hold a module with the same id, the first root wins.
    pub fn discover(&self) -> LoaderResult<Vec<ExtensionDescriptor>> {
        let mut descriptors: Vec<ExtensionDescriptor> = Vec::new();
        for root in &self.roots {
            for directory in self.paths.list_directories(root)? {
                let Some(descriptor) = self.read_module(root, &directory)? else {
                    continue;
                };
                if descriptors
                    .iter()
                    .any(|d| d.id.eq_ignore_ascii_case(&descriptor.id))
                {
                    warn!(
                        "Module \"{}\" in \"{root}\" is shadowed by a module of the same id",
                        descriptor.id
                    );
                    continue;
                }
                descriptors.push(descriptor);
            }
        }
        Ok(descriptors)
    }

    fn read_module(&self, root: &str, directory: &str) -> LoaderResult<Option<ExtensionDescriptor>> {
        let manifest_path = virtual_path::combine(&[directory, MANIFEST_FILE_NAME]);
        if !self.paths.file_exists(&manifest_path) {
            debug!("Skipping \"{directory}\": no {MANIFEST_FILE_NAME}");
            return Ok(None);
        }

        let file = self.paths.map_path(&manifest_path);
        let content = fs::read_to_string(&file).map_err(|e| LoaderError::io(&file, e))?;
        let (manifest, unknown) = ModuleManifest::parse(&content, &file)?;
        for key in unknown {
            warn!("Unknown key \"{key}\" in {}", file.display());
        }

        let id = virtual_path::file_name(directory);
        Ok(Some(manifest.into_descriptor(id, root)))
    }
}

impl ExtensionFolders for ManifestDiscovery {
    fn available_extensions(&self) -> LoaderResult<Vec<ExtensionDescriptor>> {
        self.discover()
    }

    fn monitor(&self, register: &mut dyn FnMut(ChangeToken)) -> LoaderResult<()> {
        let Some(monitor) = &self.monitor else {
            return Ok(());
        };
        for root in &self.roots {
            if !self.paths.directory_exists(root) {
                continue;
            }
            register(monitor.when_path_changes(root)?);
            for directory in self.paths.list_directories(root)? {
                let manifest_path = virtual_path::combine(&[directory.as_str(), MANIFEST_FILE_NAME]);
                if self.paths.file_exists(&manifest_path) {
                    register(monitor.when_path_changes(&manifest_path)?);
                }
            }
        }
        Ok(())
    }
}
