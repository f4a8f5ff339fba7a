//! Extension and dependency descriptors

use serde::{Deserialize, Serialize};

/// A discovered module
///
/// Re-created on every discovery pass; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionDescriptor {
    /// Module id, also the name of its directory and of its binary
    pub id: String,
    /// Display name
    pub name: String,
    /// Virtual path of the modules root containing `<id>/`
    pub location: String,
    /// Ids of modules this one depends on
    pub dependencies: Vec<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

impl ExtensionDescriptor {
    /// Descriptor whose display name equals its id
    pub fn new(id: impl Into<String>, location: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            location: location.into(),
            dependencies: Vec::new(),
            version: None,
            description: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn depends_on(&self, id: &str) -> bool {
        self.dependencies.iter().any(|d| d.eq_ignore_ascii_case(id))
    }
}

/// What the last committed rebuild recorded about a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDescriptor {
    /// Module id
    pub name: String,
    /// Name of the loader that won the module
    pub loader_name: String,
    /// Virtual path of the binary the loader used
    pub virtual_path: String,
    #[serde(default)]
    pub references: Vec<DependencyReferenceDescriptor>,
}

/// An auxiliary binary a module depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReferenceDescriptor {
    pub name: String,
    pub loader_name: String,
    pub virtual_path: String,
}
