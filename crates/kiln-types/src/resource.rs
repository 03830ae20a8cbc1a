//! Project resources and platform-specific asset lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kind of a resource. Kinds the exporter does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
    Image,
    Audio,
    Font,
    Json,
    Video,
    Other(String),
}

impl ResourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Font => "font",
            Self::Json => "json",
            Self::Video => "video",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for ResourceKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "image" => Self::Image,
            "audio" => Self::Audio,
            "font" => Self::Font,
            "json" => Self::Json,
            "video" => Self::Video,
            _ => Self::Other(kind),
        }
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A named reference to a file used by the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub name: String,
    pub kind: ResourceKind,
    /// Path of the file, relative to the project directory or absolute.
    pub file: String,
}

impl Resource {
    pub fn new(name: impl Into<String>, kind: ResourceKind, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            file: file.into(),
        }
    }
}

/// Ordered collection of resources, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcesManager {
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl ResourcesManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Add a resource unless one with the same name already exists.
    ///
    /// Returns `false` (and leaves the existing resource untouched) on a
    /// name clash.
    pub fn add(&mut self, resource: Resource) -> bool {
        if self.has(&resource.name) {
            return false;
        }
        self.resources.push(resource);
        true
    }

    /// File of the named resource, or `""` when there is no such resource.
    pub fn file_of(&self, name: &str) -> &str {
        self.get(name).map(|r| r.file.as_str()).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Resource> {
        self.resources.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Platform → asset name → resource name (icons, splash screens).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformSpecificAssets {
    assets: BTreeMap<String, BTreeMap<String, String>>,
}

impl PlatformSpecificAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource name registered for `(platform, name)`, or `""`.
    pub fn get(&self, platform: &str, name: &str) -> &str {
        self.assets
            .get(platform)
            .and_then(|by_name| by_name.get(name))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set(
        &mut self,
        platform: impl Into<String>,
        name: impl Into<String>,
        resource_name: impl Into<String>,
    ) {
        self.assets
            .entry(platform.into())
            .or_default()
            .insert(name.into(), resource_name.into());
    }
}
