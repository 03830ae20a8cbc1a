//! The project model.
//!
//! Only the parts of a project the exporter reads or rewrites are typed.
//! Events and objects stay opaque JSON so they survive a load/serialize
//! round trip untouched.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::behavior::EventsFunctionsExtension;
use crate::resource::{PlatformSpecificAssets, ResourcesManager};
use crate::ProjectError;

// ══════════════════════════════════════════════════════════════════════════════
// Project
// ══════════════════════════════════════════════════════════════════════════════

/// A complete game project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub package_name: String,
    #[serde(default = "default_orientation")]
    pub orientation: String,
    #[serde(default = "default_width")]
    pub game_resolution_width: u32,
    #[serde(default = "default_height")]
    pub game_resolution_height: u32,
    /// Path of the project file on disk; resources resolve against its directory.
    /// Never shipped: stripping clears it and an empty path is not serialized.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_file: String,
    #[serde(default)]
    pub first_layout: String,
    #[serde(default)]
    pub ad_mob_app_id: String,
    #[serde(default)]
    pub loading_screen: LoadingScreen,
    #[serde(default)]
    pub layouts: Vec<Layout>,
    #[serde(default)]
    pub external_layouts: Vec<ExternalLayout>,
    #[serde(default)]
    pub external_events: Vec<ExternalEvents>,
    #[serde(default)]
    pub extensions: Vec<EventsFunctionsExtension>,
    #[serde(default)]
    pub resources: ResourcesManager,
    #[serde(default)]
    pub platform_specific_assets: PlatformSpecificAssets,
    #[serde(default)]
    pub source_files: Vec<SourceFile>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_orientation() -> String {
    "landscape".to_string()
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

impl Project {
    /// Create an empty project with default metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: String::new(),
            version: default_version(),
            package_name: String::new(),
            orientation: default_orientation(),
            game_resolution_width: default_width(),
            game_resolution_height: default_height(),
            project_file: String::new(),
            first_layout: String::new(),
            ad_mob_app_id: String::new(),
            loading_screen: LoadingScreen::default(),
            layouts: Vec::new(),
            external_layouts: Vec::new(),
            external_events: Vec::new(),
            extensions: Vec::new(),
            resources: ResourcesManager::new(),
            platform_specific_assets: PlatformSpecificAssets::new(),
            source_files: Vec::new(),
        }
    }

    /// Parse a project document.
    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the project to its JSON document form.
    pub fn to_document(&self) -> serde_json::Value {
        // Every field is a plain string/number/collection; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Directory containing the project file (`.` when unknown).
    pub fn project_directory(&self) -> PathBuf {
        Path::new(&self.project_file)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn layout(&self, name: &str) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.name == name)
    }
}

/// Loading screen settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingScreen {
    #[serde(default = "default_true")]
    pub show_splash: bool,
}

impl Default for LoadingScreen {
    fn default() -> Self {
        Self { show_splash: true }
    }
}

fn default_true() -> bool {
    true
}

// ══════════════════════════════════════════════════════════════════════════════
// Layouts
// ══════════════════════════════════════════════════════════════════════════════

/// A scene: objects, layers and the events driving them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<serde_json::Value>,
    #[serde(default)]
    pub object_groups: Vec<ObjectGroup>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
}

impl Layout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_events(mut self, events: Vec<serde_json::Value>) -> Self {
        self.events = events;
        self
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }
}

/// Named group of objects, referenced by events only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectGroup {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<String>,
}

/// A layer and the visual effects applied to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub name: String,
    #[serde(default)]
    pub effects: Vec<LayerEffect>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerEffect {
    pub name: String,
    pub effect_type: String,
}

/// Instances that can be injected into a layout at runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalLayout {
    pub name: String,
    #[serde(default)]
    pub associated_layout: String,
    #[serde(default)]
    pub instances: Vec<serde_json::Value>,
}

/// Events shared between layouts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalEvents {
    pub name: String,
    #[serde(default)]
    pub associated_layout: String,
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
}

/// A hand-written source file shipped with the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub file_name: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "Javascript".to_string()
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            language: language.into(),
        }
    }
}
