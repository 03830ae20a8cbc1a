//! Exporter configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};
use crate::fs::FileSystem;

/// Settings shared by every export an [`crate::Exporter`] runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExporterConfig {
    /// Directory containing the `Runtime/` tree (engine scripts and templates).
    pub runtime_root: PathBuf,
    /// Where generated code is written before being copied into the bundle.
    /// Defaults to `<export path>/code`.
    pub code_output_dir: Option<PathBuf>,
    /// Fail every export that produced warnings.
    pub strict: bool,
    /// Generate layout code on scoped worker threads.
    pub layout_parallelism: bool,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            runtime_root: PathBuf::from("."),
            code_output_dir: None,
            strict: false,
            layout_parallelism: true,
        }
    }
}

impl ExporterConfig {
    pub fn new(runtime_root: impl Into<PathBuf>) -> Self {
        Self {
            runtime_root: runtime_root.into(),
            ..Self::default()
        }
    }

    /// Load a configuration document through `fs`. Absent keys keep their
    /// defaults.
    pub fn from_json_file(fs: &dyn FileSystem, path: &Path) -> ExportResult<Self> {
        let text = fs.read_to_string(path).map_err(|source| ExportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ExportError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ExportResult<()> {
        if self.runtime_root.as_os_str().is_empty() {
            return Err(ExportError::Config("runtimeRoot must not be empty".into()));
        }
        if self
            .code_output_dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            return Err(ExportError::Config("codeOutputDir must not be empty".into()));
        }
        Ok(())
    }

    /// `<runtime root>/Runtime`.
    pub fn runtime_dir(&self) -> PathBuf {
        self.runtime_root.join("Runtime")
    }

    /// Code directory used when exporting into `export_path`.
    pub fn code_output_dir_for(&self, export_path: &Path) -> PathBuf {
        self.code_output_dir
            .clone()
            .unwrap_or_else(|| export_path.join("code"))
    }
}
