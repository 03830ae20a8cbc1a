//! Export error types.
//!
//! Only failures that make the bundle unusable abort an export. Missing
//! optional inputs are reported as [`kiln_types::Diagnostic`]s instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an export run.
#[derive(Debug, Error)]
pub enum ExportError {
    /// An output directory could not be created or cleared.
    #[error("unable to prepare directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A generated file, copied asset or packaging file could not be written.
    #[error("unable to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A required runtime template is missing or unreadable.
    #[error("unable to read template {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A project or configuration document could not be read.
    #[error("unable to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A project or configuration document is not valid JSON for its schema.
    #[error("malformed document {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Serializing the project or runtime options failed.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The exporter configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Strict mode: the run completed but produced warnings.
    #[error("strict export for {target} failed with {warnings} warning(s); first: {first}")]
    StrictMode {
        target: String,
        warnings: usize,
        first: String,
    },
}

/// Export result type alias.
pub type ExportResult<T> = Result<T, ExportError>;
