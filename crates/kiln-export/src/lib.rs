//! Kiln exporter: turns a project into a deployable game bundle.
//!
//! ```text
//! Project → Resources → Includes → Behavior/Layout Codegen → Strip
//!         → Target filter → data.js → Copy includes → index.html → Packaging
//! ```
//!
//! The same pipeline serves every [`Target`]; a [`TargetProfile`] selects the
//! renderer, the web root and the packaging files. Hard failures abort with
//! an [`ExportError`]; missing optional inputs become warnings in the
//! [`ExportReport`], which strict mode turns into a failure.

pub mod config;
pub mod data;
pub mod error;
pub mod exporter;
pub mod fs;
pub mod includes;
pub mod index;
pub mod options;
pub mod resources;
pub mod strip;
pub mod targets;

pub use config::ExporterConfig;
pub use error::{ExportError, ExportResult};
pub use exporter::{ExportReport, Exporter, Stage};
pub use fs::{FileSystem, LocalFileSystem};
pub use includes::{add_libs_include, remove_renderer_includes, LibsOptions, Renderer};
pub use options::{hash_include_files, ExportOptions, RuntimeGameOptions, ScriptFile};
pub use targets::{Target, TargetProfile};
