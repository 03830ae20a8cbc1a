//! Shared types for the Kiln exporter.
//!
//! This crate defines the project model read by the code generator and the
//! exporter, the ordered include set threaded through an export run, and the
//! structured diagnostics used to report soft failures.

mod behavior;
mod diagnostic;
mod include;
mod project;
mod resource;

pub use behavior::{
    EventsBasedBehavior, EventsFunction, EventsFunctionsExtension, PropertyDescriptor,
    PropertyType,
};
pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticStage, Diagnostics, Severity};
pub use include::IncludeSet;
pub use project::{
    ExternalEvents, ExternalLayout, Layer, LayerEffect, Layout, LoadingScreen, ObjectGroup,
    Project, SourceFile,
};
pub use resource::{PlatformSpecificAssets, Resource, ResourceKind, ResourcesManager};

/// Error raised when a project document cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("malformed project document: {0}")]
    Malformed(#[from] serde_json::Error),
}
