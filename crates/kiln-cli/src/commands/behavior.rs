//! Print the generated module of one events-based behavior

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kiln_codegen::{
    behavior_code_namespace, behavior_method_mangled_names, BehaviorCodeGenerator,
    InlineCodeGenerator,
};
use kiln_export::{Exporter, ExporterConfig};
use kiln_types::IncludeSet;

/// Print the generated module of one events-based behavior
#[derive(Parser, Debug)]
pub struct Behavior {
    /// Project document (JSON)
    #[arg(long)]
    pub project: PathBuf,

    /// Extension declaring the behavior
    #[arg(long)]
    pub extension: String,

    /// Behavior name
    #[arg(long)]
    pub behavior: String,

    /// Generate preview code instead of release code
    #[arg(long)]
    pub preview: bool,
}

impl Behavior {
    pub fn execute(self) -> Result<()> {
        let exporter = Exporter::new(ExporterConfig::default());
        let project = exporter
            .load_project(&self.project)
            .with_context(|| format!("Failed to load project {}", self.project.display()))?;

        let extension = project
            .extensions
            .iter()
            .find(|extension| extension.name == self.extension)
            .with_context(|| format!("Extension not found: {}", self.extension))?;
        let behavior = extension.behavior(&self.behavior).with_context(|| {
            format!("Behavior not found: {}::{}", self.extension, self.behavior)
        })?;

        let events = InlineCodeGenerator;
        let generator = BehaviorCodeGenerator::new(&project, &events);
        let mut includes = IncludeSet::new();
        let module = generator.generate_complete_code(
            &extension.name,
            behavior,
            &behavior_code_namespace(&extension.name, &behavior.name),
            &behavior_method_mangled_names(behavior),
            &mut includes,
            !self.preview,
        );

        for include in &includes {
            tracing::info!("Requires {}", include);
        }
        if !module.diagnostics.is_empty() {
            tracing::warn!("Generated with {} warning(s)", module.diagnostics.len());
        }
        print!("{}", module.code);
        Ok(())
    }
}
