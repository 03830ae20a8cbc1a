//! Export a project for one or more targets
//!
//! A single target exports straight into `--out`; several targets export in
//! parallel into `--out/<target>`.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kiln_export::{
    add_libs_include, hash_include_files, ExportOptions, Exporter, ExporterConfig, LibsOptions,
    LocalFileSystem, Target,
};
use kiln_types::IncludeSet;

/// Export a project for one or more targets
#[derive(Parser, Debug)]
pub struct Export {
    /// Project document (JSON)
    #[arg(long)]
    pub project: PathBuf,

    /// Output directory
    #[arg(long)]
    pub out: PathBuf,

    /// Targets to export (preview, html5, facebook-instant-games, electron, cordova, cocos2d)
    #[arg(short, long = "target", value_name = "TARGET", default_value = "html5", num_args = 1..)]
    pub targets: Vec<Target>,

    /// Layout the game starts with
    #[arg(long)]
    pub layout: Option<String>,

    /// External layout instantiated in the first layout (previews)
    #[arg(long)]
    pub external_layout: Option<String>,

    /// Directory containing the `Runtime/` tree
    #[arg(long, env = "KILN_RUNTIME_ROOT")]
    pub runtime_root: Option<PathBuf>,

    /// Exporter configuration file (JSON)
    #[arg(long, env = "KILN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Fail when an export produces warnings
    #[arg(long, env = "KILN_STRICT")]
    pub strict: bool,

    /// Print each export report as JSON on stdout
    #[arg(long)]
    pub report: bool,
}

impl Export {
    pub fn execute(self) -> Result<()> {
        let mut config = match &self.config {
            Some(path) => ExporterConfig::from_json_file(&LocalFileSystem, path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ExporterConfig::default(),
        };
        if let Some(root) = &self.runtime_root {
            config.runtime_root = root.clone();
        }
        config.strict |= self.strict;
        config.validate().context("Invalid exporter configuration")?;

        let exporter = Exporter::new(config);
        let project = exporter
            .load_project(&self.project)
            .with_context(|| format!("Failed to load project {}", self.project.display()))?;

        let hashes = if self.targets.contains(&Target::Preview) {
            preview_hashes(&exporter)
        } else {
            HashMap::new()
        };

        let runs: Vec<ExportOptions> = self
            .targets
            .iter()
            .map(|&target| {
                let export_path = if self.targets.len() == 1 {
                    self.out.clone()
                } else {
                    self.out.join(target.as_str())
                };
                let mut options = ExportOptions::new(project.clone(), target, export_path)
                    .with_include_file_hashes(hashes.clone());
                if let Some(layout) = &self.layout {
                    options = options.with_layout(layout.clone());
                }
                if let Some(external_layout) = &self.external_layout {
                    options = options.with_external_layout(external_layout.clone());
                }
                options
            })
            .collect();

        let results = match runs.as_slice() {
            [single] => vec![exporter.export(single)],
            _ => exporter.export_all(&runs),
        };

        let mut failed = 0;
        for (options, result) in runs.iter().zip(results) {
            match result {
                Ok(report) => {
                    println!(
                        "Exported {} to {} ({} includes, {} warnings)",
                        report.target,
                        report.export_path.display(),
                        report.includes.len(),
                        report.diagnostics.len()
                    );
                    if self.report {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    }
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!("Export for {} failed: {:#}", options.target, anyhow::Error::from(e));
                }
            }
        }

        if failed > 0 {
            anyhow::bail!("{failed} of {} export(s) failed", runs.len());
        }
        Ok(())
    }
}

/// Content hashes of the preview engine files, for hot-reload.
fn preview_hashes(exporter: &Exporter) -> HashMap<String, u32> {
    let mut includes = IncludeSet::new();
    add_libs_include(
        &mut includes,
        LibsOptions {
            pixi_renderers: true,
            cocos_renderers: false,
            websocket_debugger_client: true,
        },
    );
    hash_include_files(
        exporter.file_system(),
        &exporter.config().runtime_root,
        &includes,
    )
}
