//! Export orchestrator.
//!
//! Runs the export pipeline for one target:
//! 1. Prepare the output directories
//! 2. Export resources, then declare legacy font resources
//! 3. Build the engine include list, then effect includes
//! 4. Generate behavior and layout code (layouts on scoped threads)
//! 5. Copy external source files
//! 6. Strip the project of code-only data
//! 7. Filter out the other renderer's includes
//! 8. Build the runtime options document and write the data bundle
//! 9. Copy every include into the bundle
//! 10. Render the entry point, then package the target
//!
//! Resources are exported before code generation because renames flow into
//! the generated code and the data bundle. Stripping happens after code
//! generation because events read object groups.

use std::fmt;
use std::path::{Path, PathBuf};

use kiln_codegen::js::mangle_name;
use kiln_codegen::{
    behavior_code_namespace, behavior_method_mangled_names, lint_generated, BehaviorCodeGenerator,
    EventsCodeGenerator, FunctionCode, InlineCodeGenerator,
};
use kiln_types::{DiagnosticCode, Diagnostics, IncludeSet, Project, ProjectError};
use serde::Serialize;

use crate::config::ExporterConfig;
use crate::data::write_data_bundle;
use crate::error::{ExportError, ExportResult};
use crate::fs::{FileSystem, LocalFileSystem};
use crate::includes::{
    add_libs_include, effect_includes, remove_renderer_includes, LibsOptions, Renderer,
};
use crate::options::{ExportOptions, RuntimeGameOptions};
use crate::resources::{add_deprecated_font_resources, export_resources};
use crate::strip::strip_project_for_export;
use crate::targets::{package_target, render_entry_point, Target, TargetProfile};

// ══════════════════════════════════════════════════════════════════════════════
// Stages & report
// ══════════════════════════════════════════════════════════════════════════════

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Stage {
    PrepareOutputDir,
    ExportResources,
    ApplyLegacyAssetCompat,
    BuildEngineIncludes,
    BuildEffectIncludes,
    GenerateEventCode,
    ExportExternalSources,
    StripProjectForExport,
    FilterIncludesForTarget,
    BuildRuntimeOptionsDocument,
    WriteDataBundle,
    MaterializeIncludes,
    RenderEntryPoint,
    PackageTarget,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PrepareOutputDir => "PrepareOutputDir",
            Self::ExportResources => "ExportResources",
            Self::ApplyLegacyAssetCompat => "ApplyLegacyAssetCompat",
            Self::BuildEngineIncludes => "BuildEngineIncludes",
            Self::BuildEffectIncludes => "BuildEffectIncludes",
            Self::GenerateEventCode => "GenerateEventCode",
            Self::ExportExternalSources => "ExportExternalSources",
            Self::StripProjectForExport => "StripProjectForExport",
            Self::FilterIncludesForTarget => "FilterIncludesForTarget",
            Self::BuildRuntimeOptionsDocument => "BuildRuntimeOptionsDocument",
            Self::WriteDataBundle => "WriteDataBundle",
            Self::MaterializeIncludes => "MaterializeIncludes",
            Self::RenderEntryPoint => "RenderEntryPoint",
            Self::PackageTarget => "PackageTarget",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub target: Target,
    pub export_path: PathBuf,
    /// Stages that ran, in order.
    pub stages: Vec<Stage>,
    /// Includes as referenced by the bundle (relative to the includes directory).
    pub includes: Vec<String>,
    pub runtime_options: RuntimeGameOptions,
    /// Generated code files and the data bundle.
    pub generated_files: Vec<PathBuf>,
    /// Entry point and packaging files.
    pub written_files: Vec<PathBuf>,
    pub diagnostics: Diagnostics,
}

// ══════════════════════════════════════════════════════════════════════════════
// Exporter
// ══════════════════════════════════════════════════════════════════════════════

/// Exports projects according to an [`ExporterConfig`].
pub struct Exporter {
    fs: Box<dyn FileSystem>,
    events: Box<dyn EventsCodeGenerator>,
    config: ExporterConfig,
}

impl Exporter {
    /// Exporter over the local disk, compiling inline-code events.
    pub fn new(config: ExporterConfig) -> Self {
        Self {
            fs: Box::new(LocalFileSystem),
            events: Box::new(InlineCodeGenerator),
            config,
        }
    }

    pub fn with_file_system(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Box::new(fs);
        self
    }

    pub fn with_events_generator(mut self, events: impl EventsCodeGenerator + 'static) -> Self {
        self.events = Box::new(events);
        self
    }

    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    pub fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Read a project document. The project file defaults to `path`, so
    /// resources resolve next to the document.
    pub fn load_project(&self, path: &Path) -> ExportResult<Project> {
        let text = self
            .fs
            .read_to_string(path)
            .map_err(|source| ExportError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let mut project = Project::from_json(&text).map_err(|e| match e {
            ProjectError::Malformed(source) => ExportError::Malformed {
                path: path.to_path_buf(),
                source,
            },
        })?;
        if project.project_file.is_empty() {
            project.project_file = path.display().to_string();
        }
        Ok(project)
    }

    /// Export one project for one target.
    pub fn export(&self, options: &ExportOptions) -> ExportResult<ExportReport> {
        let code_dir = self.config.code_output_dir_for(&options.export_path);
        self.run(options, code_dir)
    }

    /// Export several targets in parallel.
    ///
    /// Each run owns its include set, project copy and output tree. Results
    /// come back in input order. A configured code directory is split per
    /// target. A run whose export or code directory equals, contains or lies
    /// inside a directory of an earlier run is rejected without touching disk.
    pub fn export_all(&self, runs: &[ExportOptions]) -> Vec<ExportResult<ExportReport>> {
        let dirs: Vec<(PathBuf, PathBuf)> = runs
            .iter()
            .map(|options| {
                let code_dir = match &self.config.code_output_dir {
                    Some(dir) => dir.join(options.target.as_str()),
                    None => options.export_path.join("code"),
                };
                (self.fs.absolute(&options.export_path), code_dir)
            })
            .collect();
        let conflicts: Vec<Option<PathBuf>> = dirs
            .iter()
            .enumerate()
            .map(|(i, (export_dir, code_dir))| {
                let code_dir = self.fs.absolute(code_dir);
                dirs[..i].iter().find_map(|(other_export, other_code)| {
                    let other_code = self.fs.absolute(other_code);
                    [export_dir, &code_dir]
                        .into_iter()
                        .find(|dir| overlaps(dir, other_export) || overlaps(dir, &other_code))
                        .cloned()
                })
            })
            .collect();

        std::thread::scope(|scope| {
            let handles: Vec<_> = runs
                .iter()
                .zip(dirs)
                .zip(conflicts)
                .map(|((options, (_, code_dir)), conflict)| {
                    scope.spawn(move || {
                        if let Some(dir) = conflict {
                            return Err(ExportError::Config(format!(
                                "output directory {} overlaps the output of another target",
                                dir.display()
                            )));
                        }
                        self.run(options, code_dir)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }

    fn run(&self, options: &ExportOptions, code_dir: PathBuf) -> ExportResult<ExportReport> {
        let span = tracing::info_span!(
            "export",
            target = %options.target,
            project = %options.project.name
        );
        let _enter = span.enter();
        tracing::info!("Exporting to {}", options.export_path.display());

        let mut run = ExportRun::new(self, options, code_dir);
        run.stage(Stage::PrepareOutputDir, |run| run.prepare_output_dir())?;
        run.stage(Stage::ExportResources, |run| run.export_resources())?;
        run.stage(Stage::ApplyLegacyAssetCompat, |run| run.apply_legacy_asset_compat())?;
        run.stage(Stage::BuildEngineIncludes, |run| run.build_engine_includes())?;
        run.stage(Stage::BuildEffectIncludes, |run| run.build_effect_includes())?;
        run.stage(Stage::GenerateEventCode, |run| run.generate_event_code())?;
        run.stage(Stage::ExportExternalSources, |run| run.export_external_sources())?;
        run.stage(Stage::StripProjectForExport, |run| run.strip_project())?;
        run.stage(Stage::FilterIncludesForTarget, |run| run.filter_includes())?;
        run.stage(Stage::BuildRuntimeOptionsDocument, |run| run.build_runtime_options())?;
        run.stage(Stage::WriteDataBundle, |run| run.write_data_bundle())?;
        run.stage(Stage::MaterializeIncludes, |run| run.materialize_includes())?;
        run.stage(Stage::RenderEntryPoint, |run| run.render_entry_point())?;
        if !matches!(options.target, Target::Preview | Target::Html5) {
            run.stage(Stage::PackageTarget, |run| run.package_target())?;
        }

        let report = run.into_report();
        tracing::info!(
            "Exported {} ({} includes, {} warnings)",
            report.target,
            report.includes.len(),
            report.diagnostics.len()
        );

        if (options.strict || self.config.strict) && report.diagnostics.has_warnings() {
            return Err(ExportError::StrictMode {
                target: report.target.to_string(),
                warnings: report.diagnostics.len(),
                first: report
                    .diagnostics
                    .iter()
                    .next()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            });
        }
        Ok(report)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// ExportRun
// ══════════════════════════════════════════════════════════════════════════════

/// State of one export run.
struct ExportRun<'e> {
    exporter: &'e Exporter,
    options: &'e ExportOptions,
    profile: TargetProfile,
    /// Working copy; resources are rewritten and code-only data stripped.
    project: Project,
    export_path: PathBuf,
    code_dir: PathBuf,
    includes: IncludeSet,
    runtime_options: RuntimeGameOptions,
    materialized: Vec<String>,
    stages: Vec<Stage>,
    generated_files: Vec<PathBuf>,
    written_files: Vec<PathBuf>,
    diagnostics: Diagnostics,
}

impl<'e> ExportRun<'e> {
    fn new(exporter: &'e Exporter, options: &'e ExportOptions, code_dir: PathBuf) -> Self {
        let fs = exporter.fs.as_ref();
        let profile = options.target.profile();
        let mut project = options.project.clone();
        if profile.force_splash_off {
            project.loading_screen.show_splash = false;
        }
        Self {
            exporter,
            options,
            profile,
            project,
            export_path: fs.absolute(&options.export_path),
            code_dir: fs.absolute(&code_dir),
            includes: IncludeSet::new(),
            runtime_options: RuntimeGameOptions::default(),
            materialized: Vec::new(),
            stages: Vec::new(),
            generated_files: Vec::new(),
            written_files: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn stage(
        &mut self,
        stage: Stage,
        f: impl FnOnce(&mut Self) -> ExportResult<()>,
    ) -> ExportResult<()> {
        let span = tracing::info_span!("stage", stage = stage.as_str());
        let _enter = span.enter();
        self.stages.push(stage);
        f(self)
    }

    fn fs(&self) -> &'e dyn FileSystem {
        let exporter: &'e Exporter = self.exporter;
        exporter.fs.as_ref()
    }

    fn events(&self) -> &'e dyn EventsCodeGenerator {
        let exporter: &'e Exporter = self.exporter;
        exporter.events.as_ref()
    }

    fn web_root(&self) -> PathBuf {
        self.profile.web_root_in(&self.export_path)
    }

    fn into_report(self) -> ExportReport {
        ExportReport {
            target: self.profile.target,
            export_path: self.export_path,
            stages: self.stages,
            includes: self.materialized,
            runtime_options: self.runtime_options,
            generated_files: self.generated_files,
            written_files: self.written_files,
            diagnostics: self.diagnostics,
        }
    }

    fn create_empty_dir(&self, path: &Path) -> ExportResult<()> {
        let fs = self.fs();
        fs.create_dir_all(path)
            .and_then(|()| fs.clear_dir(path))
            .map_err(|source| ExportError::Directory {
                path: path.to_path_buf(),
                source,
            })
    }

    fn write_generated(&mut self, path: &Path, code: &str) -> ExportResult<()> {
        self.fs()
            .write(path, code)
            .map_err(|source| ExportError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!("Wrote {}", path.display());
        self.generated_files.push(path.to_path_buf());
        Ok(())
    }

    // ── Stages ──────────────────────────────────────────────────────────

    fn prepare_output_dir(&mut self) -> ExportResult<()> {
        self.create_empty_dir(&self.export_path)?;
        self.create_empty_dir(&self.code_dir)?;
        let web_root = self.web_root();
        self.fs()
            .create_dir_all(&web_root)
            .map_err(|source| ExportError::Directory {
                path: web_root,
                source,
            })
    }

    fn export_resources(&mut self) -> ExportResult<()> {
        let web_root = self.web_root();
        export_resources(self.fs(), &mut self.project, &web_root, &mut self.diagnostics)
    }

    fn apply_legacy_asset_compat(&mut self) -> ExportResult<()> {
        let web_root = self.web_root();
        let added =
            add_deprecated_font_resources(self.fs(), &mut self.project.resources, &web_root, "");
        if added > 0 {
            tracing::debug!("Declared {} legacy font resource(s)", added);
        }
        Ok(())
    }

    fn build_engine_includes(&mut self) -> ExportResult<()> {
        add_libs_include(
            &mut self.includes,
            LibsOptions {
                pixi_renderers: self.profile.renderer == Renderer::Pixi,
                cocos_renderers: self.profile.renderer == Renderer::Cocos,
                websocket_debugger_client: self.profile.websocket_debugger_client,
            },
        );
        Ok(())
    }

    fn build_effect_includes(&mut self) -> ExportResult<()> {
        self.includes.extend(effect_includes(&self.project));
        Ok(())
    }

    fn generate_event_code(&mut self) -> ExportResult<()> {
        let for_runtime = !self.profile.is_preview;
        let events = self.events();

        let mut behaviors = Vec::new();
        let generator = BehaviorCodeGenerator::new(&self.project, events);
        for extension in &self.project.extensions {
            for behavior in &extension.events_based_behaviors {
                let namespace = behavior_code_namespace(&extension.name, &behavior.name);
                let names = behavior_method_mangled_names(behavior);
                let mut needed = IncludeSet::new();
                let module = generator.generate_complete_code(
                    &extension.name,
                    behavior,
                    &namespace,
                    &names,
                    &mut needed,
                    for_runtime,
                );
                let file = self.code_dir.join(format!(
                    "behavior-{}-{}.js",
                    mangle_name(&extension.name),
                    mangle_name(&behavior.name)
                ));
                behaviors.push((file, module, needed));
            }
        }
        for (file, module, needed) in behaviors {
            self.write_generated(&file, &module.code)?;
            self.diagnostics.append(module.diagnostics);
            self.includes.extend(needed.into_vec());
            self.includes.insert(path_string(&file));
        }

        let layouts = self.generate_layouts(for_runtime);
        for (i, code) in layouts.into_iter().enumerate() {
            let file = self.code_dir.join(format!("code{i}.js"));
            self.diagnostics
                .append(lint_generated(&code.code, &path_string(&file)));
            self.write_generated(&file, &code.code)?;
            self.includes.extend(code.includes);
            self.includes.insert(path_string(&file));
        }
        Ok(())
    }

    /// Layout code in declaration order.
    fn generate_layouts(&self, for_runtime: bool) -> Vec<FunctionCode> {
        let events = self.events();
        let project = &self.project;
        if !self.exporter.config.layout_parallelism || project.layouts.len() < 2 {
            return project
                .layouts
                .iter()
                .map(|layout| events.generate_layout_code(project, layout, for_runtime))
                .collect();
        }

        std::thread::scope(|scope| {
            let handles: Vec<_> = project
                .layouts
                .iter()
                .map(|layout| {
                    scope.spawn(move || events.generate_layout_code(project, layout, for_runtime))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }

    fn export_external_sources(&mut self) -> ExportResult<()> {
        let fs = self.fs();
        let project_directory = self.project.project_directory();
        for (i, source) in self.project.source_files.iter().enumerate() {
            if source.language != "Javascript" {
                continue;
            }
            let from = project_directory.join(&source.file_name);
            let to = self.code_dir.join(format!("ext-code{i}.js"));
            if let Err(e) = fs.copy(&from, &to) {
                self.diagnostics.warn(
                    DiagnosticCode::MISSING_SOURCE_FILE,
                    format!("could not copy external source file: {e}"),
                    from.display().to_string(),
                );
                tracing::warn!("Could not copy external file {}: {}", from.display(), e);
            }
            self.includes.insert(path_string(&to));
        }
        Ok(())
    }

    fn strip_project(&mut self) -> ExportResult<()> {
        strip_project_for_export(&mut self.project);
        if let Some(layout_name) = &self.options.layout_name {
            self.project.first_layout = layout_name.clone();
        }
        Ok(())
    }

    fn filter_includes(&mut self) -> ExportResult<()> {
        let removed = remove_renderer_includes(&mut self.includes, self.profile.renderer.other());
        tracing::debug!("Removed {} include(s) of the other renderer", removed.len());
        Ok(())
    }

    fn build_runtime_options(&mut self) -> ExportResult<()> {
        self.runtime_options = RuntimeGameOptions::build(
            self.profile.is_preview,
            self.options.external_layout_name.as_deref(),
            &self.includes,
            &self.options.include_file_hashes,
        );
        Ok(())
    }

    fn write_data_bundle(&mut self) -> ExportResult<()> {
        let path = self.code_dir.join("data.js");
        write_data_bundle(self.fs(), &self.project, &self.runtime_options, &path)?;
        self.includes.insert(path_string(&path));
        self.generated_files.push(path);
        Ok(())
    }

    /// Copy includes into the bundle. Engine files keep their relative path
    /// under the includes directory; generated files land there by name.
    fn materialize_includes(&mut self) -> ExportResult<()> {
        let fs = self.fs();
        let runtime_dir = self.exporter.config.runtime_dir();
        let destination = self.profile.includes_dir_in(&self.export_path);
        let mut materialized = IncludeSet::new();

        for include in &self.includes {
            let path = Path::new(include);
            let (source, relative) = if path.is_absolute() {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| include.clone());
                (path.to_path_buf(), file_name)
            } else {
                (runtime_dir.join(include), include.clone())
            };

            if fs.is_file(&source) {
                let target = destination.join(&relative);
                fs.copy(&source, &target)
                    .map_err(|source| ExportError::Write {
                        path: target.clone(),
                        source,
                    })?;
                tracing::debug!("Copied {} to {}", source.display(), target.display());
            } else {
                self.diagnostics.warn(
                    DiagnosticCode::MISSING_INCLUDE_FILE,
                    format!("could not find include file `{include}`"),
                    source.display().to_string(),
                );
                tracing::warn!("Could not find include file {}", source.display());
            }
            materialized.insert(relative);
        }

        self.materialized = materialized.into_vec();
        Ok(())
    }

    fn render_entry_point(&mut self) -> ExportResult<()> {
        let runtime_dir = self.exporter.config.runtime_dir();
        let includes_root = self.profile.includes_dir;
        let listed: Vec<String> = self
            .materialized
            .iter()
            .map(|include| join_relative(includes_root, include))
            .collect();
        let path = render_entry_point(
            self.fs(),
            &self.profile,
            &runtime_dir,
            &self.export_path,
            &listed,
            &mut self.diagnostics,
        )?;
        self.written_files.push(path);
        Ok(())
    }

    fn package_target(&mut self) -> ExportResult<()> {
        let runtime_dir = self.exporter.config.runtime_dir();
        let written = package_target(
            self.fs(),
            &self.project,
            &self.profile,
            &runtime_dir,
            &self.export_path,
            &self.materialized,
            &mut self.diagnostics,
        )?;
        self.written_files.extend(written);
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// True when one directory is the other or contains it.
fn overlaps(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

fn join_relative(dir: &str, path: &str) -> String {
    if dir.is_empty() {
        path.to_string()
    } else {
        format!("{dir}/{path}")
    }
}
