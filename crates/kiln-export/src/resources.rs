//! Resource export and legacy asset compatibility.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kiln_types::{DiagnosticCode, Diagnostics, Project, Resource, ResourceKind, ResourcesManager};

use crate::error::{ExportError, ExportResult};
use crate::fs::FileSystem;

/// Copy every resource file flat into `destination` and rewrite each
/// resource's `file` to its exported name.
///
/// Sources resolve against the project directory. When two different
/// sources share a file name, later ones are renamed `<stem><n>.<ext>`
/// (n = 2, 3, …). A missing source is reported and its path still
/// rewritten, so the data bundle stays consistent with the generated code.
pub fn export_resources(
    fs: &dyn FileSystem,
    project: &mut Project,
    destination: &Path,
    diagnostics: &mut Diagnostics,
) -> ExportResult<()> {
    let project_directory = project.project_directory();
    let mut exported: HashMap<String, PathBuf> = HashMap::new();

    for resource in project.resources.iter_mut() {
        if resource.file.is_empty() {
            continue;
        }
        let source = project_directory.join(&resource.file);
        let exported_name = unique_file_name(&source, &mut exported);
        let target = destination.join(&exported_name);

        if fs.is_file(&source) {
            fs.copy(&source, &target).map_err(|source| ExportError::Write {
                path: target.clone(),
                source,
            })?;
            tracing::debug!("Copied resource {} to {}", resource.name, target.display());
        } else {
            diagnostics.warn(
                DiagnosticCode::MISSING_RESOURCE_FILE,
                format!("resource `{}` points to a missing file", resource.name),
                source.display().to_string(),
            );
            tracing::warn!("Missing resource file {}", source.display());
        }
        resource.file = exported_name;
    }
    Ok(())
}

/// Exported file name for `source`, renamed on clash with a different source.
fn unique_file_name(source: &Path, exported: &mut HashMap<String, PathBuf>) -> String {
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("resource")
        .to_string();
    let stem = source
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("resource")
        .to_string();
    let extension = source.extension().and_then(|e| e.to_str());

    let mut candidate = file_name;
    let mut n = 2;
    loop {
        match exported.get(&candidate) {
            None => {
                exported.insert(candidate.clone(), source.to_path_buf());
                return candidate;
            }
            Some(existing) if existing == source => return candidate,
            Some(_) => {
                candidate = match extension {
                    Some(ext) => format!("{stem}{n}.{ext}"),
                    None => format!("{stem}{n}"),
                };
                n += 1;
            }
        }
    }
}

/// Declare a font resource for every `.ttf` file in `export_dir`.
///
/// Old projects referenced fonts by bare file name instead of a font
/// resource. Each font file becomes a resource named like the file, unless
/// a resource with that name already exists. Returns the number added.
pub fn add_deprecated_font_resources(
    fs: &dyn FileSystem,
    resources: &mut ResourcesManager,
    export_dir: &Path,
    url_prefix: &str,
) -> usize {
    let files = match fs.list_files(export_dir) {
        Ok(files) => files,
        Err(e) => {
            tracing::debug!("Unable to scan {} for fonts: {}", export_dir.display(), e);
            return 0;
        }
    };

    let mut added = 0;
    for path in &files {
        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf"));
        if !is_font {
            continue;
        }
        let Some(relative) = path.strip_prefix(export_dir).ok().and_then(|p| p.to_str()) else {
            continue;
        };
        let font = Resource::new(relative, ResourceKind::Font, format!("{url_prefix}{relative}"));
        if resources.add(font) {
            tracing::debug!("Declared font resource {}", relative);
            added += 1;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::LocalFileSystem;

    fn project_in(dir: &Path) -> Project {
        let mut project = Project::new("P");
        project.project_file = dir.join("game.json").display().to_string();
        project
    }

    #[test]
    fn clashing_names_are_renamed() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFileSystem;
        fs.write(&dir.path().join("a/hero.png"), "A").unwrap();
        fs.write(&dir.path().join("b/hero.png"), "B").unwrap();
        let mut project = project_in(dir.path());
        project
            .resources
            .add(Resource::new("heroA", ResourceKind::Image, "a/hero.png"));
        project
            .resources
            .add(Resource::new("heroB", ResourceKind::Image, "b/hero.png"));
        project
            .resources
            .add(Resource::new("heroA-again", ResourceKind::Image, "a/hero.png"));

        let out = dir.path().join("out");
        let mut diagnostics = Diagnostics::new();
        export_resources(&fs, &mut project, &out, &mut diagnostics).unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(project.resources.file_of("heroA"), "hero.png");
        assert_eq!(project.resources.file_of("heroB"), "hero2.png");
        assert_eq!(project.resources.file_of("heroA-again"), "hero.png");
        assert_eq!(fs.read_to_string(&out.join("hero2.png")).unwrap(), "B");
    }

    #[test]
    fn missing_source_warns_and_still_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut project = project_in(dir.path());
        project
            .resources
            .add(Resource::new("music", ResourceKind::Audio, "sounds/theme.ogg"));

        let mut diagnostics = Diagnostics::new();
        export_resources(&LocalFileSystem, &mut project, dir.path(), &mut diagnostics).unwrap();

        assert_eq!(diagnostics.count(DiagnosticCode::MISSING_RESOURCE_FILE), 1);
        assert_eq!(project.resources.file_of("music"), "theme.ogg");
    }

    #[test]
    fn ttf_files_become_font_resources_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFileSystem;
        fs.write(&dir.path().join("Title.TTF"), "").unwrap();
        fs.write(&dir.path().join("body.ttf"), "").unwrap();
        fs.write(&dir.path().join("hero.png"), "").unwrap();
        let mut resources = ResourcesManager::new();
        resources.add(Resource::new("body.ttf", ResourceKind::Other("custom".into()), "x"));

        let added = add_deprecated_font_resources(&fs, &mut resources, dir.path(), "");

        assert_eq!(added, 1);
        assert_eq!(resources.get("Title.TTF").unwrap().kind, ResourceKind::Font);
        assert_eq!(resources.file_of("body.ttf"), "x");
        assert!(!resources.has("hero.png"));
    }
}
