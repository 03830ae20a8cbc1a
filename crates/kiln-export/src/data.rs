//! The data bundle: project document and runtime options as a script.

use std::path::Path;

use kiln_types::Project;

use crate::error::{ExportError, ExportResult};
use crate::fs::FileSystem;
use crate::options::RuntimeGameOptions;

/// Text of the data bundle script.
pub fn data_bundle(project: &Project, options: &RuntimeGameOptions) -> ExportResult<String> {
    let project_json = serde_json::to_string(&project.to_document())?;
    let options_json = serde_json::to_string(options)?;
    Ok(format!(
        "kiln.projectData = {project_json};\nkiln.runtimeGameOptions = {options_json};\n"
    ))
}

/// Write the data bundle to `path`.
pub fn write_data_bundle(
    fs: &dyn FileSystem,
    project: &Project,
    options: &RuntimeGameOptions,
    path: &Path,
) -> ExportResult<()> {
    let contents = data_bundle(project, options)?;
    fs.write(path, &contents).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Wrote data bundle {} ({} bytes)", path.display(), contents.len());
    Ok(())
}
