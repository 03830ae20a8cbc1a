//! Entry-point rendering.

use std::path::Path;

use kiln_codegen::render;
use kiln_types::{DiagnosticCode, Diagnostics};

use crate::fs::FileSystem;

const CUSTOM_STYLE: &str = "/* KILN_CUSTOM_STYLE */";
const CUSTOM_HTML: &str = "<!-- KILN_CUSTOM_HTML -->";
const CODE_FILES: &str = "<!-- KILN_CODE_FILES -->";
const ADDITIONAL_SPEC: &str = "{}/*KILN_ADDITIONAL_SPEC*/";

/// Fill the markers of an entry-point template.
///
/// Every include gets a script tag: absolute includes verbatim, relative
/// ones only when the file exists under `export_dir` (otherwise a warning
/// is recorded and the tag skipped). An empty `additional_spec` becomes `{}`.
pub fn complete_index_file(
    fs: &dyn FileSystem,
    template: &str,
    export_dir: &Path,
    includes: &[String],
    additional_spec: &str,
    diagnostics: &mut Diagnostics,
) -> String {
    let mut code_files = String::new();
    for include in includes {
        if !Path::new(include).is_absolute() && !fs.is_file(&export_dir.join(include)) {
            let missing = export_dir.join(include);
            diagnostics.warn(
                DiagnosticCode::MISSING_INCLUDE_FILE,
                "script not found in export directory; tag skipped",
                missing.display().to_string(),
            );
            tracing::warn!("Unable to find {}", missing.display());
            continue;
        }
        code_files.push_str(&format!(
            "\t<script src=\"{include}\" crossorigin=\"anonymous\"></script>\n"
        ));
    }

    let additional_spec = if additional_spec.is_empty() {
        "{}"
    } else {
        additional_spec
    };
    render(
        template,
        &[
            (CUSTOM_STYLE, ""),
            (CUSTOM_HTML, ""),
            (CODE_FILES, code_files.as_str()),
            (ADDITIONAL_SPEC, additional_spec),
        ],
    )
}
