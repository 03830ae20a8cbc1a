//! Export options and the runtime options document.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kiln_types::{IncludeSet, Project};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::fs::FileSystem;
use crate::targets::Target;

// ══════════════════════════════════════════════════════════════════════════════
// ExportOptions
// ══════════════════════════════════════════════════════════════════════════════

/// Everything one export run needs besides the exporter configuration.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub project: Project,
    pub target: Target,
    /// Directory receiving the bundle. Cleared before export.
    pub export_path: PathBuf,
    /// Layout the game starts on; the project's first layout when `None`.
    pub layout_name: Option<String>,
    /// External layout injected into the first layout (previews).
    pub external_layout_name: Option<String>,
    /// Include path → content hash, forwarded to the hot-reloader.
    pub include_file_hashes: HashMap<String, u32>,
    /// Fail the run when any warning was produced.
    pub strict: bool,
}

impl ExportOptions {
    pub fn new(project: Project, target: Target, export_path: impl Into<PathBuf>) -> Self {
        Self {
            project,
            target,
            export_path: export_path.into(),
            layout_name: None,
            external_layout_name: None,
            include_file_hashes: HashMap::new(),
            strict: false,
        }
    }

    pub fn with_layout(mut self, layout_name: impl Into<String>) -> Self {
        self.layout_name = Some(layout_name.into());
        self
    }

    pub fn with_external_layout(mut self, external_layout_name: impl Into<String>) -> Self {
        self.external_layout_name = Some(external_layout_name.into());
        self
    }

    pub fn with_include_file_hashes(mut self, hashes: HashMap<String, u32>) -> Self {
        self.include_file_hashes = hashes;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// RuntimeGameOptions
// ══════════════════════════════════════════════════════════════════════════════

/// Options the runtime reads at startup, next to the project data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeGameOptions {
    pub is_preview: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inject_external_layout: Option<String>,
    #[serde(default)]
    pub script_files: Vec<ScriptFile>,
}

/// One loaded script, as seen by the hot-reloader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFile {
    pub path: String,
    pub hash: u32,
}

impl RuntimeGameOptions {
    /// Build the document for `includes`; unknown hashes are `0`.
    pub fn build(
        is_preview: bool,
        inject_external_layout: Option<&str>,
        includes: &IncludeSet,
        hashes: &HashMap<String, u32>,
    ) -> Self {
        Self {
            is_preview,
            inject_external_layout: inject_external_layout
                .filter(|name| !name.is_empty())
                .map(String::from),
            script_files: includes
                .iter()
                .map(|path| ScriptFile {
                    path: path.clone(),
                    hash: hashes.get(path).copied().unwrap_or(0),
                })
                .collect(),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Hashing
// ══════════════════════════════════════════════════════════════════════════════

/// Content hash of an include: first four bytes of its SHA-256, big-endian.
pub fn include_hash(contents: &[u8]) -> u32 {
    let digest = Sha256::digest(contents);
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Hash every readable include.
///
/// Relative includes resolve against `<runtime_root>/Runtime`; absolute ones
/// are read as is. Unreadable files are left out.
pub fn hash_include_files<'a>(
    fs: &dyn FileSystem,
    runtime_root: &Path,
    includes: impl IntoIterator<Item = &'a String>,
) -> HashMap<String, u32> {
    let runtime_dir = runtime_root.join("Runtime");
    includes
        .into_iter()
        .filter_map(|include| {
            let path = runtime_dir.join(include);
            let contents = fs.read(&path).ok()?;
            Some((include.clone(), include_hash(&contents)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::LocalFileSystem;

    #[test]
    fn document_uses_camel_case_and_omits_empty_injection() {
        let includes: IncludeSet = ["kiln.js", "code/code0.js"].into_iter().collect();
        let hashes = HashMap::from([("kiln.js".to_string(), 7)]);
        let options = RuntimeGameOptions::build(true, None, &includes, &hashes);

        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "isPreview": true,
                "scriptFiles": [
                    {"path": "kiln.js", "hash": 7},
                    {"path": "code/code0.js", "hash": 0}
                ]
            })
        );
    }

    #[test]
    fn injected_layout_is_kept() {
        let options = RuntimeGameOptions::build(true, Some("Overlay"), &IncludeSet::new(), &HashMap::new());
        assert_eq!(options.inject_external_layout.as_deref(), Some("Overlay"));
    }

    #[test]
    fn hash_is_stable_and_content_sensitive() {
        assert_eq!(include_hash(b"abc"), include_hash(b"abc"));
        assert_ne!(include_hash(b"abc"), include_hash(b"abd"));
        // SHA-256("abc") starts with ba7816bf.
        assert_eq!(include_hash(b"abc"), 0xba78_16bf);
    }

    #[test]
    fn hashes_only_readable_includes() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFileSystem;
        fs.write(&dir.path().join("Runtime/kiln.js"), "abc").unwrap();
        let includes = vec!["kiln.js".to_string(), "missing.js".to_string()];

        let hashes = hash_include_files(&fs, dir.path(), &includes);

        assert_eq!(hashes.len(), 1);
        assert_eq!(hashes["kiln.js"], 0xba78_16bf);
    }
}
