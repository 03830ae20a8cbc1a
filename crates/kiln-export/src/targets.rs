//! Export targets and their packaging files.
//!
//! Every target runs the same pipeline; a [`TargetProfile`] says which
//! renderer it keeps, where the web root lives and which packaging step
//! runs last.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use kiln_codegen::js::package_identifier;
use kiln_codegen::render;
use kiln_types::{DiagnosticCode, Diagnostics, Project};
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};
use crate::fs::FileSystem;
use crate::includes::Renderer;
use crate::index::complete_index_file;

// ══════════════════════════════════════════════════════════════════════════════
// Target
// ══════════════════════════════════════════════════════════════════════════════

/// A runtime environment a project can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    Preview,
    Html5,
    FacebookInstantGames,
    Electron,
    Cordova,
    Cocos2d,
}

impl Target {
    pub const ALL: [Target; 6] = [
        Target::Preview,
        Target::Html5,
        Target::FacebookInstantGames,
        Target::Electron,
        Target::Cordova,
        Target::Cocos2d,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Html5 => "html5",
            Self::FacebookInstantGames => "facebook-instant-games",
            Self::Electron => "electron",
            Self::Cordova => "cordova",
            Self::Cocos2d => "cocos2d",
        }
    }

    pub fn profile(self) -> TargetProfile {
        let web = TargetProfile {
            target: self,
            renderer: Renderer::Pixi,
            websocket_debugger_client: false,
            is_preview: false,
            force_splash_off: false,
            web_root: "",
            includes_dir: "",
            index_template: "index.html",
            index_includes: true,
        };
        match self {
            Self::Preview => TargetProfile {
                websocket_debugger_client: true,
                is_preview: true,
                force_splash_off: true,
                ..web
            },
            Self::Html5 | Self::FacebookInstantGames => web,
            Self::Electron => TargetProfile {
                web_root: "app",
                ..web
            },
            Self::Cordova => TargetProfile {
                web_root: "www",
                ..web
            },
            Self::Cocos2d => TargetProfile {
                renderer: Renderer::Cocos,
                includes_dir: "src",
                index_template: "Cocos2d/index.html",
                index_includes: false,
                ..web
            },
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|target| target.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = Target::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown target `{s}` (expected one of: {})", known.join(", "))
            })
    }
}

/// How one target parameterizes the export pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetProfile {
    pub target: Target,
    /// Renderer whose manifest is included; the other one is filtered out.
    pub renderer: Renderer,
    pub websocket_debugger_client: bool,
    pub is_preview: bool,
    /// Disable the loading splash whatever the project says.
    pub force_splash_off: bool,
    /// Directory, relative to the export path, holding resources and the entry point.
    pub web_root: &'static str,
    /// Directory, relative to the web root, receiving the includes.
    pub includes_dir: &'static str,
    /// Entry-point template, relative to `<runtime root>/Runtime`.
    pub index_template: &'static str,
    /// Whether the entry point lists the includes as script tags.
    pub index_includes: bool,
}

impl TargetProfile {
    pub fn web_root_in(&self, export_path: &Path) -> PathBuf {
        export_path.join(self.web_root)
    }

    pub fn includes_dir_in(&self, export_path: &Path) -> PathBuf {
        self.web_root_in(export_path).join(self.includes_dir)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Packaging
// ══════════════════════════════════════════════════════════════════════════════

/// Write the target's packaging files. Returns the files written.
pub fn package_target(
    fs: &dyn FileSystem,
    project: &Project,
    profile: &TargetProfile,
    runtime_dir: &Path,
    export_path: &Path,
    includes: &[String],
    diagnostics: &mut Diagnostics,
) -> ExportResult<Vec<PathBuf>> {
    let packager = Packager {
        fs,
        project,
        runtime_dir,
        export_path,
        web_root: profile.web_root,
    };
    match profile.target {
        Target::Preview | Target::Html5 => Ok(Vec::new()),
        Target::FacebookInstantGames => packager.facebook_instant_games(),
        Target::Electron => packager.electron(diagnostics),
        Target::Cordova => packager.cordova(diagnostics),
        Target::Cocos2d => packager.cocos2d(profile, includes, diagnostics),
    }
}

const ANDROID_ICONS: &[(&str, &str)] = &[
    ("36", "ldpi"),
    ("48", "mdpi"),
    ("72", "hdpi"),
    ("96", "xhdpi"),
    ("144", "xxhdpi"),
    ("192", "xxxhdpi"),
];

const IOS_ICONS: &[&str] = &[
    "180", "60", "120", "76", "152", "40", "80", "57", "114", "72", "144", "167", "29", "58",
    "50", "100",
];

const ADMOB_PLUGIN: &str = "<plugin name=\"cordova-plugin-admob-free\" spec=\"~0.21.0\">
\t\t<variable name=\"ADMOB_APP_ID\" value=\"{{ADMOB_APP_ID}}\" />
\t</plugin>";

struct Packager<'a> {
    fs: &'a dyn FileSystem,
    project: &'a Project,
    runtime_dir: &'a Path,
    export_path: &'a Path,
    web_root: &'static str,
}

impl Packager<'_> {
    fn read_template(&self, relative: &str) -> ExportResult<String> {
        let path = self.runtime_dir.join(relative);
        self.fs
            .read_to_string(&path)
            .map_err(|source| ExportError::Template { path, source })
    }

    fn write(&self, relative: &str, contents: &str) -> ExportResult<PathBuf> {
        let path = self.export_path.join(relative);
        self.fs
            .write(&path, contents)
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;
        tracing::debug!("Wrote {}", path.display());
        Ok(path)
    }

    fn copy(&self, template: &str, relative: &str) -> ExportResult<PathBuf> {
        let source = self.runtime_dir.join(template);
        let path = self.export_path.join(relative);
        if !self.fs.is_file(&source) {
            return Err(ExportError::Template {
                path: source,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        self.fs
            .copy(&source, &path)
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// JSON-encoded values for the `"KILN_GAME_…"` tokens of package manifests.
    fn json_tokens(&self) -> ExportResult<[(&'static str, String); 4]> {
        Ok([
            ("\"KILN_GAME_NAME\"", serde_json::to_string(&self.project.name)?),
            ("\"KILN_GAME_AUTHOR\"", serde_json::to_string(&self.project.author)?),
            ("\"KILN_GAME_VERSION\"", serde_json::to_string(&self.project.version)?),
            (
                "\"KILN_GAME_MANGLED_NAME\"",
                serde_json::to_string(&package_identifier(&self.project.name))?,
            ),
        ])
    }

    fn render_package_json(&self, template: &str) -> ExportResult<String> {
        let tokens = self.json_tokens()?;
        let substitutions: Vec<(&str, &str)> =
            tokens.iter().map(|(token, value)| (*token, value.as_str())).collect();
        Ok(render(&self.read_template(template)?, &substitutions))
    }

    /// Exported file of the resource registered for a platform asset, or `""`.
    fn asset_file(&self, platform: &str, name: &str) -> &str {
        let resource_name = self.project.platform_specific_assets.get(platform, name);
        self.project.resources.file_of(resource_name)
    }

    // ── Facebook Instant Games ──────────────────────────────────────────

    fn facebook_instant_games(&self) -> ExportResult<Vec<PathBuf>> {
        let orientation = if self.project.orientation == "portrait" {
            "\"PORTRAIT\""
        } else {
            "\"LANDSCAPE\""
        };
        let config = render(
            &self.read_template("FacebookInstantGames/fbapp-config.json")?,
            &[("\"KILN_ORIENTATION\"", orientation)],
        );
        Ok(vec![self.write("fbapp-config.json", &config)?])
    }

    // ── Electron ────────────────────────────────────────────────────────

    fn electron(&self, diagnostics: &mut Diagnostics) -> ExportResult<Vec<PathBuf>> {
        let mut written = vec![self.write(
            "package.json",
            &self.render_package_json("Electron/package.json")?,
        )?];

        let name = serde_json::to_string(&self.project.name)?;
        let width = self.project.game_resolution_width.to_string();
        let height = self.project.game_resolution_height.to_string();
        let main = render(
            &self.read_template("Electron/main.js")?,
            &[
                ("800 /*KILN_WINDOW_WIDTH*/", width.as_str()),
                ("600 /*KILN_WINDOW_HEIGHT*/", height.as_str()),
                ("\"KILN_GAME_NAME\"", name.as_str()),
            ],
        );
        written.push(self.write("main.js", &main)?);

        let build_resources = self.export_path.join("buildResources");
        self.fs
            .create_dir_all(&build_resources)
            .map_err(|source| ExportError::Directory {
                path: build_resources.clone(),
                source,
            })?;
        let icon = self.asset_file("desktop", "icon-512");
        if !icon.is_empty() {
            let source = self.export_path.join(self.web_root).join(icon);
            if self.fs.is_file(&source) {
                written.push(self.copy_file(&source, "buildResources/icon.png")?);
            } else {
                diagnostics.warn(
                    DiagnosticCode::MISSING_ICON_FILE,
                    "desktop icon not found; package built without icon",
                    source.display().to_string(),
                );
                tracing::warn!("Missing desktop icon {}", source.display());
            }
        }
        Ok(written)
    }

    fn copy_file(&self, source: &Path, relative: &str) -> ExportResult<PathBuf> {
        let path = self.export_path.join(relative);
        self.fs
            .copy(source, &path)
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    // ── Cordova ─────────────────────────────────────────────────────────

    fn icon_path(&self, platform: &str, name: &str, diagnostics: &mut Diagnostics) -> Option<String> {
        let file = self.asset_file(platform, name);
        if file.is_empty() {
            return None;
        }
        let relative = format!("{}/{file}", self.web_root);
        if !self.fs.is_file(&self.export_path.join(&relative)) {
            diagnostics.warn(
                DiagnosticCode::MISSING_ICON_FILE,
                format!("{platform} icon `{name}` not found in export"),
                relative.clone(),
            );
        }
        Some(relative)
    }

    fn cordova(&self, diagnostics: &mut Diagnostics) -> ExportResult<Vec<PathBuf>> {
        let mut android_icons = String::new();
        for (size, density) in ANDROID_ICONS {
            if let Some(src) = self.icon_path("android", &format!("icon-{size}"), diagnostics) {
                android_icons.push_str(&format!("<icon src=\"{src}\" density=\"{density}\" />\n"));
            }
        }
        let mut ios_icons = String::new();
        for size in IOS_ICONS {
            if let Some(src) = self.icon_path("ios", &format!("icon-{size}"), diagnostics) {
                ios_icons.push_str(&format!(
                    "<icon src=\"{src}\" width=\"{size}\" height=\"{size}\" />\n"
                ));
            }
        }

        let name = escape_xml(&self.project.name);
        let package_name = escape_xml(&self.project.package_name);
        let admob = if self.project.ad_mob_app_id.is_empty() {
            String::new()
        } else {
            let app_id = escape_xml(&self.project.ad_mob_app_id);
            render(ADMOB_PLUGIN, &[("{{ADMOB_APP_ID}}", app_id.as_str())])
        };
        let mut substitutions = vec![
            ("KILN_PROJECTNAME", name.as_str()),
            ("KILN_PACKAGENAME", package_name.as_str()),
            ("KILN_ORIENTATION", self.project.orientation.as_str()),
            ("KILN_PROJECTVERSION", self.project.version.as_str()),
            ("<!-- KILN_ICONS_ANDROID -->", android_icons.as_str()),
            ("<!-- KILN_ICONS_IOS -->", ios_icons.as_str()),
        ];
        if !admob.is_empty() {
            substitutions.push(("<!-- KILN_ADMOB_PLUGIN_AND_APPLICATION_ID -->", admob.as_str()));
        }
        let config = render(&self.read_template("Cordova/config.xml")?, &substitutions);

        Ok(vec![
            self.write("config.xml", &config)?,
            self.write("package.json", &self.render_package_json("Cordova/package.json")?)?,
        ])
    }

    // ── Cocos2d ─────────────────────────────────────────────────────────

    fn cocos2d(
        &self,
        profile: &TargetProfile,
        includes: &[String],
        diagnostics: &mut Diagnostics,
    ) -> ExportResult<Vec<PathBuf>> {
        let mut written = vec![
            self.copy("Cocos2d/main.js", "main.js")?,
            self.copy("Cocos2d/cocos2d-js-v3.10.js", "cocos2d-js-v3.10.js")?,
        ];

        let mut include_files = String::new();
        for include in includes {
            let relative = format!("{}/{include}", profile.includes_dir);
            if !self.fs.is_file(&self.export_path.join(&relative)) {
                diagnostics.warn(
                    DiagnosticCode::MISSING_INCLUDE_FILE,
                    "script not found; left out of project.json",
                    relative.clone(),
                );
                continue;
            }
            if !include_files.is_empty() {
                include_files.push_str(", ");
            }
            include_files.push_str(&format!("\"{relative}\"\n"));
        }
        let show_fps = if profile.is_preview { "true" } else { "false" };
        let project_json = render(
            &self.read_template("Cocos2d/project.json")?,
            &[
                ("// KILN_INCLUDE_FILES", include_files.as_str()),
                ("/*KILN_SHOW_FPS*/", show_fps),
            ],
        );
        written.push(self.write("project.json", &project_json)?);
        Ok(written)
    }
}

/// Escape text for an XML attribute or element.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the entry point of `profile` into its web root.
pub fn render_entry_point(
    fs: &dyn FileSystem,
    profile: &TargetProfile,
    runtime_dir: &Path,
    export_path: &Path,
    includes: &[String],
    diagnostics: &mut Diagnostics,
) -> ExportResult<PathBuf> {
    let template_path = runtime_dir.join(profile.index_template);
    let template = fs
        .read_to_string(&template_path)
        .map_err(|source| ExportError::Template {
            path: template_path,
            source,
        })?;

    let web_root = profile.web_root_in(export_path);
    let listed: &[String] = if profile.index_includes { includes } else { &[] };
    let additional_spec = if profile.is_preview {
        "kiln.runtimeGameOptions"
    } else {
        ""
    };
    let html = complete_index_file(fs, &template, &web_root, listed, additional_spec, diagnostics);

    let path = web_root.join("index.html");
    fs.write(&path, &html).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::debug!("Wrote entry point {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_names_round_trip_through_from_str() {
        for target in Target::ALL {
            assert_eq!(target.as_str().parse::<Target>().unwrap(), target);
        }
        assert!("flash".parse::<Target>().is_err());
    }

    #[test]
    fn profiles_keep_exactly_one_renderer() {
        for target in Target::ALL {
            let profile = target.profile();
            assert_ne!(profile.renderer, profile.renderer.other());
        }
        assert_eq!(Target::Cocos2d.profile().renderer, Renderer::Cocos);
        assert_eq!(Target::Html5.profile().renderer, Renderer::Pixi);
    }

    #[test]
    fn only_preview_is_a_preview() {
        let previews: Vec<Target> = Target::ALL
            .into_iter()
            .filter(|t| t.profile().is_preview)
            .collect();
        assert_eq!(previews, vec![Target::Preview]);
        assert!(Target::Preview.profile().websocket_debugger_client);
        assert!(Target::Preview.profile().force_splash_off);
    }

    #[test]
    fn packaged_targets_use_their_web_root() {
        let export = Path::new("/out");
        assert_eq!(Target::Cordova.profile().web_root_in(export), Path::new("/out/www"));
        assert_eq!(Target::Electron.profile().web_root_in(export), Path::new("/out/app"));
        assert_eq!(Target::Cocos2d.profile().includes_dir_in(export), Path::new("/out/src"));
    }

    #[test]
    fn xml_escaping() {
        assert_eq!(escape_xml("Tom & \"Jerry\" <3"), "Tom &amp; &quot;Jerry&quot; &lt;3");
    }
}
