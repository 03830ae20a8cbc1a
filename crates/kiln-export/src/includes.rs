//! Engine include manifests and target filtering.
//!
//! Includes are paths relative to `<runtime root>/Runtime`, except generated
//! code, which is referenced by absolute path until materialization.

use std::collections::BTreeSet;

use kiln_types::{IncludeSet, Project};

// ══════════════════════════════════════════════════════════════════════════════
// Manifests
// ══════════════════════════════════════════════════════════════════════════════

const CORE_RUNTIME: &[&str] = &[
    "libs/jshashtable.js",
    "kiln.js",
    "kiln-splash-image.js",
    "libs/hshg.js",
    "libs/rbush.js",
    "inputmanager.js",
    "jsonmanager.js",
    "timemanager.js",
    "runtimeobject.js",
    "profiler.js",
    "runtimescene.js",
    "scenestack.js",
    "polygon.js",
    "force.js",
    "layer.js",
    "timer.js",
    "runtimegame.js",
    "variable.js",
    "variablescontainer.js",
    "oncetriggers.js",
    "runtimebehavior.js",
    "spriteruntimeobject.js",
];

const EVENTS_TOOLS: &[&str] = &[
    "events-tools/commontools.js",
    "events-tools/runtimescenetools.js",
    "events-tools/inputtools.js",
    "events-tools/objecttools.js",
    "events-tools/cameratools.js",
    "events-tools/soundtools.js",
    "events-tools/storagetools.js",
    "events-tools/stringtools.js",
    "events-tools/windowtools.js",
    "events-tools/networktools.js",
];

const DEBUGGER_CLIENT: &[&str] = &[
    "websocket-debugger-client/hot-reloader.js",
    "websocket-debugger-client/websocket-debugger-client.js",
];

const PIXI_RENDERERS: &[&str] = &[
    "pixi-renderers/pixi.js",
    "pixi-renderers/pixi-filters-tools.js",
    "pixi-renderers/runtimegame-pixi-renderer.js",
    "pixi-renderers/runtimescene-pixi-renderer.js",
    "pixi-renderers/layer-pixi-renderer.js",
    "pixi-renderers/pixi-image-manager.js",
    "pixi-renderers/spriteruntimeobject-pixi-renderer.js",
    "pixi-renderers/loadingscreen-pixi-renderer.js",
    "howler-sound-manager/howler.min.js",
    "howler-sound-manager/howler-sound-manager.js",
    "fontfaceobserver-font-manager/fontfaceobserver.js",
    "fontfaceobserver-font-manager/fontfaceobserver-font-manager.js",
];

const COCOS_RENDERERS: &[&str] = &[
    "cocos-renderers/cocos-director-manager.js",
    "cocos-renderers/cocos-image-manager.js",
    "cocos-renderers/cocos-tools.js",
    "cocos-renderers/layer-cocos-renderer.js",
    "cocos-renderers/loadingscreen-cocos-renderer.js",
    "cocos-renderers/runtimegame-cocos-renderer.js",
    "cocos-renderers/runtimescene-cocos-renderer.js",
    "cocos-renderers/spriteruntimeobject-cocos-renderer.js",
    "cocos-sound-manager/cocos-sound-manager.js",
    "fontfaceobserver-font-manager/fontfaceobserver.js",
    "fontfaceobserver-font-manager/fontfaceobserver-font-manager.js",
];

/// Which optional manifests [`add_libs_include`] inserts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibsOptions {
    pub pixi_renderers: bool,
    pub cocos_renderers: bool,
    pub websocket_debugger_client: bool,
}

/// Insert the engine manifest: core runtime, events tools, then the
/// debugger bridge and every enabled renderer.
pub fn add_libs_include(includes: &mut IncludeSet, options: LibsOptions) {
    includes.extend(CORE_RUNTIME.iter().copied());
    includes.extend(EVENTS_TOOLS.iter().copied());
    if options.websocket_debugger_client {
        includes.extend(DEBUGGER_CLIENT.iter().copied());
    }
    if options.pixi_renderers {
        includes.extend(Renderer::Pixi.manifest().iter().copied());
    }
    if options.cocos_renderers {
        includes.extend(Renderer::Cocos.manifest().iter().copied());
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Renderers
// ══════════════════════════════════════════════════════════════════════════════

/// A rendering backend of the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Renderer {
    Pixi,
    Cocos,
}

impl Renderer {
    /// Files loaded when this renderer is enabled.
    pub fn manifest(self) -> &'static [&'static str] {
        match self {
            Self::Pixi => PIXI_RENDERERS,
            Self::Cocos => COCOS_RENDERERS,
        }
    }

    /// Substrings identifying files that only make sense with this renderer.
    pub fn exclusion_markers(self) -> &'static [&'static str] {
        match self {
            Self::Pixi => &["pixi-renderer", "pixi-filter"],
            Self::Cocos => &["cocos-renderer", "cocos-shader"],
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Pixi => Self::Cocos,
            Self::Cocos => Self::Pixi,
        }
    }
}

/// Remove every include belonging to `renderer`. Returns the removed paths.
pub fn remove_renderer_includes(includes: &mut IncludeSet, renderer: Renderer) -> Vec<String> {
    includes.filter_out(renderer.exclusion_markers())
}

// ══════════════════════════════════════════════════════════════════════════════
// Effects
// ══════════════════════════════════════════════════════════════════════════════

/// Script of every layer effect type used in the project, sorted.
pub fn effect_includes(project: &Project) -> Vec<String> {
    project
        .layouts
        .iter()
        .flat_map(|layout| &layout.layers)
        .flat_map(|layer| &layer.effects)
        .filter(|effect| !effect.effect_type.is_empty())
        .map(|effect| format!("effects/{}.js", effect.effect_type.to_lowercase()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
