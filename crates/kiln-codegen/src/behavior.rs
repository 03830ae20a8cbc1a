//! Behavior module generator.
//!
//! Orchestrates generation of one behavior module:
//! 1. Fold property codegen over the properties (init, accessors, hot-reload)
//! 2. Fold the events code generator over the events functions, merging the
//!    includes each function reports and appending compatibility shims
//! 3. Render the module skeleton around the fragments

use std::collections::HashMap;

use kiln_types::{
    Diagnostic, DiagnosticCode, Diagnostics, EventsBasedBehavior, IncludeSet, Project,
};

use crate::compat::{shims_for, CompatibilityShim, COMPATIBILITY_SHIMS};
use crate::events::EventsCodeGenerator;
use crate::js::{comment_safe, mangle_name, quote_string};
use crate::property::generate_property_code;
use crate::template::render;

/// Method name used when an events function has no mangled name.
pub const UNKNOWN_FUNCTION_SENTINEL: &str = "UNKNOWN_FUNCTION_missing_mangled_name";

/// Runtime lifecycle methods: their names are part of the runtime contract
/// and are never mangled.
pub const LIFECYCLE_METHODS: &[&str] = &[
    "onCreated",
    "onActivate",
    "onDeActivate",
    "doStepPreEvents",
    "doStepPostEvents",
    "onDestroy",
    "onOwnerRemovedFromScene",
];

const BEHAVIOR_MODULE: &str = "{{CODE_NAMESPACE}} = {{CODE_NAMESPACE}} || {};

/**
 * Behavior generated from {{BEHAVIOR_FULL_NAME}}
 * @class {{RUNTIME_BEHAVIOR_CLASSNAME}}
 * @extends kiln.RuntimeBehavior
 * @constructor
 */
{{CODE_NAMESPACE}}.{{RUNTIME_BEHAVIOR_CLASSNAME}} = function(runtimeScene, behaviorData, owner)
{
    kiln.RuntimeBehavior.call(this, runtimeScene, behaviorData, owner);
    this._runtimeScene = runtimeScene;

    this._behaviorData = {};
{{INITIALIZE_PROPERTIES_CODE}}};

{{CODE_NAMESPACE}}.{{RUNTIME_BEHAVIOR_CLASSNAME}}.prototype = Object.create( kiln.RuntimeBehavior.prototype );
kiln.registerBehavior({{BEHAVIOR_TYPE}}, {{CODE_NAMESPACE}}.{{RUNTIME_BEHAVIOR_CLASSNAME}});

// Hot-reload:
{{CODE_NAMESPACE}}.{{RUNTIME_BEHAVIOR_CLASSNAME}}.prototype.updateFromBehaviorData = function(oldBehaviorData, newBehaviorData) {
{{UPDATE_FROM_BEHAVIOR_DATA_CODE}}
    return true;
};

// Properties:
{{PROPERTIES_CODE}}
// Methods:
{{METHODS_CODE}}";

// ══════════════════════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════════════════════

/// A generated module and everything that was degraded while producing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedModule {
    pub code: String,
    pub diagnostics: Diagnostics,
}

impl GeneratedModule {
    /// True when nothing had to be replaced by an error marker.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Default namespace of a behavior's generated code.
pub fn behavior_code_namespace(extension_name: &str, behavior_name: &str) -> String {
    format!(
        "kiln.evtsExt__{}__{}",
        mangle_name(extension_name),
        mangle_name(behavior_name)
    )
}

/// Default events-function → method name mapping for a behavior.
///
/// Lifecycle methods keep their name; anything else is mangled.
pub fn behavior_method_mangled_names(behavior: &EventsBasedBehavior) -> HashMap<String, String> {
    behavior
        .events_functions
        .iter()
        .map(|function| {
            let mangled = if LIFECYCLE_METHODS.contains(&function.name.as_str()) {
                function.name.clone()
            } else {
                mangle_name(&function.name)
            };
            (function.name.clone(), mangled)
        })
        .collect()
}

/// Generates behavior modules for one project.
pub struct BehaviorCodeGenerator<'a> {
    project: &'a Project,
    events: &'a dyn EventsCodeGenerator,
    shims: &'a [CompatibilityShim],
}

impl<'a> BehaviorCodeGenerator<'a> {
    pub fn new(project: &'a Project, events: &'a dyn EventsCodeGenerator) -> Self {
        Self {
            project,
            events,
            shims: COMPATIBILITY_SHIMS,
        }
    }

    /// Replace the compatibility shim table.
    pub fn with_shims(mut self, shims: &'a [CompatibilityShim]) -> Self {
        self.shims = shims;
        self
    }

    /// Generate the complete module of `behavior`.
    ///
    /// Includes reported while compiling events functions are added to
    /// `include_files`. Never fails: problems are embedded as markers in
    /// the code and listed in [`GeneratedModule::diagnostics`].
    pub fn generate_complete_code(
        &self,
        extension_name: &str,
        behavior: &EventsBasedBehavior,
        code_namespace: &str,
        method_mangled_names: &HashMap<String, String>,
        include_files: &mut IncludeSet,
        for_runtime: bool,
    ) -> GeneratedModule {
        let class_name = behavior.name.as_str();
        let mut diagnostics = Diagnostics::new();

        let mut initialize_code = String::new();
        let mut properties_code = String::new();
        let mut update_code = String::new();
        for property in &behavior.property_descriptors {
            let fragment = generate_property_code(code_namespace, class_name, property);
            initialize_code.push_str(&fragment.initialization);
            properties_code.push_str(&fragment.accessors);
            update_code.push_str(&fragment.hot_reload);
            if let Some(diagnostic) = fragment.diagnostic {
                tracing::warn!("{}", diagnostic);
                diagnostics.push(diagnostic);
            }
        }

        let methods_code = self.generate_methods_code(
            behavior,
            code_namespace,
            method_mangled_names,
            include_files,
            for_runtime,
            &mut diagnostics,
        );

        let behavior_type = quote_string(&format!("{extension_name}::{}", behavior.name));
        let full_name = comment_safe(&behavior.full_name);
        let code = render(
            BEHAVIOR_MODULE,
            &[
                ("{{CODE_NAMESPACE}}", code_namespace),
                ("{{RUNTIME_BEHAVIOR_CLASSNAME}}", class_name),
                ("{{BEHAVIOR_FULL_NAME}}", full_name.as_str()),
                ("{{BEHAVIOR_TYPE}}", behavior_type.as_str()),
                ("{{INITIALIZE_PROPERTIES_CODE}}", initialize_code.as_str()),
                ("{{UPDATE_FROM_BEHAVIOR_DATA_CODE}}", update_code.trim_end_matches('\n')),
                ("{{PROPERTIES_CODE}}", properties_code.as_str()),
                ("{{METHODS_CODE}}", methods_code.as_str()),
            ],
        );

        tracing::debug!(
            "Generated behavior {}::{} ({} properties, {} functions)",
            extension_name,
            behavior.name,
            behavior.property_descriptors.len(),
            behavior.events_functions.len()
        );

        GeneratedModule { code, diagnostics }
    }

    fn generate_methods_code(
        &self,
        behavior: &EventsBasedBehavior,
        code_namespace: &str,
        method_mangled_names: &HashMap<String, String>,
        include_files: &mut IncludeSet,
        for_runtime: bool,
        diagnostics: &mut Diagnostics,
    ) -> String {
        let mut methods_code = String::new();
        for function in &behavior.events_functions {
            let method_name = match method_mangled_names.get(&function.name) {
                Some(name) => name.as_str(),
                None => {
                    let diagnostic = Diagnostic::warning(
                        DiagnosticCode::UNMAPPED_FUNCTION_NAME,
                        format!(
                            "no mangled name for events function `{}`; emitted as `{}`",
                            function.name, UNKNOWN_FUNCTION_SENTINEL
                        ),
                    )
                    .with_subject(format!("{}.{}", behavior.name, function.name));
                    tracing::warn!("{}", diagnostic);
                    diagnostics.push(diagnostic);
                    UNKNOWN_FUNCTION_SENTINEL
                }
            };

            let prototype = format!("{code_namespace}.{}.prototype.{method_name}", behavior.name);
            let method_namespace = format!("{prototype}Context");
            let generated = self.events.generate_behavior_function(
                self.project,
                function,
                &method_namespace,
                &prototype,
                for_runtime,
            );
            methods_code.push_str(&generated.code);
            include_files.extend(generated.includes);

            for shim in shims_for(self.shims, method_name) {
                methods_code.push_str(&(shim.generate)(code_namespace, &behavior.name));
            }
        }
        methods_code
    }
}
