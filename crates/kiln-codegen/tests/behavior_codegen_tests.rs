//! Integration tests for the behavior module generator.
//!
//! Tests validate:
//! - One accessor pair per property, hidden or not
//! - Initializers of hidden vs visible properties
//! - Events-function delegation (namespaces, qualified names, includes)
//! - Compatibility shims driven by the rule table
//! - Lenient handling of unmapped names and unknown property types
//! - Deterministic output (same input → same text)

use std::collections::HashMap;
use std::sync::Mutex;

use kiln_codegen::compat::CompatibilityShim;
use kiln_codegen::{
    behavior_method_mangled_names, lint_generated, BehaviorCodeGenerator, EventsCodeGenerator,
    FunctionCode, GeneratedModule, InlineCodeGenerator, UNKNOWN_FUNCTION_SENTINEL,
};
use kiln_types::{
    DiagnosticCode, EventsBasedBehavior, EventsFunction, IncludeSet, Layout, Project,
    PropertyDescriptor, PropertyType,
};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Events code generator that records its calls and emits a marker method.
#[derive(Default)]
struct RecordingGenerator {
    calls: Mutex<Vec<(String, String, String, bool)>>,
    includes: Vec<String>,
}

impl RecordingGenerator {
    fn with_includes(includes: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            includes: includes.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn calls(&self) -> Vec<(String, String, String, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

impl EventsCodeGenerator for RecordingGenerator {
    fn generate_behavior_function(
        &self,
        _project: &Project,
        function: &EventsFunction,
        code_namespace: &str,
        qualified_name: &str,
        for_runtime: bool,
    ) -> FunctionCode {
        self.calls.lock().unwrap().push((
            function.name.clone(),
            code_namespace.to_string(),
            qualified_name.to_string(),
            for_runtime,
        ));
        FunctionCode {
            code: format!("\n{qualified_name} = function() {{ /* {} */ }};\n", function.name),
            includes: self.includes.clone(),
        }
    }

    fn generate_layout_code(&self, _project: &Project, _layout: &Layout, _for_runtime: bool) -> FunctionCode {
        FunctionCode::default()
    }
}

fn generate_with(
    events: &dyn EventsCodeGenerator,
    behavior: &EventsBasedBehavior,
    names: &HashMap<String, String>,
    includes: &mut IncludeSet,
) -> GeneratedModule {
    let project = Project::new("Test");
    BehaviorCodeGenerator::new(&project, events).generate_complete_code(
        "Ext",
        behavior,
        "kiln.evtsExt__Ext__Beh",
        names,
        includes,
        true,
    )
}

fn generate(behavior: &EventsBasedBehavior) -> GeneratedModule {
    let names = behavior_method_mangled_names(behavior);
    generate_with(&RecordingGenerator::default(), behavior, &names, &mut IncludeSet::new())
}

fn count_getters(code: &str) -> usize {
    code.matches(".prototype._get").count()
}

fn count_setters(code: &str) -> usize {
    code.matches(".prototype._set").count()
}

// ══════════════════════════════════════════════════════════════════════════════
// Properties
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_a_string_property_with_fallback() {
    let behavior = EventsBasedBehavior::new("Beh", "Labelled")
        .with_property(PropertyDescriptor::new("label", PropertyType::String, "hello"));
    let module = generate(&behavior);

    assert!(module.is_clean());
    assert!(module.code.contains(
        "this._behaviorData.label = behaviorData.label !== undefined ? behaviorData.label : \"hello\";"
    ));
    assert!(module
        .code
        .contains("kiln.evtsExt__Ext__Beh.Beh.prototype._getlabel = function() {"));
    assert!(module
        .code
        .contains("return this._behaviorData.label !== undefined ? this._behaviorData.label : \"hello\";"));
    assert!(module
        .code
        .contains("kiln.evtsExt__Ext__Beh.Beh.prototype._setlabel = function(newValue) {"));
    assert!(module.code.contains("this._behaviorData.label = newValue;"));
}

#[test]
fn accessor_count_matches_property_count_regardless_of_hidden() {
    let behavior = EventsBasedBehavior::new("Beh", "Mixed")
        .with_property(PropertyDescriptor::new("a", PropertyType::String, "x"))
        .with_property(PropertyDescriptor::new("b", PropertyType::Number, "2").hidden())
        .with_property(PropertyDescriptor::new("c", PropertyType::Boolean, "true").hidden())
        .with_property(PropertyDescriptor::new("d", PropertyType::Choice, "Left"));
    let module = generate(&behavior);

    assert_eq!(count_getters(&module.code), 4);
    assert_eq!(count_setters(&module.code), 4);
}

#[test]
fn no_properties_means_no_accessors() {
    let module = generate(&EventsBasedBehavior::new("Beh", "Bare"));
    assert_eq!(count_getters(&module.code), 0);
    assert_eq!(count_setters(&module.code), 0);
    assert!(module.code.contains("updateFromBehaviorData = function(oldBehaviorData, newBehaviorData) {"));
    assert!(module.code.contains("    return true;"));
}

#[test]
fn hidden_property_ignores_instance_data() {
    let behavior = EventsBasedBehavior::new("Beh", "Hidden")
        .with_property(PropertyDescriptor::new("secret", PropertyType::Number, "42").hidden());
    let module = generate(&behavior);

    assert!(module
        .code
        .contains("    this._behaviorData.secret = Number(\"42\") || 0;\n"));
    assert!(!module.code.contains(" behaviorData.secret"));
}

#[test]
fn hot_reload_block_lists_every_property_in_order() {
    let behavior = EventsBasedBehavior::new("Beh", "Reload")
        .with_property(PropertyDescriptor::new("first", PropertyType::String, ""))
        .with_property(PropertyDescriptor::new("second", PropertyType::String, "").hidden());
    let code = generate(&behavior).code;

    let first = code
        .find("if (oldBehaviorData.first !== newBehaviorData.first)")
        .expect("first property hot-reload");
    let second = code
        .find("if (oldBehaviorData.second !== newBehaviorData.second)")
        .expect("second property hot-reload");
    assert!(first < second);
}

#[test]
fn unrecognized_property_type_is_embedded_not_fatal() {
    let behavior = EventsBasedBehavior::new("Beh", "Odd").with_property(PropertyDescriptor::new(
        "tint",
        PropertyType::Unrecognized("Color".into()),
        "255;0;0",
    ));
    let module = generate(&behavior);

    assert!(!module.is_clean());
    assert_eq!(
        module.diagnostics.count(DiagnosticCode::UNRECOGNIZED_PROPERTY_TYPE),
        1
    );
    assert!(module
        .code
        .contains("0 /* Error: property was of an unrecognized type */"));
    assert_eq!(count_getters(&module.code), 1);
}

// ══════════════════════════════════════════════════════════════════════════════
// Methods
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn functions_are_delegated_in_declaration_order() {
    let behavior = EventsBasedBehavior::new("Beh", "Methods")
        .with_function(EventsFunction::new("onCreated"))
        .with_function(EventsFunction::new("Jump"));
    let names = behavior_method_mangled_names(&behavior);
    let events = RecordingGenerator::default();
    let module = generate_with(&events, &behavior, &names, &mut IncludeSet::new());

    let calls = events.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "onCreated");
    assert_eq!(
        calls[0].1,
        "kiln.evtsExt__Ext__Beh.Beh.prototype.onCreatedContext"
    );
    assert_eq!(calls[0].2, "kiln.evtsExt__Ext__Beh.Beh.prototype.onCreated");
    assert!(calls[0].3);
    assert_eq!(calls[1].2, "kiln.evtsExt__Ext__Beh.Beh.prototype.Jump");

    let created = module.code.find("prototype.onCreated = ").unwrap();
    let jump = module.code.find("prototype.Jump = ").unwrap();
    assert!(created < jump);
}

#[test]
fn function_includes_are_merged_into_accumulator() {
    let behavior = EventsBasedBehavior::new("Beh", "Includes")
        .with_function(EventsFunction::new("onCreated"))
        .with_function(EventsFunction::new("doStepPreEvents"));
    let names = behavior_method_mangled_names(&behavior);
    let events = RecordingGenerator::with_includes(&["extensions/a.js", "extensions/b.js"]);
    let mut includes: IncludeSet = ["runtimegame.js", "extensions/b.js"].into_iter().collect();

    generate_with(&events, &behavior, &names, &mut includes);

    assert_eq!(
        includes.as_slice(),
        ["runtimegame.js", "extensions/b.js", "extensions/a.js"]
    );
}

#[test]
fn unmapped_function_gets_sentinel_name() {
    let behavior =
        EventsBasedBehavior::new("Beh", "Unmapped").with_function(EventsFunction::new("Mystery"));
    let events = RecordingGenerator::default();
    let module = generate_with(&events, &behavior, &HashMap::new(), &mut IncludeSet::new());

    assert!(module
        .code
        .contains(&format!("Beh.prototype.{UNKNOWN_FUNCTION_SENTINEL} = function()")));
    assert_eq!(
        module.diagnostics.count(DiagnosticCode::UNMAPPED_FUNCTION_NAME),
        1
    );
    assert_eq!(
        lint_generated(&module.code, "behavior.js").count(DiagnosticCode::UNMAPPED_FUNCTION_NAME),
        1
    );
}

#[test]
fn scenario_c_legacy_destroy_hook_gets_redirect() {
    let behavior = EventsBasedBehavior::new("Beh", "Legacy")
        .with_function(EventsFunction::new("onOwnerRemovedFromScene"))
        .with_function(EventsFunction::new("doStepPreEvents"));
    let code = generate(&behavior).code;

    let canonical = code
        .find("Beh.prototype.onOwnerRemovedFromScene = function()")
        .expect("canonical method");
    let shim = code
        .find("Beh.prototype.onDestroy = function() {")
        .expect("compatibility redirect");
    let next = code
        .find("Beh.prototype.doStepPreEvents = function()")
        .expect("following method");
    assert!(canonical < shim && shim < next, "shim must follow its trigger");
    assert!(code.contains("if (this.onOwnerRemovedFromScene) this.onOwnerRemovedFromScene();"));
}

#[test]
fn modern_destroy_hook_gets_no_redirect() {
    let behavior =
        EventsBasedBehavior::new("Beh", "Modern").with_function(EventsFunction::new("onDestroy"));
    let code = generate(&behavior).code;
    assert_eq!(code.matches("prototype.onDestroy = function()").count(), 1);
}

fn custom_shim(code_namespace: &str, class_name: &str) -> String {
    format!("\n{code_namespace}.{class_name}.prototype.legacyTick = function() {{ this.tick(); }};\n")
}

#[test]
fn custom_shim_table_extends_without_touching_generator() {
    const SHIMS: &[CompatibilityShim] = &[CompatibilityShim {
        trigger: "tick",
        generate: custom_shim,
    }];
    let behavior = EventsBasedBehavior::new("Beh", "Custom")
        .with_function(EventsFunction::new("tick"))
        .with_function(EventsFunction::new("onOwnerRemovedFromScene"));
    let names = behavior_method_mangled_names(&behavior);
    let project = Project::new("Test");
    let events = RecordingGenerator::default();
    let module = BehaviorCodeGenerator::new(&project, &events)
        .with_shims(SHIMS)
        .generate_complete_code("Ext", &behavior, "ns", &names, &mut IncludeSet::new(), false);

    assert!(module.code.contains("ns.Beh.prototype.legacyTick = function()"));
    assert!(!module.code.contains("prototype.onDestroy"));
}

// ══════════════════════════════════════════════════════════════════════════════
// Whole module
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn generated_module_has_no_unresolved_placeholders() {
    let behavior = EventsBasedBehavior::new("Beh", "Full")
        .with_property(PropertyDescriptor::new("speed", PropertyType::Number, "100"))
        .with_property(PropertyDescriptor::new("active", PropertyType::Boolean, "false").hidden())
        .with_function(EventsFunction::new("doStepPreEvents"));
    let module = generate(&behavior);
    assert!(lint_generated(&module.code, "behavior.js").is_empty());
}

#[test]
fn inline_generator_produces_working_method_body() {
    let behavior = EventsBasedBehavior::new("Beh", "Inline").with_function(
        EventsFunction::new("doStepPreEvents").with_events(vec![serde_json::json!({
            "type": "JsCode",
            "inlineCode": "that._behaviorData.speed += 1;",
            "includeFiles": ["extensions/physics.js"]
        })]),
    );
    let names = behavior_method_mangled_names(&behavior);
    let mut includes = IncludeSet::new();
    let module = generate_with(&InlineCodeGenerator, &behavior, &names, &mut includes);

    assert!(module
        .code
        .contains("kiln.evtsExt__Ext__Beh.Beh.prototype.doStepPreEventsContext = {};"));
    assert!(module.code.contains("that._behaviorData.speed += 1;"));
    assert_eq!(includes.as_slice(), ["extensions/physics.js"]);
}

#[test]
fn generation_is_deterministic() {
    let behavior = EventsBasedBehavior::new("Beh", "Deterministic")
        .with_property(PropertyDescriptor::new("a", PropertyType::String, "x"))
        .with_property(PropertyDescriptor::new("b", PropertyType::Number, "1"))
        .with_function(EventsFunction::new("onCreated"))
        .with_function(EventsFunction::new("onOwnerRemovedFromScene"));
    let first = generate(&behavior).code;
    for i in 0..50 {
        assert_eq!(first, generate(&behavior).code, "Determinism failure at iteration {i}");
    }
}
