//! Statement-level events compilation.
//!
//! Turning events into script statements is the job of an
//! [`EventsCodeGenerator`]. Behavior and layout generation only call through
//! this trait, and merge the include files each call reports.
//!
//! [`InlineCodeGenerator`] is the implementation shipped with the workspace:
//! it compiles inline-code events (`{"type": "JsCode", "inlineCode": …}`)
//! and walks nested `events` arrays, ignoring every other event kind.

use kiln_types::{EventsFunction, Layout, Project};

use crate::js::mangle_name;
use crate::template::render;

/// Code produced for one function or layout, with the includes it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionCode {
    pub code: String,
    pub includes: Vec<String>,
}

/// Compiles events to script code.
pub trait EventsCodeGenerator: Send + Sync {
    /// Compile the events of a behavior function into a method assigned to
    /// `qualified_name`, using `code_namespace` for any helper it declares.
    fn generate_behavior_function(
        &self,
        project: &Project,
        function: &EventsFunction,
        code_namespace: &str,
        qualified_name: &str,
        for_runtime: bool,
    ) -> FunctionCode;

    /// Compile the events of a layout into its complete code file.
    fn generate_layout_code(
        &self,
        project: &Project,
        layout: &Layout,
        for_runtime: bool,
    ) -> FunctionCode;
}

/// Namespace holding a layout's generated code.
pub fn layout_code_namespace(layout_name: &str) -> String {
    format!("kiln.{}Code", mangle_name(layout_name))
}

// ══════════════════════════════════════════════════════════════════════════════
// InlineCodeGenerator
// ══════════════════════════════════════════════════════════════════════════════

const BEHAVIOR_FUNCTION: &str = "
{{FUNCTION_CODE_NAMESPACE}} = {};

{{FUNCTION_QUALIFIED_NAME}} = function() {
var that = this;
var runtimeScene = this._runtimeScene;
{{EVENTS_CODE}}
};
";

const LAYOUT_CODE: &str = "{{LAYOUT_CODE_NAMESPACE}} = {};

{{LAYOUT_CODE_NAMESPACE}}.func = function(runtimeScene) {
runtimeScene.getOnceTriggers().startNewFrame();
{{EVENTS_CODE}}
return;
}
";

/// Compiles inline-code events only.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineCodeGenerator;

impl InlineCodeGenerator {
    pub fn new() -> Self {
        Self
    }

    fn compile_events(
        events: &[serde_json::Value],
        origin: &str,
        for_runtime: bool,
        out: &mut FunctionCode,
    ) {
        for event in events {
            if event.get("type").and_then(|t| t.as_str()) == Some("JsCode") {
                if !for_runtime {
                    out.code.push_str(&format!("// Inline code from {origin}\n"));
                }
                if let Some(code) = event.get("inlineCode").and_then(|c| c.as_str()) {
                    out.code.push_str(code);
                    if !code.ends_with('\n') {
                        out.code.push('\n');
                    }
                }
                if let Some(files) = event.get("includeFiles").and_then(|f| f.as_array()) {
                    out.includes
                        .extend(files.iter().filter_map(|f| f.as_str()).map(String::from));
                }
            }
            if let Some(sub_events) = event.get("events").and_then(|e| e.as_array()) {
                Self::compile_events(sub_events, origin, for_runtime, out);
            }
        }
    }
}

impl EventsCodeGenerator for InlineCodeGenerator {
    fn generate_behavior_function(
        &self,
        _project: &Project,
        function: &EventsFunction,
        code_namespace: &str,
        qualified_name: &str,
        for_runtime: bool,
    ) -> FunctionCode {
        let mut body = FunctionCode::default();
        Self::compile_events(&function.events, &function.name, for_runtime, &mut body);
        let code = render(
            BEHAVIOR_FUNCTION,
            &[
                ("{{FUNCTION_CODE_NAMESPACE}}", code_namespace),
                ("{{FUNCTION_QUALIFIED_NAME}}", qualified_name),
                ("{{EVENTS_CODE}}", body.code.trim_end()),
            ],
        );
        FunctionCode {
            code,
            includes: body.includes,
        }
    }

    fn generate_layout_code(
        &self,
        _project: &Project,
        layout: &Layout,
        for_runtime: bool,
    ) -> FunctionCode {
        let mut body = FunctionCode::default();
        Self::compile_events(&layout.events, &layout.name, for_runtime, &mut body);
        let namespace = layout_code_namespace(&layout.name);
        let code = render(
            LAYOUT_CODE,
            &[
                ("{{LAYOUT_CODE_NAMESPACE}}", namespace.as_str()),
                ("{{EVENTS_CODE}}", body.code.trim_end()),
            ],
        );
        FunctionCode {
            code,
            includes: body.includes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compiles_inline_code_and_reports_includes() {
        let layout = Layout::new("Main Scene").with_events(vec![
            json!({"type": "Standard"}),
            json!({
                "type": "JsCode",
                "inlineCode": "runtimeScene.setBackgroundColor(0, 0, 0);",
                "includeFiles": ["extensions/tween.js"]
            }),
        ]);
        let out = InlineCodeGenerator.generate_layout_code(&Project::new("P"), &layout, true);
        assert!(out.code.starts_with("kiln.Main_32SceneCode = {};"));
        assert!(out.code.contains("runtimeScene.setBackgroundColor(0, 0, 0);"));
        assert!(!out.code.contains("// Inline code from"));
        assert_eq!(out.includes, vec!["extensions/tween.js"]);
    }

    #[test]
    fn walks_nested_events() {
        let function = EventsFunction::new("doStepPreEvents").with_events(vec![json!({
            "type": "Standard",
            "events": [{"type": "JsCode", "inlineCode": "that.tick();"}]
        })]);
        let out = InlineCodeGenerator.generate_behavior_function(
            &Project::new("P"),
            &function,
            "ns.Beh.prototype.doStepPreEventsContext",
            "ns.Beh.prototype.doStepPreEvents",
            false,
        );
        assert!(out.code.contains("ns.Beh.prototype.doStepPreEventsContext = {};"));
        assert!(out.code.contains("ns.Beh.prototype.doStepPreEvents = function() {"));
        assert!(out.code.contains("// Inline code from doStepPreEvents\nthat.tick();"));
        assert!(out.includes.is_empty());
    }
}
