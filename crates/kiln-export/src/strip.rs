//! Project stripping.
//!
//! Once code has been generated, the runtime only needs a project's data:
//! events, object groups and events-function bodies are dropped from the
//! exported document, as is the local path of the project file.

use kiln_types::Project;

/// Remove everything from `project` that only code generation reads.
pub fn strip_project_for_export(project: &mut Project) {
    project.project_file.clear();
    for layout in &mut project.layouts {
        layout.events.clear();
        layout.object_groups.clear();
    }
    for external_events in &mut project.external_events {
        external_events.events.clear();
    }
    for extension in &mut project.extensions {
        for behavior in &mut extension.events_based_behaviors {
            for function in &mut behavior.events_functions {
                function.events.clear();
            }
        }
    }
}
