//! Compatibility shims for renamed runtime lifecycle methods.
//!
//! After a method is generated, every shim whose `trigger` equals the
//! method's mangled name appends its code right after the method. New
//! renames are handled by adding a row to [`COMPATIBILITY_SHIMS`].

use crate::template::render;

/// One compatibility rule.
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityShim {
    /// Mangled method name that activates the shim.
    pub trigger: &'static str,
    /// Produces the shim code from `(code_namespace, class_name)`.
    pub generate: fn(&str, &str) -> String,
}

/// Shims applied by default.
pub const COMPATIBILITY_SHIMS: &[CompatibilityShim] = &[CompatibilityShim {
    trigger: "onOwnerRemovedFromScene",
    generate: on_destroy_to_deprecated_on_owner_removed_from_scene,
}];

const ON_DESTROY_REDIRECT: &str = "
{{CODE_NAMESPACE}}.{{RUNTIME_BEHAVIOR_CLASSNAME}}.prototype.onDestroy = function() {
  // Redirect call to onOwnerRemovedFromScene (the old name of onDestroy)
  if (this.onOwnerRemovedFromScene) this.onOwnerRemovedFromScene();
};
";

/// `onDestroy` used to be called `onOwnerRemovedFromScene`: behaviors still
/// defining the old name get an `onDestroy` forwarding to it.
pub fn on_destroy_to_deprecated_on_owner_removed_from_scene(
    code_namespace: &str,
    class_name: &str,
) -> String {
    render(
        ON_DESTROY_REDIRECT,
        &[
            ("{{CODE_NAMESPACE}}", code_namespace),
            ("{{RUNTIME_BEHAVIOR_CLASSNAME}}", class_name),
        ],
    )
}

/// Shims of `table` triggered by `method_name`, in table order.
pub fn shims_for<'t>(
    table: &'t [CompatibilityShim],
    method_name: &'t str,
) -> impl Iterator<Item = &'t CompatibilityShim> + 't {
    table.iter().filter(move |shim| shim.trigger == method_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_triggers_on_old_destroy_name() {
        let matched: Vec<_> = shims_for(COMPATIBILITY_SHIMS, "onOwnerRemovedFromScene").collect();
        assert_eq!(matched.len(), 1);
        assert!(shims_for(COMPATIBILITY_SHIMS, "onDestroy").next().is_none());
    }

    #[test]
    fn redirect_targets_the_class_prototype() {
        let code = on_destroy_to_deprecated_on_owner_removed_from_scene("ns", "Beh");
        assert!(code.contains("ns.Beh.prototype.onDestroy = function() {"));
        assert!(code.contains("if (this.onOwnerRemovedFromScene) this.onOwnerRemovedFromScene();"));
    }
}
