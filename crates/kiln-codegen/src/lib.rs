//! Kiln code generator: compiles events-based behaviors to runtime modules.
//!
//! # Architecture
//!
//! A behavior definition (typed properties + events functions) becomes one
//! self-contained script module that registers itself with the runtime:
//!
//! ## Module shape
//! - constructor `Namespace.Behavior(runtimeScene, behaviorData, owner)`
//!   initialising every property
//! - `kiln.registerBehavior("Extension::Behavior", ctor)`
//! - `updateFromBehaviorData(old, new)`, the hot-reload entry point
//! - `_get<Property>()` / `_set<Property>(value)` for every property
//! - one prototype method per events function, plus compatibility shims
//!
//! ## Leniency
//!
//! Generation never fails. Malformed input (unmapped function names,
//! unrecognized property types) is embedded as a visible marker in the
//! output and reported as a [`kiln_types::Diagnostic`]; [`lint`] finds the
//! same markers in any generated text.
//!
//! Statement-level compilation of events is delegated to an
//! [`EventsCodeGenerator`].

pub mod behavior;
pub mod compat;
pub mod events;
pub mod js;
pub mod lint;
pub mod property;
pub mod template;

pub use behavior::{
    behavior_code_namespace, behavior_method_mangled_names, BehaviorCodeGenerator,
    GeneratedModule, UNKNOWN_FUNCTION_SENTINEL,
};
pub use compat::{CompatibilityShim, COMPATIBILITY_SHIMS};
pub use events::{layout_code_namespace, EventsCodeGenerator, FunctionCode, InlineCodeGenerator};
pub use lint::lint_generated;
pub use template::render;
