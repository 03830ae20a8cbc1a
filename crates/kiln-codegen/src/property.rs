//! Per-property code fragments.
//!
//! Each property contributes three fragments to a behavior module:
//! 1. an initializer run by the constructor
//! 2. a getter/setter pair on the prototype (emitted even for hidden properties)
//! 3. a hot-reload update inside `updateFromBehaviorData`

use kiln_types::{Diagnostic, DiagnosticCode, PropertyDescriptor, PropertyType};

use crate::js::quote_string;
use crate::template::render;

/// Marker emitted in place of a default value whose type is unknown.
pub const UNRECOGNIZED_TYPE_MARKER: &str = "0 /* Error: property was of an unrecognized type */";

const INITIALIZE_FROM_DATA: &str = "    this._behaviorData.{{PROPERTY_NAME}} = behaviorData.{{PROPERTY_NAME}} !== undefined ? behaviorData.{{PROPERTY_NAME}} : {{DEFAULT_VALUE}};\n";

const INITIALIZE_FROM_DEFAULT: &str =
    "    this._behaviorData.{{PROPERTY_NAME}} = {{DEFAULT_VALUE}};\n";

const ACCESSORS: &str = "{{CODE_NAMESPACE}}.{{RUNTIME_BEHAVIOR_CLASSNAME}}.prototype.{{GETTER_NAME}} = function() {
    return this._behaviorData.{{PROPERTY_NAME}} !== undefined ? this._behaviorData.{{PROPERTY_NAME}} : {{DEFAULT_VALUE}};
};
{{CODE_NAMESPACE}}.{{RUNTIME_BEHAVIOR_CLASSNAME}}.prototype.{{SETTER_NAME}} = function(newValue) {
    this._behaviorData.{{PROPERTY_NAME}} = newValue;
};
";

const UPDATE_FROM_BEHAVIOR_DATA: &str = "    if (oldBehaviorData.{{PROPERTY_NAME}} !== newBehaviorData.{{PROPERTY_NAME}})
        this._behaviorData.{{PROPERTY_NAME}} = newBehaviorData.{{PROPERTY_NAME}};
";

/// All fragments generated for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyCode {
    pub initialization: String,
    pub accessors: String,
    pub hot_reload: String,
    /// Set when the default value could not be rendered for the property's type.
    pub diagnostic: Option<Diagnostic>,
}

/// Generate every fragment for `property` of the behavior class `class_name`.
pub fn generate_property_code(
    code_namespace: &str,
    class_name: &str,
    property: &PropertyDescriptor,
) -> PropertyCode {
    let diagnostic = match &property.property_type {
        PropertyType::Unrecognized(ty) => Some(
            Diagnostic::warning(
                DiagnosticCode::UNRECOGNIZED_PROPERTY_TYPE,
                format!("property `{}` has unrecognized type `{ty}`", property.name),
            )
            .with_subject(format!("{class_name}.{}", property.name)),
        ),
        _ => None,
    };

    PropertyCode {
        initialization: initialization_code(property),
        accessors: accessor_code(code_namespace, class_name, property),
        hot_reload: hot_reload_code(property),
        diagnostic,
    }
}

/// Constructor code setting the property's internal slot.
///
/// Hidden properties always start from the default value; visible ones read
/// the instance data and fall back to the default when the key is absent.
pub fn initialization_code(property: &PropertyDescriptor) -> String {
    let template = if property.hidden {
        INITIALIZE_FROM_DEFAULT
    } else {
        INITIALIZE_FROM_DATA
    };
    let default_value = default_value_code(property);
    render(
        template,
        &[
            ("{{PROPERTY_NAME}}", property.name.as_str()),
            ("{{DEFAULT_VALUE}}", default_value.as_str()),
        ],
    )
}

/// Getter and setter methods for the property.
pub fn accessor_code(
    code_namespace: &str,
    class_name: &str,
    property: &PropertyDescriptor,
) -> String {
    let default_value = default_value_code(property);
    let getter = getter_name(&property.name);
    let setter = setter_name(&property.name);
    render(
        ACCESSORS,
        &[
            ("{{CODE_NAMESPACE}}", code_namespace),
            ("{{RUNTIME_BEHAVIOR_CLASSNAME}}", class_name),
            ("{{GETTER_NAME}}", getter.as_str()),
            ("{{SETTER_NAME}}", setter.as_str()),
            ("{{PROPERTY_NAME}}", property.name.as_str()),
            ("{{DEFAULT_VALUE}}", default_value.as_str()),
        ],
    )
}

/// Hot-reload code: reassign the slot only when old and new data differ.
pub fn hot_reload_code(property: &PropertyDescriptor) -> String {
    render(
        UPDATE_FROM_BEHAVIOR_DATA,
        &[("{{PROPERTY_NAME}}", property.name.as_str())],
    )
}

/// Script expression for the property's default value.
pub fn default_value_code(property: &PropertyDescriptor) -> String {
    match &property.property_type {
        PropertyType::String | PropertyType::Choice => quote_string(&property.value),
        PropertyType::Number => format!("Number({}) || 0", quote_string(&property.value)),
        PropertyType::Boolean => {
            if property.value == "true" {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }
        PropertyType::Unrecognized(_) => UNRECOGNIZED_TYPE_MARKER.to_string(),
    }
}

pub fn getter_name(property_name: &str) -> String {
    format!("_get{property_name}")
}

pub fn setter_name(property_name: &str) -> String {
    format!("_set{property_name}")
}
