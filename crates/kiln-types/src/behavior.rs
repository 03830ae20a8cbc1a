//! Events-based behavior definitions.
//!
//! A behavior is declared inside an extension as a list of typed properties
//! and a list of events functions. Declaration order is preserved everywhere
//! because generated code follows it.

use serde::{Deserialize, Serialize};

// ══════════════════════════════════════════════════════════════════════════════
// Extensions
// ══════════════════════════════════════════════════════════════════════════════

/// An extension bundling events-based behaviors under one name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsFunctionsExtension {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub events_based_behaviors: Vec<EventsBasedBehavior>,
}

impl EventsFunctionsExtension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Look up a behavior by name.
    pub fn behavior(&self, name: &str) -> Option<&EventsBasedBehavior> {
        self.events_based_behaviors.iter().find(|b| b.name == name)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Behaviors
// ══════════════════════════════════════════════════════════════════════════════

/// A reusable behavior: properties plus event-driven methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsBasedBehavior {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub property_descriptors: Vec<PropertyDescriptor>,
    #[serde(default)]
    pub events_functions: Vec<EventsFunction>,
}

impl EventsBasedBehavior {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            ..Self::default()
        }
    }

    /// Append a property (builder style).
    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.property_descriptors.push(property);
        self
    }

    /// Append an events function (builder style).
    pub fn with_function(mut self, function: EventsFunction) -> Self {
        self.events_functions.push(function);
        self
    }
}

/// One events function of a behavior.
///
/// `events` is opaque here: only the statement compiler interprets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsFunction {
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
}

impl EventsFunction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_events(mut self, events: Vec<serde_json::Value>) -> Self {
        self.events = events;
        self
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Properties
// ══════════════════════════════════════════════════════════════════════════════

/// A named, typed behavior property with a default value in text form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    /// Default value, stored as text whatever the type.
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub hidden: bool,
}

impl PropertyDescriptor {
    pub fn new(
        name: impl Into<String>,
        property_type: PropertyType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            property_type,
            value: value.into(),
            hidden: false,
        }
    }

    /// Mark the property as hidden (builder style).
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Property type. Type names the generator does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Choice,
    Unrecognized(String),
}

impl PropertyType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Choice => "Choice",
            Self::Unrecognized(name) => name,
        }
    }
}

impl From<String> for PropertyType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "String" => Self::String,
            "Number" => Self::Number,
            "Boolean" => Self::Boolean,
            "Choice" => Self::Choice,
            _ => Self::Unrecognized(name),
        }
    }
}

impl From<PropertyType> for String {
    fn from(ty: PropertyType) -> Self {
        ty.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_known_names() {
        assert_eq!(PropertyType::from("Number".to_string()), PropertyType::Number);
        assert_eq!(PropertyType::from("Choice".to_string()), PropertyType::Choice);
    }

    #[test]
    fn property_type_keeps_unrecognized_name() {
        let ty = PropertyType::from("Color".to_string());
        assert_eq!(ty, PropertyType::Unrecognized("Color".into()));
        assert_eq!(ty.as_str(), "Color");
    }

    #[test]
    fn property_descriptor_json_shape() {
        let json = r#"{"name":"speed","type":"Number","value":"200"}"#;
        let prop: PropertyDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(prop.property_type, PropertyType::Number);
        assert!(!prop.hidden);

        let out = serde_json::to_string(&prop).unwrap();
        assert!(out.contains("\"type\":\"Number\""));
        assert!(out.contains("\"hidden\":false"));
    }

    #[test]
    fn behavior_defaults_from_minimal_json() {
        let json = r#"{"name":"Mover"}"#;
        let behavior: EventsBasedBehavior = serde_json::from_str(json).unwrap();
        assert_eq!(behavior.name, "Mover");
        assert!(behavior.property_descriptors.is_empty());
        assert!(behavior.events_functions.is_empty());
    }

    #[test]
    fn extension_behavior_lookup() {
        let mut ext = EventsFunctionsExtension::new("Platforming");
        ext.events_based_behaviors
            .push(EventsBasedBehavior::new("Jumper", "Jumper behavior"));
        assert!(ext.behavior("Jumper").is_some());
        assert!(ext.behavior("Runner").is_none());
    }
}
