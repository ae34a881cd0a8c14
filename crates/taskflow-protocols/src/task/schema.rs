//! Task configuration schema.
//!
//! A JSON-Schema-like description of what a task accepts. It is pure data so
//! the dashboard can render configuration forms from it, and the validation
//! engine compiles it into a real JSON Schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON type of a configuration property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

/// Description of one configuration property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// JSON type. `None` accepts any JSON value.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Format hint (`uri`, `email`). Checked by the owning task, not by the
    /// schema engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,
}

impl PropertySchema {
    pub fn new(property_type: PropertyType) -> Self {
        Self::with_type(Some(property_type))
    }

    /// Property accepting any JSON value.
    pub fn any() -> Self {
        Self::with_type(None)
    }

    fn with_type(property_type: Option<PropertyType>) -> Self {
        Self {
            property_type,
            title: None,
            description: None,
            default: None,
            enum_values: None,
            minimum: None,
            maximum: None,
            format: None,
            examples: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::new(PropertyType::String)
    }

    pub fn integer() -> Self {
        Self::new(PropertyType::Integer)
    }

    pub fn number() -> Self {
        Self::new(PropertyType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(PropertyType::Boolean)
    }

    pub fn object() -> Self {
        Self::new(PropertyType::Object)
    }

    pub fn array() -> Self {
        Self::new(PropertyType::Array)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restrict the property to a fixed set of values.
    pub fn one_of<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Inclusive numeric bounds.
    pub fn range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn example(mut self, example: impl Into<Value>) -> Self {
        self.examples.push(example.into());
        self
    }
}

/// Declarative description of a task's accepted configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfigSchema {
    #[serde(rename = "type", default = "object_type")]
    pub schema_type: String,

    pub title: String,

    pub description: String,

    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,
}

fn object_type() -> String {
    "object".to_string()
}

impl TaskConfigSchema {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            schema_type: object_type(),
            title: title.into(),
            description: description.into(),
            properties: BTreeMap::new(),
            required: Vec::new(),
            examples: Vec::new(),
        }
    }

    /// Add an optional property.
    pub fn property(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Add a property and mark it as required.
    pub fn required_property(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, schema);
        self
    }

    /// Add a representative configuration example.
    pub fn example(mut self, example: Value) -> Self {
        self.examples.push(example);
        self
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Default value declared for a property, if any.
    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.properties.get(name).and_then(|p| p.default.as_ref())
    }

    /// Render as a JSON Schema document.
    pub fn to_json_schema(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({
                "type": "object",
                "properties": {},
                "required": self.required,
            })
        })
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
