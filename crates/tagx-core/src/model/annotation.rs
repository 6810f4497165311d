use serde::{Deserialize, Serialize};

/// A key/value annotation attached to a markup span
///
/// Values nest: lists hold values, maps hold further annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation name
    pub key: String,

    /// Annotation value
    pub value: AnnotationValue,
}

/// Typed annotation value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AnnotationValue {
    String(String),
    Number(f64),
    Boolean(bool),
    List(Vec<AnnotationValue>),
    Map(Vec<Annotation>),
    /// Reference to another markup by its annotated id
    Reference(String),
}

impl Annotation {
    /// Create an annotation from a key and a value
    pub fn new(key: impl Into<String>, value: AnnotationValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, AnnotationValue::String(value.into()))
    }

    pub fn number(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, AnnotationValue::Number(value))
    }

    pub fn boolean(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, AnnotationValue::Boolean(value))
    }

    pub fn list(key: impl Into<String>, items: Vec<AnnotationValue>) -> Self {
        Self::new(key, AnnotationValue::List(items))
    }

    pub fn map(key: impl Into<String>, entries: Vec<Annotation>) -> Self {
        Self::new(key, AnnotationValue::Map(entries))
    }

    pub fn reference(key: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(key, AnnotationValue::Reference(target.into()))
    }
}

impl AnnotationValue {
    /// Lowercase type name, as used in document descriptions and logs
    pub fn type_name(&self) -> &'static str {
        match self {
            AnnotationValue::String(_) => "string",
            AnnotationValue::Number(_) => "number",
            AnnotationValue::Boolean(_) => "boolean",
            AnnotationValue::List(_) => "list",
            AnnotationValue::Map(_) => "map",
            AnnotationValue::Reference(_) => "reference",
        }
    }
}

/// Format a number the way bracket notations expect: integral values lose ".0"
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
