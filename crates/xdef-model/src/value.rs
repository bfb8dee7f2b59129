//! Decoded, schema-shaped values

use crate::reference::Reference;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use serde_json::Number;

/// Ordered fields of an object value
pub type ValueMap = IndexMap<String, Value>;

/// A decoded definition value
///
/// `Null` and an empty `List` double as the placeholders the encoder
/// writes for absent scalars and absent arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value
    Null,
    /// Boolean
    Bool(bool),
    /// Number
    Number(Number),
    /// String
    Str(String),
    /// Ordered list
    List(Vec<Value>),
    /// Symbolic reference to another artifact's field
    Reference(Reference),
    /// Object with ordered fields
    Object(ValueMap),
}

impl Value {
    /// Empty object
    #[inline]
    #[must_use]
    pub fn empty_object() -> Self {
        Self::Object(ValueMap::new())
    }

    /// Object from `(key, value)` pairs, in order
    #[must_use]
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// String value
    #[inline]
    #[must_use]
    pub fn str(text: impl Into<String>) -> Self {
        Self::Str(text.into())
    }

    /// True for the null placeholder and the empty list
    #[inline]
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        match self {
            Self::Null => true,
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// True for an empty object or an empty list
    #[inline]
    #[must_use]
    pub fn is_empty_container(&self) -> bool {
        match self {
            Self::Object(map) => map.is_empty(),
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Short name of the value's shape, for messages
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Reference(_) => "reference",
            Self::Object(_) => "object",
        }
    }

    /// Fields, if this is an object
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ValueMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Mutable fields, if this is an object
    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut ValueMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Items, if this is a list
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text, if this is a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Reference, if this is one
    #[inline]
    #[must_use]
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    /// Field of an object
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    /// Navigate nested objects and lists; list positions are numeric segments
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self;
        for segment in path {
            current = match current {
                Self::Object(map) => map.get(*segment)?,
                Self::List(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Wire text of a scalar (`Bool`, `Number`, `Str`)
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(n) => Some(n.to_string()),
            Self::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Number whose rendering is exactly `text`
///
/// Text such as `007`, `+5`, `1e5` or `NaN` is not canonical and yields
/// `None`, so it can stay a string without losing its spelling.
#[must_use]
pub fn canonical_number(text: &str) -> Option<Number> {
    let number = if let Ok(i) = text.parse::<i64>() {
        Number::from(i)
    } else if let Ok(u) = text.parse::<u64>() {
        Number::from(u)
    } else {
        Number::from_f64(text.parse::<f64>().ok()?)?
    };
    (number.to_string() == text).then_some(number)
}

/// Boolean spelled exactly `true` or `false`
#[inline]
#[must_use]
pub fn canonical_bool(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Number(Number::from(i))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Str(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Str(text)
    }
}

impl From<Reference> for Value {
    fn from(reference: Reference) -> Self {
        Self::Reference(reference)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Self::Object(map)
    }
}
