//! Addressable units of configuration

use crate::path::ElemPath;
use crate::value::{Value, ValueMap};
use serde::{Deserialize, Serialize};

/// A named unit of configuration as held by an entity store
///
/// `value` is the artifact's field tree; for analytics artifacts it carries
/// the raw `definition` text on fetch and the encoded one on deploy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    id: ElemPath,
    kind: String,
    value: Value,
}

impl Artifact {
    /// New artifact
    #[must_use]
    pub fn new(id: ElemPath, kind: impl Into<String>, value: Value) -> Self {
        Self {
            id,
            kind: kind.into(),
            value,
        }
    }

    /// Fully qualified id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ElemPath {
        &self.id
    }

    /// Artifact kind (`dataset`, `workbook`, ...)
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Field tree
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Top-level fields; empty when the value is not an object
    #[must_use]
    pub fn fields(&self) -> ValueMap {
        self.value.as_object().cloned().unwrap_or_default()
    }

    /// Top-level field
    #[inline]
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.value.get(name)
    }

    /// Same id and kind, new value
    #[must_use]
    pub fn with_value(&self, value: Value) -> Self {
        Self::new(self.id.clone(), self.kind.clone(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_accessors() {
        let id: ElemPath = "netsuite.dataset.instance.sales".parse().unwrap();
        let artifact = Artifact::new(
            id.clone(),
            "dataset",
            Value::object([("scriptid", Value::str("custdataset1"))]),
        );
        assert_eq!(artifact.id(), &id);
        assert_eq!(artifact.kind(), "dataset");
        assert_eq!(artifact.field("scriptid"), Some(&Value::str("custdataset1")));
        assert_eq!(artifact.fields().len(), 1);

        let replaced = artifact.with_value(Value::empty_object());
        assert_eq!(replaced.id(), &id);
        assert!(replaced.fields().is_empty());
    }
}
