//! Symbolic references to fields of other artifacts

use crate::path::ElemPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pointer to a field of another artifact
///
/// Serializes as `{"$ref": "<dotted path>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    #[serde(rename = "$ref")]
    target: ElemPath,
}

impl Reference {
    /// Reference to `target`
    #[inline]
    #[must_use]
    pub fn new(target: ElemPath) -> Self {
        Self { target }
    }

    /// Full name of the referenced field
    #[inline]
    #[must_use]
    pub fn target(&self) -> &ElemPath {
        &self.target
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ref:{}", self.target)
    }
}
