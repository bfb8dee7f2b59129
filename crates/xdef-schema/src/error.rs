//! Schema registry errors

use thiserror::Error;

/// Errors found while building a [`SchemaRegistry`](crate::SchemaRegistry)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Two types share a name
    #[error("type {0} is registered twice")]
    DuplicateType(String),

    /// A schema names a type that was never registered
    #[error("{referenced_by} refers to unknown type {name}")]
    UnknownType {
        /// Type or document that holds the reference
        referenced_by: String,
        /// Missing type name
        name: String,
    },

    /// Inline variants carry exactly one case
    #[error("inline variant {name} has {count} cases, expected 1")]
    InlineVariantCases {
        /// Variant name
        name: String,
        /// Number of declared cases
        count: usize,
    },

    /// Variant payloads are objects
    #[error("case {case} of variant {variant} is not an object type")]
    VariantCaseNotObject {
        /// Variant name
        variant: String,
        /// Case name
        case: String,
    },

    /// Default synthesis would recurse forever
    #[error("default synthesis never terminates: {}", cycle.join(" -> "))]
    UnboundedDefaulting {
        /// Object types forming the cycle, first repeated last
        cycle: Vec<String>,
    },
}

impl SchemaError {
    /// Create unknown type error
    pub fn unknown_type(referenced_by: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownType {
            referenced_by: referenced_by.into(),
            name: name.into(),
        }
    }
}

/// Result type for registry construction
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            SchemaError::unknown_type("condition", "criterio").to_string(),
            "condition refers to unknown type criterio"
        );
        let cycle = SchemaError::UnboundedDefaulting {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(cycle.to_string(), "default synthesis never terminates: a -> b -> a");
    }
}
