//! Marker vocabulary of the tagged wire encoding
//!
//! Every analytics definition is written with the same fixed spelling for
//! its markers. Both directions of the codec read these constants; nothing
//! else in the workspace spells a marker out.

use std::fmt;
use std::str::FromStr;

/// Prefix given to attribute keys inside a [`Node::Map`](crate::Node::Map)
pub const ATTRIBUTE_PREFIX: &str = "@_";

/// Key of the kind marker (the `type` attribute)
pub const KIND_MARKER: &str = "@_type";

/// Child element holding the items of an array wrapper
pub const ITEM_MARKER: &str = "_ITEM_";

/// Key holding the text payload of an element that also carries markers
pub const TEXT_MARKER: &str = "#text";

/// Child element naming the active case of a polymorphic value
pub const VARIANT_MARKER: &str = "_T_";

/// Key whose text is written as a CDATA section
pub const CDATA_MARKER: &str = "__cdata";

/// Name of the top-level element of every definition document
pub const ROOT_ELEMENT: &str = "root";

/// Field name used for a variant marker that no schema accounts for
pub const UNTYPED_VARIANT_FIELD: &str = "xmlType";

/// Values of the kind marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Absent value (`type="null"`)
    Null,
    /// Array wrapper (`type="array"`)
    Array,
    /// Boolean wrapper (`type="boolean"`)
    Boolean,
    /// Text that must stay a string (`type="string"`)
    String,
}

impl Kind {
    /// Wire spelling of this kind
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::String => "string",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a kind marker value outside the vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kind marker: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(Self::Null),
            "array" => Ok(Self::Array),
            "boolean" => Ok(Self::Boolean),
            "string" => Ok(Self::String),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Attribute key for an attribute name (`type` → `@_type`)
#[inline]
#[must_use]
pub fn attribute_key(name: &str) -> String {
    format!("{ATTRIBUTE_PREFIX}{name}")
}

/// Attribute name for a key, if the key denotes an attribute
#[inline]
#[must_use]
pub fn attribute_name(key: &str) -> Option<&str> {
    key.strip_prefix(ATTRIBUTE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_spelling_round_trips() {
        for kind in [Kind::Null, Kind::Array, Kind::Boolean, Kind::String] {
            assert_eq!(kind.as_str().parse::<Kind>(), Ok(kind));
        }
        assert_eq!("map".parse::<Kind>(), Err(UnknownKind("map".into())));
    }

    #[test]
    fn attribute_keys() {
        assert_eq!(attribute_key("type"), KIND_MARKER);
        assert_eq!(attribute_name(KIND_MARKER), Some("type"));
        assert_eq!(attribute_name(ITEM_MARKER), None);
    }
}
