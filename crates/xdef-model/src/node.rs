//! Generic tagged tree
//!
//! [`Node`] is the shape both the XML reader produces and the XML writer
//! consumes. Markers from [`crate::tag`] are ordinary entries of a map.

use crate::tag::{Kind, CDATA_MARKER, ITEM_MARKER, KIND_MARKER, TEXT_MARKER, VARIANT_MARKER};
use indexmap::IndexMap;

/// Ordered entries of an element
pub type NodeMap = IndexMap<String, Node>;

/// One element of the tagged tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element text (or an attribute value)
    Text(String),
    /// Element with attributes, text and children, in document order
    Map(NodeMap),
    /// Repeated element
    List(Vec<Node>),
}

impl Node {
    /// Text node
    #[inline]
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// `{@_type: null}`
    #[must_use]
    pub fn null_placeholder() -> Self {
        Self::marked(Kind::Null)
    }

    /// `{@_type: array}` with the given items under `_ITEM_`
    ///
    /// No item entry is written for an empty list.
    #[must_use]
    pub fn array(items: Vec<Node>) -> Self {
        let mut map = NodeMap::new();
        map.insert(KIND_MARKER.to_string(), Self::text(Kind::Array.as_str()));
        if !items.is_empty() {
            map.insert(ITEM_MARKER.to_string(), Self::List(items));
        }
        Self::Map(map)
    }

    /// `{@_type: <kind>, #text: <text>}`
    #[must_use]
    pub fn typed_text(kind: Kind, text: impl Into<String>) -> Self {
        let mut map = NodeMap::new();
        map.insert(KIND_MARKER.to_string(), Self::text(kind.as_str()));
        map.insert(TEXT_MARKER.to_string(), Self::text(text));
        Self::Map(map)
    }

    /// `{__cdata: <text>}`
    #[must_use]
    pub fn cdata(text: impl Into<String>) -> Self {
        let mut map = NodeMap::new();
        map.insert(CDATA_MARKER.to_string(), Self::text(text));
        Self::Map(map)
    }

    fn marked(kind: Kind) -> Self {
        let mut map = NodeMap::new();
        map.insert(KIND_MARKER.to_string(), Self::text(kind.as_str()));
        Self::Map(map)
    }

    /// Text content, if this is a text node
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Entries, if this is a map
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&NodeMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Raw value of the kind marker
    #[must_use]
    pub fn kind_marker(&self) -> Option<&str> {
        self.as_map()?.get(KIND_MARKER)?.as_text()
    }

    /// Case named by the variant marker
    #[must_use]
    pub fn variant_marker(&self) -> Option<&str> {
        self.as_map()?.get(VARIANT_MARKER)?.as_text()
    }

    /// True for the null placeholder and for empty array wrappers
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        let Some(map) = self.as_map() else {
            return false;
        };
        match self.kind_marker() {
            Some("null") => map.len() == 1,
            Some("array") => map.len() == 1,
            _ => false,
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders() {
        assert!(Node::null_placeholder().is_placeholder());
        assert!(Node::array(Vec::new()).is_placeholder());
        assert!(!Node::array(vec![Node::text("a")]).is_placeholder());
        assert!(!Node::typed_text(Kind::Boolean, "false").is_placeholder());
        assert!(!Node::text("").is_placeholder());
    }

    #[test]
    fn markers_are_read_from_entries() {
        let mut map = NodeMap::new();
        map.insert(VARIANT_MARKER.into(), Node::text("filter"));
        map.insert("id".into(), Node::text("7"));
        let node = Node::Map(map);
        assert_eq!(node.variant_marker(), Some("filter"));
        assert_eq!(node.kind_marker(), None);
        assert_eq!(Node::typed_text(Kind::String, "1").kind_marker(), Some("string"));
    }

    #[test]
    fn array_items_live_under_item_marker() {
        let node = Node::array(vec![Node::text("x"), Node::text("y")]);
        let items = node.as_map().and_then(|m| m.get(ITEM_MARKER));
        assert_eq!(items, Some(&Node::List(vec![Node::text("x"), Node::text("y")])));
    }
}
