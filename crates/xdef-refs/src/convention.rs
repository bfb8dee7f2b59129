//! Dotted-path reference convention
//!
//! Definitions refer to translation strings with a short dotted form
//! `<collection>.<entry>`. The fetched configuration holds the long symbolic
//! form, a pointer to the entry's `scriptid` inside the collection artifact:
//!
//! ```text
//! custcollectiontranslations_wb.name_1
//!   <-> netsuite.translationcollection.instance.custcollectiontranslations_wb.strings.string.name_1.scriptid
//! ```
//!
//! This module is the only place that knows both spellings.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use xdef_model::{ElemPath, Reference};

static DOTTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\w+)\.(\w+)$")
        .unwrap_or_else(|e| panic!("BUG: invalid dotted reference pattern: {e}"))
});

const INSTANCE: &str = "instance";
const ENTRY_FIELD: &str = "scriptid";

/// Location of an entry inside the strings of a translation collection
const ENTRY_CONTAINER: [&str; 2] = ["strings", "string"];

/// Dotted `<collection>.<entry>` address
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactPath {
    collection_id: String,
    entry_id: String,
}

impl ArtifactPath {
    /// New path
    #[must_use]
    pub fn new(collection_id: impl Into<String>, entry_id: impl Into<String>) -> Self {
        Self {
            collection_id: collection_id.into(),
            entry_id: entry_id.into(),
        }
    }

    /// Collection part
    #[inline]
    #[must_use]
    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    /// Entry part
    #[inline]
    #[must_use]
    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }
}

impl fmt::Display for ArtifactPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.collection_id, self.entry_id)
    }
}

/// Naming rules linking the dotted form to symbolic references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceConvention {
    adapter: String,
    collection_type: String,
    collection_prefix: String,
}

impl ReferenceConvention {
    /// Convention for collections of `collection_type` under `adapter` whose
    /// ids start with `collection_prefix`
    #[must_use]
    pub fn new(
        adapter: impl Into<String>,
        collection_type: impl Into<String>,
        collection_prefix: impl Into<String>,
    ) -> Self {
        Self {
            adapter: adapter.into(),
            collection_type: collection_type.into(),
            collection_prefix: collection_prefix.into(),
        }
    }

    /// Translation collections of the platform adapter
    #[must_use]
    pub fn standard() -> Self {
        Self::new("netsuite", "translationcollection", "custcollectiontranslations")
    }

    /// Parse the dotted form
    ///
    /// Only strings of exactly two word segments whose first segment starts
    /// with the collection prefix qualify.
    #[must_use]
    pub fn parse_path(&self, text: &str) -> Option<ArtifactPath> {
        let caps = DOTTED.captures(text)?;
        let collection = caps.get(1)?.as_str();
        if !collection.starts_with(&self.collection_prefix) {
            return None;
        }
        Some(ArtifactPath::new(collection, caps.get(2)?.as_str()))
    }

    /// Id of the collection artifact holding `path`
    #[must_use]
    pub fn collection_id(&self, path: &ArtifactPath) -> ElemPath {
        ElemPath::new(vec![
            self.adapter.clone(),
            self.collection_type.clone(),
            INSTANCE.to_string(),
            path.collection_id.clone(),
        ])
    }

    /// Field path of the entry inside the collection artifact's value
    #[must_use]
    pub fn entry_field<'a>(&self, path: &'a ArtifactPath) -> [&'a str; 4] {
        [ENTRY_CONTAINER[0], ENTRY_CONTAINER[1], &path.entry_id, ENTRY_FIELD]
    }

    /// Full symbolic target of `path`
    #[must_use]
    pub fn target(&self, path: &ArtifactPath) -> ElemPath {
        self.entry_field(path)
            .iter()
            .fold(self.collection_id(path), |acc, seg| acc.child(*seg))
    }

    /// Inverse of [`Self::target`]
    #[must_use]
    pub fn recognize(&self, target: &ElemPath) -> Option<ArtifactPath> {
        match target.segments() {
            [adapter, kind, instance, collection, container, item, entry, field]
                if *adapter == self.adapter
                    && *kind == self.collection_type
                    && instance == INSTANCE
                    && collection.starts_with(&self.collection_prefix)
                    && container == ENTRY_CONTAINER[0]
                    && item == ENTRY_CONTAINER[1]
                    && field == ENTRY_FIELD =>
            {
                Some(ArtifactPath::new(collection.clone(), entry.clone()))
            }
            _ => None,
        }
    }

    /// Wire text for a reference: the dotted form when the target follows
    /// this convention, the full symbolic name otherwise
    #[must_use]
    pub fn render(&self, reference: &Reference) -> String {
        match self.recognize(reference.target()) {
            Some(path) => path.to_string(),
            None => reference.target().to_string(),
        }
    }
}

impl Default for ReferenceConvention {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_dotted_form() {
        let conv = ReferenceConvention::standard();
        let path = conv.parse_path("custcollectiontranslations_workbook_example.name_1").unwrap();
        assert_eq!(path.collection_id(), "custcollectiontranslations_workbook_example");
        assert_eq!(path.entry_id(), "name_1");
        assert_eq!(path.to_string(), "custcollectiontranslations_workbook_example.name_1");
    }

    #[test]
    fn parse_rejects_other_shapes() {
        let conv = ReferenceConvention::standard();
        for text in [
            "false.reference",
            "custcollectiontranslations",
            "custcollectiontranslations_a.b.c",
            "custcollectiontranslations_a.",
            " custcollectiontranslations_a.b",
            "plain text",
        ] {
            assert_eq!(conv.parse_path(text), None, "{text}");
        }
    }

    #[test]
    fn target_and_recognize_are_inverse() {
        let conv = ReferenceConvention::standard();
        let path = ArtifactPath::new("custcollectiontranslations_ds", "label_7");
        let target = conv.target(&path);
        assert_eq!(
            target.to_string(),
            "netsuite.translationcollection.instance.custcollectiontranslations_ds.strings.string.label_7.scriptid"
        );
        assert_eq!(conv.recognize(&target), Some(path));
    }

    #[test]
    fn render_uses_dotted_form_when_recognized() {
        let conv = ReferenceConvention::standard();
        let path = ArtifactPath::new("custcollectiontranslations_ds", "label_7");
        let reference = Reference::new(conv.target(&path));
        assert_eq!(conv.render(&reference), "custcollectiontranslations_ds.label_7");

        let other: ElemPath = "netsuite.dataset.instance.sales.scriptid".parse().unwrap();
        assert_eq!(
            conv.render(&Reference::new(other)),
            "netsuite.dataset.instance.sales.scriptid"
        );
    }

    #[test]
    fn custom_prefix() {
        let conv = ReferenceConvention::new("netsuite", "translationcollection", "collection");
        assert!(conv.parse_path("collection1.entry2").is_some());
        assert!(conv.parse_path("custcollectiontranslations_a.b").is_none());
    }
}
