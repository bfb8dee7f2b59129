//! Decode and encode whole definitions

use crate::config::CodecConfig;
use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
use crate::unwrap::{reference_candidates, Unwrapper};
use crate::wrap::Wrapper;
use crate::xml::{self, WriteOptions};
use std::sync::Arc;
use xdef_model::tag::ROOT_ELEMENT;
use xdef_model::{Node, Value};
use xdef_refs::{ArtifactPath, EntityStore, ReferenceConvention, ReferenceResolver};
use xdef_schema::{Schema, SchemaRegistry};

/// Decoded definition plus the reference candidates that did not resolve
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Decoded value, always an object
    pub value: Value,
    /// Dotted paths left as literal text, sorted
    pub unresolved: Vec<ArtifactPath>,
}

/// Bidirectional codec between tagged XML and values
///
/// Cheap to clone; the registry is shared.
#[derive(Debug, Clone)]
pub struct Codec {
    registry: Arc<SchemaRegistry>,
    convention: ReferenceConvention,
    config: CodecConfig,
}

impl Codec {
    /// Codec over `registry` with the standard reference convention
    #[must_use]
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            convention: ReferenceConvention::standard(),
            config: CodecConfig::default(),
        }
    }

    /// Codec over the built-in dataset and workbook schemas
    #[must_use]
    pub fn standard() -> Self {
        Self::new(SchemaRegistry::global())
    }

    /// With configuration
    #[must_use]
    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// With reference convention
    #[must_use]
    pub fn with_convention(mut self, convention: ReferenceConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Schema registry in use
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Reference convention in use
    #[inline]
    #[must_use]
    pub fn convention(&self) -> &ReferenceConvention {
        &self.convention
    }

    /// Root schema of a document kind
    #[inline]
    #[must_use]
    pub fn schema_for(&self, kind: &str) -> Option<&Schema> {
        self.registry.schema_for(kind)
    }

    /// Decode a definition of `kind`
    ///
    /// # Errors
    /// See [`Codec::decode_with_report`].
    pub async fn decode(&self, xml: &str, kind: &str, store: &dyn EntityStore) -> DecodeResult<Value> {
        Ok(self.decode_with_report(xml, kind, store).await?.value)
    }

    /// Decode a definition of `kind`, reporting unresolved references
    ///
    /// Every reference candidate is looked up before unwrapping starts;
    /// dropping the future cancels the lookups still in flight.
    ///
    /// # Errors
    /// - [`DecodeError::UnknownKind`] if `kind` has no schema
    /// - [`DecodeError::TooLarge`] if `xml` exceeds `max_document_bytes`
    /// - [`DecodeError::MalformedDocument`] if `xml` is not well-formed
    /// - [`DecodeError::TooDeep`] if elements nest deeper than `max_depth`
    /// - [`DecodeError::MissingRoot`] if the document element is not `<root>`
    pub async fn decode_with_report(
        &self,
        xml: &str,
        kind: &str,
        store: &dyn EntityStore,
    ) -> DecodeResult<Decoded> {
        let schema = self
            .schema_for(kind)
            .ok_or_else(|| DecodeError::UnknownKind(kind.to_string()))?;
        if xml.len() > self.config.max_document_bytes {
            return Err(DecodeError::TooLarge {
                size: xml.len(),
                max: self.config.max_document_bytes,
            });
        }

        let document = xml::parse(xml, self.config.max_depth)?;
        let root = document_root(&document)?;

        let candidates = reference_candidates(root, &self.convention);
        let resolutions = ReferenceResolver::new(&self.convention, store)
            .resolve_all(candidates, self.config.lookup_concurrency)
            .await;

        let unresolved = resolutions.unresolved();
        for path in &unresolved {
            tracing::debug!(kind, %path, "reference kept as text");
        }

        let value = Unwrapper::new(&self.registry, &self.convention, &resolutions)
            .keep_empty(self.config.keep_empty)
            .unwrap_document(root, schema);
        Ok(Decoded { value, unresolved })
    }

    /// Encode a value of `kind` to its tagged tree
    ///
    /// # Errors
    /// - [`EncodeError::UnknownKind`] if `kind` has no schema
    /// - [`EncodeError::SchemaMismatch`] if the value does not fit the schema
    pub fn encode_node(&self, value: &Value, kind: &str) -> EncodeResult<Node> {
        let schema = self
            .schema_for(kind)
            .ok_or_else(|| EncodeError::UnknownKind(kind.to_string()))?;
        Wrapper::new(&self.registry, &self.convention).wrap_document(value, schema)
    }

    /// Encode a value of `kind` to XML text
    ///
    /// # Errors
    /// See [`Codec::encode_node`].
    pub fn encode(&self, value: &Value, kind: &str) -> EncodeResult<String> {
        let node = self.encode_node(value, kind)?;
        let options = WriteOptions {
            pretty: self.config.pretty,
            indent: self.config.indent,
        };
        Ok(xml::serialize(&node, &options))
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::standard()
    }
}

/// The single `<root>` element of a parsed document
fn document_root(document: &Node) -> DecodeResult<&Node> {
    let top = document
        .as_map()
        .ok_or_else(|| DecodeError::malformed("document has no element"))?;
    match top.get(ROOT_ELEMENT) {
        Some(Node::List(_)) => Err(DecodeError::malformed("document has more than one <root> element")),
        Some(root) if top.len() == 1 => Ok(root),
        Some(_) => Err(DecodeError::malformed("document has more than one top-level element")),
        None => Err(DecodeError::MissingRoot {
            found: top.keys().cloned().collect::<Vec<_>>().join(", "),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use xdef_refs::InMemoryEntityStore;
    use xdef_schema::DATASET;

    #[tokio::test]
    async fn structural_errors() {
        let codec = Codec::standard();
        let store = InMemoryEntityStore::new();

        let err = codec.decode("<other/>", DATASET, &store).await.unwrap_err();
        assert!(matches!(err, DecodeError::MissingRoot { ref found } if found == "other"));

        let err = codec.decode("<root/><root/>", DATASET, &store).await.unwrap_err();
        assert!(matches!(err, DecodeError::MalformedDocument { .. }));

        let err = codec.decode("<root>", DATASET, &store).await.unwrap_err();
        assert!(matches!(err, DecodeError::MalformedDocument { .. }));

        let err = codec.decode("<root/>", "report", &store).await.unwrap_err();
        assert!(matches!(err, DecodeError::UnknownKind(ref kind) if kind == "report"));
    }

    #[tokio::test]
    async fn size_limit() {
        let codec = Codec::standard().with_config(CodecConfig::new().with_max_document_bytes(16));
        let store = InMemoryEntityStore::new();
        let err = codec
            .decode("<root><a>0123456789</a></root>", DATASET, &store)
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::TooLarge { size: 30, max: 16 }));
    }

    #[tokio::test]
    async fn depth_limit() {
        let store = InMemoryEntityStore::new();
        let deep = format!("<root>{}x{}</root>", "<a>".repeat(200_000), "</a>".repeat(200_000));
        let err = Codec::standard().decode(&deep, DATASET, &store).await.unwrap_err();
        assert!(matches!(err, DecodeError::TooDeep { max: 256 }));

        let shallow = Codec::standard().with_config(CodecConfig::new().with_max_depth(3));
        let xml = "<root><a><b>1</b></a></root>";
        assert!(shallow.decode(xml, DATASET, &store).await.is_ok());
        let err = shallow
            .decode("<root><a><b><c>1</c></b></a></root>", DATASET, &store)
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::TooDeep { max: 3 }));
    }

    #[tokio::test]
    async fn unresolved_paths_are_reported() {
        let codec = Codec::standard();
        let store = InMemoryEntityStore::new();
        let decoded = codec
            .decode_with_report(
                "<root><name><translationScriptId>custcollectiontranslations_ds.n</translationScriptId></name></root>",
                DATASET,
                &store,
            )
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(&decoded.value).unwrap(),
            json!({"name": {"translationScriptId": "custcollectiontranslations_ds.n"}})
        );
        assert_eq!(decoded.unresolved, vec![ArtifactPath::new("custcollectiontranslations_ds", "n")]);
    }

    #[test]
    fn encode_unknown_kind() {
        let err = Codec::standard().encode(&Value::empty_object(), "report").unwrap_err();
        assert!(matches!(err, EncodeError::UnknownKind(_)));
    }

    #[test]
    fn encode_uses_layout_config() {
        let codec = Codec::standard().with_config(CodecConfig::new().with_pretty(false));
        let xml = codec.encode(&Value::empty_object(), DATASET).unwrap();
        assert!(xml.starts_with("<root><applicationId type=\"null\"></applicationId>"));
        assert!(xml.ends_with("<_T_>dataSet</_T_></root>"));
        assert!(!xml.contains('\n'));
    }
}
