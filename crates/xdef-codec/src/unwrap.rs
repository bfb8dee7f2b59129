//! Tagged tree → value
//!
//! Decoding is advisory about the schema: it uses the schema to pick scalar
//! types and to interpret variant markers, and never fails when the
//! document disagrees with it.

use xdef_model::tag::{
    attribute_name, Kind, ITEM_MARKER, TEXT_MARKER, UNTYPED_VARIANT_FIELD, VARIANT_MARKER,
};
use xdef_model::{canonical_bool, canonical_number, Node, NodeMap, Value, ValueMap};
use xdef_refs::{ArtifactPath, ReferenceConvention, Resolutions};
use xdef_schema::{Field, ObjectType, PrimitiveKind, Resolved, Schema, SchemaRegistry};

/// Dotted paths in every position the unwrapper may turn into a reference
///
/// Only untyped element text qualifies: text under a `string` or `boolean`
/// marker, attribute values and variant markers never do.
#[must_use]
pub fn reference_candidates(node: &Node, convention: &ReferenceConvention) -> Vec<ArtifactPath> {
    let mut found = Vec::new();
    collect(node, convention, &mut found);
    found
}

fn collect(node: &Node, convention: &ReferenceConvention, found: &mut Vec<ArtifactPath>) {
    match node {
        Node::Text(text) => found.extend(convention.parse_path(text)),
        Node::List(items) => {
            for item in items {
                collect(item, convention, found);
            }
        }
        Node::Map(map) => match node.kind_marker().and_then(|k| k.parse::<Kind>().ok()) {
            Some(Kind::Array) => {
                if let Some(items) = map.get(ITEM_MARKER) {
                    collect(items, convention, found);
                }
            }
            Some(_) => {}
            None => {
                for (key, child) in map {
                    if key != VARIANT_MARKER && attribute_name(key).is_none() {
                        collect(child, convention, found);
                    }
                }
            }
        },
    }
}

/// Decodes a tagged tree with a table of already-resolved references
pub struct Unwrapper<'a> {
    registry: &'a SchemaRegistry,
    convention: &'a ReferenceConvention,
    resolutions: &'a Resolutions,
    keep_empty: bool,
}

impl<'a> Unwrapper<'a> {
    /// Unwrapper that prunes empty objects and lists
    #[must_use]
    pub fn new(
        registry: &'a SchemaRegistry,
        convention: &'a ReferenceConvention,
        resolutions: &'a Resolutions,
    ) -> Self {
        Self {
            registry,
            convention,
            resolutions,
            keep_empty: false,
        }
    }

    /// Keep empty objects and lists instead of pruning them
    #[must_use]
    pub fn keep_empty(mut self, keep: bool) -> Self {
        self.keep_empty = keep;
        self
    }

    /// Decode the content of a `<root>` element; always an object
    #[must_use]
    pub fn unwrap_document(&self, root: &Node, schema: &Schema) -> Value {
        match self.unwrap(root, Some(schema)) {
            Value::Object(fields) => Value::Object(fields),
            Value::Str(text) if text.is_empty() => Value::empty_object(),
            other => Value::object([(TEXT_MARKER, other)]),
        }
    }

    /// Decode one node against an optional schema hint
    #[must_use]
    pub fn unwrap(&self, node: &Node, hint: Option<&Schema>) -> Value {
        match node {
            Node::Text(text) => self.scalar(text, hint),
            Node::List(items) => {
                let item_hint = self.item_hint(hint).or(hint);
                Value::List(self.items(items.iter(), item_hint))
            }
            Node::Map(map) => {
                if let Some(marker) = node.kind_marker() {
                    match marker.parse::<Kind>() {
                        Ok(kind) => return self.kinded(kind, map, hint),
                        Err(unknown) => tracing::debug!(%unknown, "keeping element with unknown kind marker as object"),
                    }
                }
                if let Some(case) = node.variant_marker() {
                    return self.variant(case, map, hint);
                }
                Value::Object(self.fields(map.iter(), self.object_hint(hint)))
            }
        }
    }

    fn kinded(&self, kind: Kind, map: &NodeMap, hint: Option<&Schema>) -> Value {
        let text = || map.get(TEXT_MARKER).and_then(Node::as_text).unwrap_or_default();
        match kind {
            Kind::Null => Value::empty_object(),
            Kind::Array => {
                let item_hint = self.item_hint(hint);
                let items = match map.get(ITEM_MARKER) {
                    None => Vec::new(),
                    Some(Node::List(items)) => self.items(items.iter(), item_hint),
                    Some(single) => self.items(std::iter::once(single), item_hint),
                };
                Value::List(items)
            }
            Kind::Boolean => {
                let text = text();
                canonical_bool(text).map_or_else(|| Value::str(text), Value::Bool)
            }
            Kind::String => Value::str(text()),
        }
    }

    fn variant(&self, case: &str, map: &NodeMap, hint: Option<&Schema>) -> Value {
        let rest = map.iter().filter(|(key, _)| key.as_str() != VARIANT_MARKER);
        match hint.map(|schema| self.registry.resolve(schema)) {
            Some(Resolved::Object(object)) if object.tag() == Some(case) => {
                Value::Object(self.fields(rest, Some(object)))
            }
            Some(Resolved::Variant(variant)) => match variant.case_schema(case) {
                Some(schema) => {
                    let payload = self.fields(rest, self.object_of(schema));
                    if variant.is_inline() {
                        Value::Object(payload)
                    } else {
                        Value::object([(case, Value::Object(payload))])
                    }
                }
                None => {
                    tracing::debug!(variant = variant.name(), case, "decoding undeclared variant case");
                    Value::object([(case, Value::Object(self.fields(rest, None)))])
                }
            },
            other => {
                let object = match other {
                    Some(Resolved::Object(object)) => Some(object),
                    _ => None,
                };
                let mut fields = ValueMap::new();
                fields.insert(UNTYPED_VARIANT_FIELD.to_string(), Value::str(case));
                fields.extend(self.fields(rest, object));
                Value::Object(fields)
            }
        }
    }

    fn fields<'n>(
        &self,
        entries: impl Iterator<Item = (&'n String, &'n Node)>,
        object: Option<&ObjectType>,
    ) -> ValueMap {
        entries
            .filter_map(|(key, node)| {
                let value = if attribute_name(key).is_some() {
                    Value::str(node.as_text().unwrap_or_default())
                } else {
                    let hint = object.and_then(|o| o.get(key)).map(Field::schema);
                    self.unwrap(node, hint)
                };
                self.keep(value).map(|value| (key.clone(), value))
            })
            .collect()
    }

    fn items<'n>(&self, items: impl Iterator<Item = &'n Node>, hint: Option<&Schema>) -> Vec<Value> {
        items
            .filter_map(|item| self.keep(self.unwrap(item, hint)))
            .collect()
    }

    fn scalar(&self, text: &str, hint: Option<&Schema>) -> Value {
        if let Some(reference) = self
            .convention
            .parse_path(text)
            .and_then(|path| self.resolutions.get(&path))
        {
            return Value::Reference(reference.clone());
        }

        match hint.map(|schema| self.registry.resolve(schema)) {
            Some(Resolved::Primitive(PrimitiveKind::String)) => Value::str(text),
            Some(Resolved::Primitive(PrimitiveKind::Number)) => {
                canonical_number(text).map_or_else(|| Value::str(text), Value::Number)
            }
            Some(Resolved::Primitive(PrimitiveKind::Boolean)) => {
                canonical_bool(text).map_or_else(|| Value::str(text), Value::Bool)
            }
            // an empty element where a structure is expected carries nothing
            Some(Resolved::Object(_) | Resolved::Variant(_)) if text.is_empty() => Value::empty_object(),
            Some(Resolved::List(_)) if text.is_empty() => Value::List(Vec::new()),
            _ => natural(text),
        }
    }

    fn keep(&self, value: Value) -> Option<Value> {
        (self.keep_empty || !value.is_empty_container()).then_some(value)
    }

    fn item_hint<'s>(&'s self, hint: Option<&'s Schema>) -> Option<&'s Schema> {
        match hint.map(|schema| self.registry.resolve(schema)) {
            Some(Resolved::List(item)) => Some(item),
            _ => None,
        }
    }

    fn object_hint<'s>(&'s self, hint: Option<&'s Schema>) -> Option<&'s ObjectType> {
        match hint.map(|schema| self.registry.resolve(schema))? {
            Resolved::Object(object) => Some(object),
            Resolved::Variant(variant) if variant.is_inline() => {
                variant.sole_case().and_then(|(_, schema)| self.object_of(schema))
            }
            _ => None,
        }
    }

    fn object_of<'s>(&'s self, schema: &'s Schema) -> Option<&'s ObjectType> {
        match self.registry.resolve(schema) {
            Resolved::Object(object) => Some(object),
            _ => None,
        }
    }
}

/// Scalar type read off the text itself
fn natural(text: &str) -> Value {
    if let Some(number) = canonical_number(text) {
        return Value::Number(number);
    }
    canonical_bool(text).map_or_else(|| Value::str(text), Value::Bool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use xdef_model::tag::ROOT_ELEMENT as ROOT;
    use xdef_model::Reference;
    use xdef_schema::{ObjectType, VariantType};

    const DEPTH: usize = 64;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::builder()
            .object(
                ObjectType::new("doc")
                    .field("s", Schema::string())
                    .field("n", Schema::number())
                    .field("b", Schema::boolean())
                    .field("list", Schema::list(Schema::string()))
                    .field("shape", Schema::named("shape"))
                    .field("inline", Schema::named("inlined"))
                    .field("label", Schema::named("label"))
                    .tagged("doc"),
            )
            .object(ObjectType::new("circle").field("radius", Schema::number()))
            .object(ObjectType::new("square").field("side", Schema::string()))
            .object(ObjectType::new("label").field("translationScriptId", Schema::string()))
            .variant(VariantType::new("shape").case_named("circle").case_named("square"))
            .variant(VariantType::new("inlined").case_named("circle").inline())
            .document("doc", Schema::named("doc"))
            .build()
            .unwrap()
    }

    fn decode_with(xml: &str, resolutions: &Resolutions) -> Value {
        let registry = registry();
        let convention = ReferenceConvention::standard();
        let doc = xml::parse(xml, DEPTH).unwrap();
        let root = doc.as_map().and_then(|m| m.get(ROOT)).unwrap();
        Unwrapper::new(&registry, &convention, resolutions)
            .unwrap_document(root, registry.schema_for("doc").unwrap())
    }

    fn decode(xml: &str) -> Value {
        decode_with(xml, &Resolutions::default())
    }

    #[test]
    fn kind_markers() {
        let value = decode(
            r#"<root>
                <a type="null"/>
                <c type="array"><_ITEM_>2</_ITEM_></c>
                <d type="boolean">true</d>
                <e type="string">1</e>
                <f type="array"></f>
                <g type="array"><_ITEM_>x</_ITEM_><_ITEM_>3</_ITEM_></g>
            </root>"#,
        );
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"c": [2], "d": true, "e": "1", "g": ["x", 3]})
        );
    }

    #[test]
    fn keep_empty_preserves_placeholders() {
        let registry = registry();
        let convention = ReferenceConvention::standard();
        let resolutions = Resolutions::default();
        let doc = xml::parse(r#"<root><a type="null"/><f type="array"/></root>"#, DEPTH).unwrap();
        let root = doc.as_map().and_then(|m| m.get(ROOT)).unwrap();
        let value = Unwrapper::new(&registry, &convention, &resolutions)
            .keep_empty(true)
            .unwrap_document(root, registry.schema_for("doc").unwrap());
        assert_eq!(serde_json::to_value(&value).unwrap(), json!({"a": {}, "f": []}));
    }

    #[test]
    fn scalar_hints() {
        let value = decode(
            "<root><s>5</s><n>5</n><b>true</b><x>5</x><y>true</y><z>007</z><n2>abc</n2></root>",
        );
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"s": "5", "n": 5, "b": true, "x": 5, "y": true, "z": "007", "n2": "abc"})
        );

        let mismatched = decode("<root><n>abc</n><b>yes</b><list><_ITEM_>1</_ITEM_></list></root>");
        assert_eq!(mismatched.get("n"), Some(&Value::str("abc")));
        assert_eq!(mismatched.get("b"), Some(&Value::str("yes")));
    }

    #[test]
    fn array_items_use_item_schema() {
        let value = decode(r#"<root><list type="array"><_ITEM_>1</_ITEM_><_ITEM_>true</_ITEM_></list></root>"#);
        assert_eq!(value.get("list"), Some(&Value::List(vec![Value::str("1"), Value::str("true")])));
    }

    #[test]
    fn variant_cases() {
        let value = decode(
            "<root><shape><_T_>circle</_T_><radius>2</radius></shape>\
             <inline><_T_>circle</_T_><radius>3</radius></inline></root>",
        );
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"shape": {"circle": {"radius": 2}}, "inline": {"radius": 3}})
        );
    }

    #[test]
    fn tagged_root_drops_marker() {
        let value = decode("<root><s>x</s><_T_>doc</_T_></root>");
        assert_eq!(serde_json::to_value(&value).unwrap(), json!({"s": "x"}));
    }

    #[test]
    fn undeclared_markers_are_kept() {
        let value = decode(
            "<root><shape><_T_>hexagon</_T_><side>1</side></shape>\
             <other><_T_>widget</_T_><size>4</size></other></root>",
        );
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({
                "shape": {"hexagon": {"side": 1}},
                "other": {"xmlType": "widget", "size": 4}
            })
        );
    }

    #[test]
    fn empty_structures_are_pruned() {
        let value = decode(
            r#"<root><label><translationScriptId type="null"/></label><shape></shape><list></list><keep>x</keep></root>"#,
        );
        assert_eq!(serde_json::to_value(&value).unwrap(), json!({"keep": "x"}));
        assert_eq!(decode("<root></root>"), Value::empty_object());
    }

    #[test]
    fn resolved_paths_become_references() {
        let convention = ReferenceConvention::standard();
        let path = ArtifactPath::new("custcollectiontranslations_wb", "name_1");
        let target = convention.target(&path);
        let resolutions = Resolutions::from_iter([(path, Some(Reference::new(target.clone())))]);

        let value = decode_with(
            "<root><label><translationScriptId>custcollectiontranslations_wb.name_1</translationScriptId></label>\
             <s>custcollectiontranslations_wb.name_2</s>\
             <t type=\"string\">custcollectiontranslations_wb.name_1</t></root>",
            &resolutions,
        );
        assert_eq!(
            value.get_path(&["label", "translationScriptId"]),
            Some(&Value::Reference(Reference::new(target)))
        );
        assert_eq!(value.get("s"), Some(&Value::str("custcollectiontranslations_wb.name_2")));
        assert_eq!(value.get("t"), Some(&Value::str("custcollectiontranslations_wb.name_1")));
    }

    #[test]
    fn candidates_skip_typed_text_and_markers() {
        let convention = ReferenceConvention::standard();
        let doc = xml::parse(
            "<root>\
               <a>custcollectiontranslations_x.a</a>\
               <b type=\"string\">custcollectiontranslations_x.b</b>\
               <c type=\"array\"><_ITEM_>custcollectiontranslations_x.c</_ITEM_></c>\
               <d attr=\"custcollectiontranslations_x.d\"><_T_>custcollectiontranslations_x.e</_T_></d>\
               <e>plain.text</e>\
             </root>",
            DEPTH,
        )
        .unwrap();
        let found: Vec<String> = reference_candidates(&doc, &convention)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(found, vec!["custcollectiontranslations_x.a", "custcollectiontranslations_x.c"]);
    }
}
