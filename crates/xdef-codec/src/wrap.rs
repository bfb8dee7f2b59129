//! Value → tagged tree
//!
//! Encoding is strict: the value must fit the schema, and every rule here
//! mirrors one in [`crate::unwrap`] so that decoding the output gives the
//! value back (modulo synthesized defaults).
//!
//! Objects are written in three passes:
//!
//! ```text
//!   present fields (value order)
//!        │
//!        ▼
//!   missing fields (schema order, synthesized)
//!        │
//!        ▼
//!   collapse ── all placeholders? ──► <x type="null"/>
//!        │
//!        ▼
//!   constant tag appended as _T_
//! ```

use crate::error::{EncodeError, EncodeResult};
use crate::synth::Synthesizer;
use xdef_model::tag::{
    attribute_name, Kind, CDATA_MARKER, ITEM_MARKER, KIND_MARKER, ROOT_ELEMENT, TEXT_MARKER,
    UNTYPED_VARIANT_FIELD, VARIANT_MARKER,
};
use xdef_model::{canonical_bool, canonical_number, ElemPath, Node, NodeMap, Value, ValueMap};
use xdef_refs::ReferenceConvention;
use xdef_schema::{ObjectType, PrimitiveKind, Resolved, Schema, SchemaRegistry, VariantType};

/// Where a value sits: its schema and whether it is written as CDATA
#[derive(Clone, Copy)]
struct Slot<'s> {
    schema: Option<&'s Schema>,
    literal_text: bool,
}

impl<'s> Slot<'s> {
    fn of(schema: Option<&'s Schema>) -> Self {
        Self {
            schema,
            literal_text: false,
        }
    }
}

/// Encodes values against the schemas of a registry
pub struct Wrapper<'a> {
    registry: &'a SchemaRegistry,
    convention: &'a ReferenceConvention,
    synth: Synthesizer<'a>,
}

impl<'a> Wrapper<'a> {
    /// Wrapper rendering references with `convention`
    #[must_use]
    pub fn new(registry: &'a SchemaRegistry, convention: &'a ReferenceConvention) -> Self {
        Self {
            registry,
            convention,
            synth: Synthesizer::new(registry),
        }
    }

    /// Encode a whole definition as `{root: ...}`
    ///
    /// The root never collapses: a value with nothing to say encodes as an
    /// empty `<root>`.
    ///
    /// # Errors
    /// Returns [`EncodeError::SchemaMismatch`] when the value's shape
    /// conflicts with `schema`.
    pub fn wrap_document(&self, value: &Value, schema: &Schema) -> EncodeResult<Node> {
        let path = ElemPath::root();
        let empty = ValueMap::new();
        let fields = value.as_object().unwrap_or(&empty);
        let body = match (value, self.registry.resolve(schema)) {
            (Value::Object(_) | Value::Null, Resolved::Object(object)) => {
                self.object(fields, Some(object), &path, false)?
            }
            (Value::Object(_) | Value::Null, Resolved::Primitive(PrimitiveKind::Unknown)) => {
                self.object(fields, None, &path, false)?
            }
            _ => self.wrap(value, Slot::of(Some(schema)), &path)?,
        };
        let mut document = NodeMap::new();
        document.insert(ROOT_ELEMENT.to_string(), body);
        Ok(Node::Map(document))
    }

    fn wrap(&self, value: &Value, slot: Slot<'_>, path: &ElemPath) -> EncodeResult<Node> {
        let resolved = slot.schema.map(|schema| self.registry.resolve(schema));
        match value {
            Value::Reference(reference) => Ok(Node::text(self.convention.render(reference))),
            Value::Null => Ok(Node::null_placeholder()),
            Value::Bool(b) => {
                expect_scalar(resolved.as_ref(), value, path)?;
                Ok(Node::typed_text(Kind::Boolean, b.to_string()))
            }
            Value::Number(n) => {
                expect_scalar(resolved.as_ref(), value, path)?;
                Ok(Node::text(n.to_string()))
            }
            Value::Str(text) => {
                expect_scalar(resolved.as_ref(), value, path)?;
                Ok(string_node(text, slot.literal_text))
            }
            Value::List(items) => {
                let item = match resolved {
                    None | Some(Resolved::Primitive(PrimitiveKind::Unknown)) => None,
                    Some(Resolved::List(item)) => Some(item),
                    Some(other) => return Err(conflict(path, &other, value)),
                };
                let nodes = items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| self.wrap(v, Slot::of(item), &path.child(i.to_string())))
                    .collect::<EncodeResult<Vec<_>>>()?;
                Ok(Node::array(nodes))
            }
            Value::Object(fields) => match resolved {
                None | Some(Resolved::Primitive(PrimitiveKind::Unknown)) => self.object(fields, None, path, true),
                Some(Resolved::Object(object)) => self.object(fields, Some(object), path, true),
                Some(Resolved::Variant(variant)) => self.variant(fields, variant, path),
                Some(_) if fields.is_empty() => Ok(Node::null_placeholder()),
                Some(other) => Err(conflict(path, &other, value)),
            },
        }
    }

    /// Object with `xmlType` marker, collapse and constant tag
    fn object(
        &self,
        fields: &ValueMap,
        schema: Option<&ObjectType>,
        path: &ElemPath,
        collapse: bool,
    ) -> EncodeResult<Node> {
        let tag = schema.and_then(ObjectType::tag);
        let untyped_case = match fields.get(UNTYPED_VARIANT_FIELD) {
            Some(Value::Str(case))
                if tag.is_none() && schema.map_or(true, |o| o.get(UNTYPED_VARIANT_FIELD).is_none()) =>
            {
                Some(case)
            }
            _ => None,
        };

        let mut entries = NodeMap::new();
        if let Some(case) = untyped_case {
            entries.insert(VARIANT_MARKER.to_string(), Node::text(case.as_str()));
            let rest: ValueMap = fields
                .iter()
                .filter(|(key, _)| key.as_str() != UNTYPED_VARIANT_FIELD)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            entries.extend(self.object_entries(&rest, schema, path)?);
            return Ok(Node::Map(entries));
        }

        entries.extend(self.object_entries(fields, schema, path)?);
        match tag {
            Some(tag) => {
                entries.insert(VARIANT_MARKER.to_string(), Node::text(tag));
                Ok(Node::Map(entries))
            }
            None if collapse && entries.values().all(Node::is_placeholder) => Ok(Node::null_placeholder()),
            None => Ok(Node::Map(entries)),
        }
    }

    /// Variant value: a known singleton case, or the sole case of an inline
    /// or single-case variant
    fn variant(&self, fields: &ValueMap, variant: &VariantType, path: &ElemPath) -> EncodeResult<Node> {
        if fields.is_empty() {
            return Ok(Node::null_placeholder());
        }

        if !variant.is_inline() && fields.len() == 1 {
            if let Some((case, payload)) = fields.first() {
                if let Some(schema) = variant.case_schema(case) {
                    let payload_path = path.child(case.as_str());
                    let empty = ValueMap::new();
                    let payload = match payload {
                        Value::Object(payload) => payload,
                        Value::Null => &empty,
                        other => {
                            return Err(EncodeError::mismatch(
                                &payload_path,
                                format!("variant payload must be an object, found {}", other.kind_name()),
                            ))
                        }
                    };
                    return self.case(case, payload, schema, &payload_path);
                }
            }
        }

        if variant.is_inline() || variant.cases().len() == 1 {
            if let Some((case, schema)) = variant.sole_case() {
                return self.case(case, fields, schema, path);
            }
        }

        let expected = variant.cases().keys().map(String::as_str).collect::<Vec<_>>().join(", ");
        let reason = match fields.first() {
            Some((case, _)) if fields.len() == 1 => format!("unknown case {case} (expected one of {expected})"),
            _ => format!(
                "expected a single case of {} (one of {expected}), found {} fields",
                variant.name(),
                fields.len()
            ),
        };
        Err(EncodeError::mismatch(path, reason))
    }

    /// `_T_` first, then the payload; payloads never collapse
    fn case(&self, case: &str, payload: &ValueMap, schema: &Schema, path: &ElemPath) -> EncodeResult<Node> {
        let object = match self.registry.resolve(schema) {
            Resolved::Object(object) => Some(object),
            _ => None,
        };
        let mut entries = NodeMap::new();
        entries.insert(VARIANT_MARKER.to_string(), Node::text(case));
        entries.extend(self.object_entries(payload, object, path)?);
        Ok(Node::Map(entries))
    }

    /// Present fields in value order, then missing schema fields
    fn object_entries(
        &self,
        fields: &ValueMap,
        schema: Option<&ObjectType>,
        path: &ElemPath,
    ) -> EncodeResult<NodeMap> {
        let mut entries = NodeMap::new();
        for (key, value) in fields {
            if let Some(name) = attribute_name(key) {
                let text = attribute_text(value, self.convention)
                    .ok_or_else(|| EncodeError::mismatch(path, format!("attribute {name} must be a scalar, found {}", value.kind_name())))?;
                if key == KIND_MARKER && text.parse::<Kind>().is_ok() {
                    return Err(EncodeError::mismatch(path, format!("attribute {name}={text:?} would read back as a kind marker")));
                }
                entries.insert(key.clone(), Node::text(text));
                continue;
            }
            if key == TEXT_MARKER {
                let text = attribute_text(value, self.convention)
                    .ok_or_else(|| EncodeError::mismatch(path, format!("element text must be a scalar, found {}", value.kind_name())))?;
                // padding only survives the reader inside CDATA
                let marker = if is_padded(&text) { CDATA_MARKER } else { TEXT_MARKER };
                entries.insert(marker.to_string(), Node::text(text));
                continue;
            }

            if matches!(key.as_str(), CDATA_MARKER | ITEM_MARKER | VARIANT_MARKER) {
                return Err(EncodeError::mismatch(path, format!("{key} is a reserved marker, not a field name")));
            }
            if !is_element_name(key) {
                return Err(EncodeError::mismatch(path, format!("{key:?} is not a valid element name")));
            }
            let child = path.child(key.as_str());
            let field = schema.and_then(|object| object.get(key));
            let slot = Slot {
                schema: field.map(|f| f.schema()),
                literal_text: field.is_some_and(|f| f.is_literal_text()),
            };
            entries.insert(key.clone(), self.wrap(value, slot, &child)?);
        }

        if let Some(object) = schema {
            for (name, field) in object.fields() {
                if fields.contains_key(name) || field.is_no_default() {
                    continue;
                }
                let value = self.synth.synthesize_field(field);
                let slot = Slot {
                    schema: Some(field.schema()),
                    literal_text: field.is_literal_text(),
                };
                entries.insert(name.clone(), self.wrap(&value, slot, &path.child(name.as_str()))?);
            }
        }
        Ok(entries)
    }
}

/// Plain text unless decoding would trim it or turn it into a number or
/// boolean
fn string_node(text: &str, literal_text: bool) -> Node {
    if literal_text || is_padded(text) {
        Node::cdata(text)
    } else if canonical_number(text).is_some() || canonical_bool(text).is_some() {
        Node::typed_text(Kind::String, text)
    } else {
        Node::text(text)
    }
}

fn attribute_text(value: &Value, convention: &ReferenceConvention) -> Option<String> {
    match value {
        Value::Reference(reference) => Some(convention.render(reference)),
        other => other.scalar_text(),
    }
}

fn expect_scalar(resolved: Option<&Resolved<'_>>, value: &Value, path: &ElemPath) -> EncodeResult<()> {
    match resolved {
        Some(other @ (Resolved::Object(_) | Resolved::Variant(_) | Resolved::List(_))) => {
            Err(conflict(path, other, value))
        }
        _ => Ok(()),
    }
}

fn conflict(path: &ElemPath, expected: &Resolved<'_>, found: &Value) -> EncodeError {
    let expected = match expected {
        Resolved::Primitive(PrimitiveKind::String) => "string".to_string(),
        Resolved::Primitive(PrimitiveKind::Number) => "number".to_string(),
        Resolved::Primitive(PrimitiveKind::Boolean) => "boolean".to_string(),
        Resolved::Primitive(PrimitiveKind::Unknown) => "any value".to_string(),
        Resolved::List(_) => "list".to_string(),
        Resolved::Object(object) => format!("object {}", object.name()),
        Resolved::Variant(variant) => format!("variant {}", variant.name()),
    };
    EncodeError::mismatch(path, format!("expected {expected}, found {}", found.kind_name()))
}

fn is_padded(text: &str) -> bool {
    text.trim() != text
}

/// Names that are also valid `ElemPath` segments, so `.` is out
fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
}
