//! Default values for fields a value leaves out
//!
//! Synthesis is pure and total. An object whose every synthesized field is
//! a placeholder collapses to `Null`, so a definition that names nothing
//! under a type encodes as one null marker instead of a tree of them.

use xdef_model::{Value, ValueMap};
use xdef_schema::{Field, ObjectType, Resolved, Schema, SchemaRegistry};

/// Builds default values from schemas
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Synthesizer<'a> {
    /// Synthesizer over the types of `registry`
    #[inline]
    #[must_use]
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Default value of a schema
    #[must_use]
    pub fn synthesize(&self, schema: &Schema) -> Value {
        match self.registry.resolve(schema) {
            Resolved::Primitive(_) => Value::Null,
            Resolved::List(_) => Value::List(Vec::new()),
            Resolved::Object(object) => object
                .default()
                .cloned()
                .unwrap_or_else(|| self.collapse(self.synthesize_fields(object))),
            Resolved::Variant(variant) => variant.default().cloned().unwrap_or(Value::Null),
        }
    }

    /// Default value of a field; its own default literal wins
    #[must_use]
    pub fn synthesize_field(&self, field: &Field) -> Value {
        field
            .default()
            .cloned()
            .unwrap_or_else(|| self.synthesize(field.schema()))
    }

    /// Defaults of every field not marked `no_default`, in schema order
    #[must_use]
    pub fn synthesize_fields(&self, object: &ObjectType) -> ValueMap {
        object
            .fields()
            .iter()
            .filter(|(_, field)| !field.is_no_default())
            .map(|(name, field)| (name.clone(), self.synthesize_field(field)))
            .collect()
    }

    fn collapse(&self, fields: ValueMap) -> Value {
        if fields.values().all(Value::is_placeholder) {
            Value::Null
        } else {
            Value::Object(fields)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use xdef_schema::{VariantType, DATASET, WORKBOOK};

    fn json(value: &Value) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    fn assert_no_placeholder_objects(value: &Value, at: &str) {
        match value {
            Value::Object(fields) => {
                assert!(
                    fields.is_empty() || !fields.values().all(Value::is_placeholder),
                    "{at} should have collapsed to null"
                );
                for (name, field) in fields {
                    assert_no_placeholder_objects(field, &format!("{at}.{name}"));
                }
            }
            Value::List(items) => {
                for item in items {
                    assert_no_placeholder_objects(item, at);
                }
            }
            _ => {}
        }
    }

    #[test]
    fn primitives_and_lists() {
        let registry = SchemaRegistry::default();
        let synth = Synthesizer::new(&registry);
        assert_eq!(synth.synthesize(&Schema::string()), Value::Null);
        assert_eq!(synth.synthesize(&Schema::unknown()), Value::Null);
        assert_eq!(synth.synthesize(&Schema::list(Schema::number())), Value::List(Vec::new()));
    }

    #[test]
    fn all_placeholder_object_collapses() {
        let registry = SchemaRegistry::builder()
            .object(
                ObjectType::new("inner")
                    .field("a", Schema::string())
                    .field("b", Schema::list(Schema::string())),
            )
            .object(ObjectType::new("outer").field("inner", Schema::named("inner")))
            .object(ObjectType::new("nothing"))
            .object(
                ObjectType::new("hidden")
                    .field("x", Field::new(Schema::string()).no_default()),
            )
            .build()
            .unwrap();
        let synth = Synthesizer::new(&registry);
        assert_eq!(synth.synthesize(&Schema::named("inner")), Value::Null);
        assert_eq!(synth.synthesize(&Schema::named("outer")), Value::Null);
        assert_eq!(synth.synthesize(&Schema::named("nothing")), Value::Null);
        assert_eq!(synth.synthesize(&Schema::named("hidden")), Value::Null);
    }

    #[test]
    fn defaults_prevent_collapse() {
        let registry = SchemaRegistry::builder()
            .object(
                ObjectType::new("op")
                    .field("code", Field::new(Schema::string()).with_default(Value::str("AND")))
                    .field("extra", Schema::string()),
            )
            .object(ObjectType::new("holder").field("op", Schema::named("op")))
            .variant(
                VariantType::new("choice")
                    .case_named("op")
                    .with_default(Value::object([("op", Value::empty_object())])),
            )
            .variant(VariantType::new("bare").case_named("op"))
            .build()
            .unwrap();
        let synth = Synthesizer::new(&registry);
        assert_eq!(
            json(&synth.synthesize(&Schema::named("holder"))),
            json!({"op": {"code": "AND", "extra": null}})
        );
        assert_eq!(json(&synth.synthesize(&Schema::named("choice"))), json!({"op": {}}));
        assert_eq!(synth.synthesize(&Schema::named("bare")), Value::Null);
    }

    #[test]
    fn field_default_wins_over_type_default() {
        let registry = SchemaRegistry::builder()
            .object(ObjectType::new("t").field("s", Schema::string()).with_default(Value::str("type")))
            .build()
            .unwrap();
        let synth = Synthesizer::new(&registry);
        let field = Field::new(Schema::named("t")).with_default(Value::str("field"));
        assert_eq!(synth.synthesize_field(&field), Value::str("field"));
        assert_eq!(synth.synthesize_field(&Field::new(Schema::named("t"))), Value::str("type"));
    }

    #[test]
    fn builtin_roots_never_leave_placeholder_objects() {
        let registry = SchemaRegistry::global();
        let synth = Synthesizer::new(&registry);
        for kind in [DATASET, WORKBOOK] {
            let value = synth.synthesize(registry.schema_for(kind).unwrap());
            assert_no_placeholder_objects(&value, kind);
        }
    }

    #[test]
    fn dataset_defaults() {
        let registry = SchemaRegistry::global();
        let synth = Synthesizer::new(&registry);
        let value = synth.synthesize(registry.schema_for(DATASET).unwrap());
        assert_eq!(
            json(&value),
            json!({
                "applicationId": null,
                "audience": {"AudienceItems": [], "isPublic": false},
                "baseRecord": null,
                "columns": [],
                "criteria": {"condition": {
                    "children": [],
                    "operator": {"code": "AND"},
                    "targetFieldContext": {"name": "DEFAULT"},
                    "meta": null,
                    "field": null,
                    "fieldStateName": null
                }},
                "description": null,
                "formulas": [],
                "id": null,
                "name": null,
                "ownerId": null,
                "scriptId": null,
                "version": null
            })
        );
    }
}
