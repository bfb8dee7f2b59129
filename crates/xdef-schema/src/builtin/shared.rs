//! Types shared by dataset and workbook definitions

use crate::registry::SchemaRegistryBuilder;
use crate::schema::{Field, ObjectType, Schema, VariantType};
use xdef_model::Value;

pub(super) const TRANSLATION: &str = "translation";
pub(super) const AUDIENCE: &str = "audience";
pub(super) const BASE_RECORD: &str = "baseRecord";
pub(super) const FIELD_OR_FORMULA: &str = "fieldOrFormula";
pub(super) const FORMULA: &str = "formula";
pub(super) const CRITERION: &str = "criterion";
pub(super) const OPERATOR: &str = "operator";
pub(super) const TARGET_FIELD_CONTEXT: &str = "targetFieldContext";
pub(super) const META: &str = "meta";
pub(super) const EXPRESSION_VALUE: &str = "expressionValue";

/// Criterion written when a definition has none: an empty AND condition
fn empty_condition() -> Value {
    Value::object([(
        "condition",
        Value::object([
            ("children", Value::List(Vec::new())),
            ("operator", Value::object([("code", Value::str("AND"))])),
            ("targetFieldContext", Value::object([("name", Value::str("DEFAULT"))])),
            ("meta", Value::Null),
            ("field", Value::Null),
            ("fieldStateName", Value::Null),
        ]),
    )])
}

pub(super) fn register(builder: SchemaRegistryBuilder) -> SchemaRegistryBuilder {
    builder
        .object(ObjectType::new(TRANSLATION).field("translationScriptId", Schema::string()))
        .object(
            ObjectType::new(AUDIENCE)
                .field("AudienceItems", Schema::list(Schema::unknown()))
                .field("isPublic", Field::new(Schema::boolean()).with_default(Value::Bool(false))),
        )
        .object(
            ObjectType::new(BASE_RECORD)
                .field("id", Schema::string())
                .field("label", Schema::string()),
        )
        .object(
            ObjectType::new("join")
                .field("id", Schema::string())
                .field("targetRecordType", Schema::string()),
        )
        .object(
            ObjectType::new("joinTrail")
                .field("baseRecord", Schema::named(BASE_RECORD))
                .field("joins", Schema::list(Schema::named("join"))),
        )
        .object(
            ObjectType::new("fieldReference")
                .field("id", Schema::string())
                .field("joinTrail", Schema::named("joinTrail"))
                .field("label", Schema::string())
                .field("uniqueId", Schema::string())
                .field("fieldValidityState", Field::new(Schema::string()).no_default()),
        )
        .object(
            ObjectType::new("formulaDefinition")
                .field("dataType", Schema::string())
                .field("formulaSQL", Schema::string())
                .field("id", Schema::string())
                .field("label", Schema::named(TRANSLATION))
                .field("uniqueId", Schema::string()),
        )
        .variant(
            VariantType::new(FORMULA)
                .case("formula", Schema::named("formulaDefinition"))
                .inline(),
        )
        .object(
            ObjectType::new("dataSetFormula")
                .field("fields", Schema::list(Schema::named(FIELD_OR_FORMULA)))
                .field("formula", Schema::named(FORMULA)),
        )
        .variant(
            VariantType::new(FIELD_OR_FORMULA)
                .case_named("fieldReference")
                .case_named("dataSetFormula"),
        )
        .object(
            ObjectType::new(OPERATOR)
                .field("code", Field::new(Schema::string()).with_default(Value::str("AND"))),
        )
        .object(
            ObjectType::new(TARGET_FIELD_CONTEXT)
                .field("name", Field::new(Schema::string()).with_default(Value::str("DEFAULT"))),
        )
        .object(
            ObjectType::new(META)
                .field("selectorType", Schema::unknown())
                .field("subType", Schema::string()),
        )
        .object(
            ObjectType::new(EXPRESSION_VALUE)
                .field("type", Schema::string())
                .field("value", Schema::unknown()),
        )
        .object(
            ObjectType::new("expression")
                .field("label", Schema::string())
                .field("subType", Schema::unknown())
                .field("uiData", Schema::list(Schema::string()))
                .field("value", Schema::named(EXPRESSION_VALUE)),
        )
        .object(
            ObjectType::new("filter")
                .field("caseSensitive", Schema::boolean())
                .field("expressions", Schema::list(Schema::named("expression")))
                .field("operator", Schema::named(OPERATOR))
                .field("targetFieldContext", Schema::named(TARGET_FIELD_CONTEXT))
                .field("field", Schema::named(FIELD_OR_FORMULA))
                .field("fieldStateName", Schema::string())
                .field("meta", Schema::named(META)),
        )
        .object(
            ObjectType::new("condition")
                .field("children", Schema::list(Schema::named(CRITERION)))
                .field("operator", Schema::named(OPERATOR))
                .field("targetFieldContext", Schema::named(TARGET_FIELD_CONTEXT))
                .field("meta", Schema::named(META))
                .field("field", Schema::named(FIELD_OR_FORMULA))
                .field("fieldStateName", Schema::string()),
        )
        .variant(
            VariantType::new(CRITERION)
                .case_named("condition")
                .case_named("filter")
                .with_default(empty_condition()),
        )
}
