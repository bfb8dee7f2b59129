//! Workbook definitions
//!
//! A workbook holds its own metadata under `Workbook` plus four lists of
//! visualizations (charts, dataset links, data views, pivots). Chart and
//! pivot bodies (`definition`, `format`) and dataset-link `mapping` are
//! opaque JSON carried as CDATA and never synthesized.

use super::shared::{
    AUDIENCE, CRITERION, EXPRESSION_VALUE, OPERATOR, TARGET_FIELD_CONTEXT, TRANSLATION,
};
use crate::registry::SchemaRegistryBuilder;
use crate::schema::{Field, ObjectType, Schema, VariantType};

/// Root type of a workbook definition
pub(super) const ROOT: &str = "workbookDefinition";

const VISUALIZATION: &str = "visualization";
const RGB_COLOR: &str = "rgbColor";

/// Fields every visualization starts with
fn visualization_base(name: &str) -> ObjectType {
    ObjectType::new(name)
        .field("id", Schema::unknown())
        .field("scriptId", Schema::unknown())
        .field("applicationId", Schema::unknown())
        .field("version", Schema::string())
        .field("name", Schema::named(TRANSLATION))
        .field("workbook", Schema::string())
        .field("datasets", Schema::list(Schema::string()))
}

fn opaque_json() -> Field {
    Field::new(Schema::string()).literal_text().no_default()
}

fn conditional_formats(builder: SchemaRegistryBuilder) -> SchemaRegistryBuilder {
    builder
        .object(
            ObjectType::new(RGB_COLOR)
                .field("blue", Schema::number())
                .field("green", Schema::number())
                .field("red", Schema::number()),
        )
        .variant(VariantType::new("color").case_named(RGB_COLOR))
        .variant(VariantType::new("backgroundColor").case_named(RGB_COLOR))
        .object(
            ObjectType::new("icon")
                .field("color", Schema::named("color"))
                .field("image", Schema::string()),
        )
        .object(
            ObjectType::new("style")
                .field("backgroundColor", Schema::named("backgroundColor"))
                .field("icon", Schema::named("icon")),
        )
        .object(
            ObjectType::new("conditionalFormatFilter")
                .field("expressions", Schema::named(EXPRESSION_VALUE))
                .field("operator", Schema::named(OPERATOR)),
        )
        .variant(VariantType::new("formatRuleFilter").case_named("conditionalFormatFilter"))
        .object(
            ObjectType::new("conditionalFormatRule")
                .field("filter", Schema::named("formatRuleFilter"))
                .field("id", Schema::string())
                .field("style", Schema::named("style")),
        )
        .variant(VariantType::new("formatRule").case_named("conditionalFormatRule"))
        .object(
            ObjectType::new("cellConditionalFormat")
                .field("formatRules", Schema::list(Schema::named("formatRule")))
                .field("id", Schema::string()),
        )
        .variant(VariantType::new("conditionalFormat").case_named("cellConditionalFormat"))
}

pub(super) fn register(builder: SchemaRegistryBuilder) -> SchemaRegistryBuilder {
    conditional_formats(builder)
        .object(
            ObjectType::new("sorting")
                .field("caseSensitive", Schema::boolean())
                .field("direction", Schema::string())
                .field("localeId", Schema::string())
                .field("nullFirst", Schema::boolean())
                .field("order", Schema::number()),
        )
        .object(
            ObjectType::new("workbookColumn")
                .field("conditionalFormat", Schema::list(Schema::named("conditionalFormat")))
                .field("criterion", Schema::named(CRITERION))
                .field("customLabel", Schema::named(TRANSLATION))
                .field("dataSetColumnId", Schema::number())
                .field("datasetScriptId", Schema::string())
                .field("fieldStateName", Schema::string())
                .field("sorting", Schema::named("sorting"))
                .field("targetFieldContext", Schema::named(TARGET_FIELD_CONTEXT))
                .field("width", Schema::number()),
        )
        .object(
            visualization_base("chartOrPivot")
                .field("format", opaque_json())
                .field("order", Schema::number())
                .field("definition", opaque_json())
                .field("datasetLink", Schema::string()),
        )
        .object(visualization_base("dsLink").field("mapping", opaque_json()))
        .object(
            visualization_base("dataView")
                .field("columns", Schema::list(Schema::named("workbookColumn")))
                .field("order", Schema::number()),
        )
        .variant(
            VariantType::new(VISUALIZATION)
                .case("chart", Schema::named("chartOrPivot"))
                .case_named("dsLink")
                .case_named("dataView")
                .case("pivot", Schema::named("chartOrPivot")),
        )
        .object(
            ObjectType::new("innerWorkbook")
                .field("id", Schema::unknown())
                .field("scriptId", Schema::unknown())
                .field("applicationId", Schema::unknown())
                .field("version", Schema::string())
                .field("name", Schema::named(TRANSLATION))
                .field("audience", Schema::named(AUDIENCE))
                .field("ownerId", Schema::number())
                .field("description", Schema::named(TRANSLATION))
                .field("dataViewIDs", Schema::list(Schema::string()))
                .field("pivotIDs", Schema::list(Schema::string()))
                .field("chartIDs", Schema::list(Schema::string()))
                .tagged("workbook"),
        )
        .object(
            ObjectType::new(ROOT)
                .field("charts", Schema::list(Schema::named(VISUALIZATION)))
                .field("datasetLinks", Schema::list(Schema::named(VISUALIZATION)))
                .field("dataViews", Schema::list(Schema::named(VISUALIZATION)))
                .field("pivots", Schema::list(Schema::named(VISUALIZATION)))
                .field("Workbook", Schema::named("innerWorkbook")),
        )
}
