//! Dataset definitions

use super::shared::{AUDIENCE, BASE_RECORD, CRITERION, FIELD_OR_FORMULA, FORMULA, TRANSLATION};
use crate::registry::SchemaRegistryBuilder;
use crate::schema::{ObjectType, Schema};

/// Root type of a dataset definition
pub(super) const ROOT: &str = "dataSet";

pub(super) fn register(builder: SchemaRegistryBuilder) -> SchemaRegistryBuilder {
    builder
        .object(
            ObjectType::new("datasetColumn")
                .field("alias", Schema::string())
                .field("columnId", Schema::number())
                .field("field", Schema::named(FIELD_OR_FORMULA))
                .field("label", Schema::named(TRANSLATION)),
        )
        .object(
            ObjectType::new(ROOT)
                .field("applicationId", Schema::unknown())
                .field("audience", Schema::named(AUDIENCE))
                .field("baseRecord", Schema::named(BASE_RECORD))
                .field("columns", Schema::list(Schema::named("datasetColumn")))
                .field("criteria", Schema::named(CRITERION))
                .field("description", Schema::named(TRANSLATION))
                .field("formulas", Schema::list(Schema::named(FORMULA)))
                .field("id", Schema::unknown())
                .field("name", Schema::named(TRANSLATION))
                .field("ownerId", Schema::number())
                .field("scriptId", Schema::unknown())
                .field("version", Schema::string())
                .tagged("dataSet"),
        )
}
