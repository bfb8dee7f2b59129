//! Built-in analytics schemas

mod dataset;
mod shared;
mod workbook;

use crate::error::SchemaResult;
use crate::registry::SchemaRegistry;
use crate::schema::Schema;

/// Document kind of dataset definitions
pub const DATASET: &str = "dataset";

/// Document kind of workbook definitions
pub const WORKBOOK: &str = "workbook";

pub(crate) fn registry() -> SchemaResult<SchemaRegistry> {
    let builder = shared::register(SchemaRegistry::builder());
    let builder = dataset::register(builder).document(DATASET, Schema::named(dataset::ROOT));
    workbook::register(builder)
        .document(WORKBOOK, Schema::named(workbook::ROOT))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Resolved, TypeDef};

    #[test]
    fn builtin_registry_is_valid() {
        let registry = registry().unwrap();
        assert_eq!(registry.kinds().collect::<Vec<_>>(), vec![DATASET, WORKBOOK]);
    }

    #[test]
    fn document_roots() {
        let registry = SchemaRegistry::global();

        let Resolved::Object(dataset) = registry.resolve(registry.schema_for(DATASET).unwrap()) else {
            panic!("dataset root is an object");
        };
        assert_eq!(dataset.tag(), Some("dataSet"));
        assert!(dataset.get("criteria").is_some());

        let Resolved::Object(workbook) = registry.resolve(registry.schema_for(WORKBOOK).unwrap()) else {
            panic!("workbook root is an object");
        };
        assert_eq!(workbook.tag(), None);
        let inner = workbook.get("Workbook").unwrap();
        let Resolved::Object(inner) = registry.resolve(inner.schema()) else {
            panic!("inner workbook is an object");
        };
        assert_eq!(inner.tag(), Some("workbook"));
    }

    #[test]
    fn annotations_survive_registration() {
        let registry = SchemaRegistry::global();
        let Some(TypeDef::Object(chart)) = registry.get("chartOrPivot") else {
            panic!("chartOrPivot registered");
        };
        let definition = chart.get("definition").unwrap();
        assert!(definition.is_literal_text());
        assert!(definition.is_no_default());

        let Some(TypeDef::Variant(formula)) = registry.get("formula") else {
            panic!("formula registered");
        };
        assert!(formula.is_inline());

        let Some(TypeDef::Variant(criterion)) = registry.get("criterion") else {
            panic!("criterion registered");
        };
        assert!(criterion.default().and_then(|d| d.get("condition")).is_some());
    }
}
