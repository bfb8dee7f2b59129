//! Registry of named types and document roots
//!
//! Provides [`SchemaRegistry`], built once through [`SchemaRegistryBuilder`]
//! and read-only afterwards.

use crate::error::{SchemaError, SchemaResult};
use crate::schema::{ObjectType, PrimitiveKind, Resolved, Schema, TypeDef, VariantType};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

static GLOBAL: Lazy<Arc<SchemaRegistry>> = Lazy::new(|| {
    Arc::new(
        crate::builtin::registry()
            .unwrap_or_else(|e| panic!("BUG: built-in analytics schemas are invalid: {e}")),
    )
});

/// Validated set of named types plus one root schema per document kind
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: HashMap<String, TypeDef>,
    documents: IndexMap<String, Schema>,
}

impl SchemaRegistry {
    /// Start building a registry
    #[inline]
    #[must_use]
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    /// Built-in dataset and workbook schemas, shared process-wide
    #[must_use]
    pub fn global() -> Arc<SchemaRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Root schema of a document kind
    #[inline]
    #[must_use]
    pub fn schema_for(&self, kind: &str) -> Option<&Schema> {
        self.documents.get(kind)
    }

    /// Registered document kinds, in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Named type
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Look up the named type behind `schema`
    ///
    /// Registries are validated on build, so every name resolves; a name that
    /// does not is treated as an unknown scalar.
    #[must_use]
    pub fn resolve<'a>(&'a self, schema: &'a Schema) -> Resolved<'a> {
        match schema {
            Schema::Primitive(kind) => Resolved::Primitive(*kind),
            Schema::List(item) => Resolved::List(item),
            Schema::Named(name) => match self.types.get(name) {
                Some(TypeDef::Object(object)) => Resolved::Object(object),
                Some(TypeDef::Variant(variant)) => Resolved::Variant(variant),
                None => Resolved::Primitive(PrimitiveKind::Unknown),
            },
        }
    }

    /// Number of named types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if no types are registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Collects types and document roots, then validates them as a whole
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    types: Vec<TypeDef>,
    documents: IndexMap<String, Schema>,
}

impl SchemaRegistryBuilder {
    /// Register an object type
    #[must_use]
    pub fn object(mut self, object: ObjectType) -> Self {
        self.types.push(TypeDef::Object(object));
        self
    }

    /// Register a variant type
    #[must_use]
    pub fn variant(mut self, variant: VariantType) -> Self {
        self.types.push(TypeDef::Variant(variant));
        self
    }

    /// Declare the root schema of a document kind
    #[must_use]
    pub fn document(mut self, kind: impl Into<String>, root: Schema) -> Self {
        self.documents.insert(kind.into(), root);
        self
    }

    /// Validate and freeze
    ///
    /// # Errors
    /// - [`SchemaError::DuplicateType`] if two types share a name
    /// - [`SchemaError::UnknownType`] if a field, case or document root names
    ///   an unregistered type
    /// - [`SchemaError::InlineVariantCases`] if an inline variant does not
    ///   have exactly one case
    /// - [`SchemaError::VariantCaseNotObject`] if a case payload is not an
    ///   object type
    /// - [`SchemaError::UnboundedDefaulting`] if synthesizing defaults would
    ///   recurse through objects forever
    pub fn build(self) -> SchemaResult<SchemaRegistry> {
        let mut types = HashMap::with_capacity(self.types.len());
        for def in self.types {
            let name = def.name().to_string();
            if types.insert(name.clone(), def).is_some() {
                return Err(SchemaError::DuplicateType(name));
            }
        }

        let registry = SchemaRegistry {
            types,
            documents: self.documents,
        };
        registry.check_references()?;
        registry.check_variants()?;
        registry.check_defaulting()?;
        Ok(registry)
    }
}

impl SchemaRegistry {
    fn check_references(&self) -> SchemaResult<()> {
        let exists = |owner: &str, schema: &Schema| match schema.named_type() {
            Some(name) if !self.types.contains_key(name) => {
                Err(SchemaError::unknown_type(owner, name))
            }
            _ => Ok(()),
        };

        for (kind, root) in &self.documents {
            exists(kind, root)?;
        }
        for def in self.types.values() {
            match def {
                TypeDef::Object(object) => {
                    for field in object.fields().values() {
                        exists(object.name(), field.schema())?;
                    }
                }
                TypeDef::Variant(variant) => {
                    for schema in variant.cases().values() {
                        exists(variant.name(), schema)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn check_variants(&self) -> SchemaResult<()> {
        for def in self.types.values() {
            let TypeDef::Variant(variant) = def else {
                continue;
            };
            if variant.is_inline() && variant.cases().len() != 1 {
                return Err(SchemaError::InlineVariantCases {
                    name: variant.name().to_string(),
                    count: variant.cases().len(),
                });
            }
            for (case, schema) in variant.cases() {
                if !matches!(self.resolve(schema), Resolved::Object(_)) {
                    return Err(SchemaError::VariantCaseNotObject {
                        variant: variant.name().to_string(),
                        case: case.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Synthesis descends into a field only when it names an object type
    /// and neither the field nor the type carries a default. Those edges
    /// must form a DAG.
    fn check_defaulting(&self) -> SchemaResult<()> {
        let edges = |object: &ObjectType| -> Vec<String> {
            object
                .fields()
                .values()
                .filter(|f| !f.is_no_default() && f.default().is_none())
                .filter_map(|f| match f.schema() {
                    Schema::Named(name) => match self.types.get(name) {
                        Some(TypeDef::Object(target)) if target.default().is_none() => {
                            Some(name.clone())
                        }
                        _ => None,
                    },
                    _ => None,
                })
                .collect()
        };

        let mut finished = HashSet::new();
        let mut names: Vec<_> = self.types.keys().cloned().collect();
        names.sort();
        for start in names {
            let mut stack = Vec::new();
            self.visit(&start, &edges, &mut stack, &mut finished)?;
        }
        Ok(())
    }

    fn visit(
        &self,
        name: &str,
        edges: &dyn Fn(&ObjectType) -> Vec<String>,
        stack: &mut Vec<String>,
        finished: &mut HashSet<String>,
    ) -> SchemaResult<()> {
        if finished.contains(name) {
            return Ok(());
        }
        if let Some(pos) = stack.iter().position(|s| s == name) {
            let mut cycle = stack[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(SchemaError::UnboundedDefaulting { cycle });
        }
        let Some(TypeDef::Object(object)) = self.types.get(name) else {
            finished.insert(name.to_string());
            return Ok(());
        };

        stack.push(name.to_string());
        for next in edges(object) {
            self.visit(&next, edges, stack, finished)?;
        }
        stack.pop();
        finished.insert(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;
    use pretty_assertions::assert_eq;
    use xdef_model::Value;

    fn small() -> SchemaRegistryBuilder {
        SchemaRegistry::builder()
            .object(
                ObjectType::new("doc")
                    .field("x", Schema::unknown())
                    .field("y", Schema::list(Schema::string())),
            )
            .document("small", Schema::named("doc"))
    }

    #[test]
    fn build_and_resolve() {
        let registry = small().build().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.kinds().collect::<Vec<_>>(), vec!["small"]);

        let root = registry.schema_for("small").unwrap();
        let Resolved::Object(doc) = registry.resolve(root) else {
            panic!("expected object");
        };
        assert_eq!(doc.fields().len(), 2);
        assert!(registry.schema_for("workbook").is_none());
    }

    #[test]
    fn duplicate_type_rejected() {
        let err = small().object(ObjectType::new("doc")).build().unwrap_err();
        assert_eq!(err, SchemaError::DuplicateType("doc".into()));
    }

    #[test]
    fn unknown_reference_rejected() {
        let err = small()
            .object(ObjectType::new("holder").field("items", Schema::list(Schema::named("missing"))))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::unknown_type("holder", "missing"));

        let err = small().document("other", Schema::named("nope")).build().unwrap_err();
        assert_eq!(err, SchemaError::unknown_type("other", "nope"));
    }

    #[test]
    fn inline_variant_needs_one_case() {
        let err = small()
            .object(ObjectType::new("a"))
            .object(ObjectType::new("b"))
            .variant(VariantType::new("ab").case_named("a").case_named("b").inline())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::InlineVariantCases {
                name: "ab".into(),
                count: 2
            }
        );
    }

    #[test]
    fn variant_case_must_be_object() {
        let err = small()
            .variant(VariantType::new("v").case("text", Schema::string()))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::VariantCaseNotObject { .. }));
    }

    #[test]
    fn object_cycle_rejected() {
        let err = SchemaRegistry::builder()
            .object(ObjectType::new("a").field("b", Schema::named("b")))
            .object(ObjectType::new("b").field("a", Schema::named("a")))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnboundedDefaulting {
                cycle: vec!["a".into(), "b".into(), "a".into()]
            }
        );
    }

    #[test]
    fn cycles_through_lists_variants_or_defaults_are_fine() {
        SchemaRegistry::builder()
            .object(ObjectType::new("node").field("children", Schema::list(Schema::named("node"))))
            .object(ObjectType::new("wrap").field("inner", Schema::named("choice")))
            .variant(VariantType::new("choice").case_named("wrap"))
            .object(
                ObjectType::new("self_ref")
                    .field("next", Field::new(Schema::named("self_ref")).no_default()),
            )
            .object(
                ObjectType::new("seeded")
                    .field("next", Field::new(Schema::named("seeded")).with_default(Value::Null)),
            )
            .build()
            .unwrap();
    }
}
