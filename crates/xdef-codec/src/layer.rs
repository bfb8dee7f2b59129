//! Analytics artifacts on fetch and deploy
//!
//! A fetched dataset or workbook carries its definition as tagged XML in
//! the `definition` field. On fetch the definition is decoded and its
//! fields are lifted next to the instance fields; on deploy the reverse
//! happens and the definition text is rebuilt from everything that is not
//! an instance-level field.

use crate::codec::Codec;
use crate::error::{LayerError, LayerResult};
use futures::future::join_all;
use xdef_model::{Artifact, Value, ValueMap};
use xdef_refs::EntityStore;
use xdef_schema::{Resolved, DATASET, WORKBOOK};

/// Field holding the tagged definition text
pub const DEFINITION: &str = "definition";

const NAME: &str = "name";
const SCRIPT_ID: &str = "scriptid";
const DEPENDENCIES: &str = "dependencies";
const TABLES: &str = "tables";
const TRANSLATION_SCRIPT_ID: &str = "translationScriptId";

/// Instance-level fields that never enter the definition
fn instance_fields(kind: &str) -> &'static [&'static str] {
    if kind == WORKBOOK {
        &[SCRIPT_ID, NAME, DEFINITION, DEPENDENCIES, TABLES]
    } else {
        &[SCRIPT_ID, NAME, DEFINITION, DEPENDENCIES]
    }
}

/// Reshapes dataset and workbook artifacts around a [`Codec`]
#[derive(Debug, Clone, Default)]
pub struct AnalyticsLayer {
    codec: Codec,
}

impl AnalyticsLayer {
    /// Layer using `codec`
    #[must_use]
    pub fn new(codec: Codec) -> Self {
        Self { codec }
    }

    /// Codec in use
    #[inline]
    #[must_use]
    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// True for kinds whose definition this layer can reshape
    #[must_use]
    pub fn supports(&self, kind: &str) -> bool {
        matches!(kind, DATASET | WORKBOOK) && self.codec.schema_for(kind).is_some()
    }

    /// Decode the definition of a fetched artifact into its value
    ///
    /// Instance fields are kept except `definition`; decoded fields follow,
    /// except `name`, which stays the instance's.
    ///
    /// # Errors
    /// - [`LayerError::UnsupportedKind`] for kinds without a definition
    /// - [`LayerError::MissingDefinition`] if `definition` is not a string
    /// - [`LayerError::Decode`] if the definition does not decode
    pub async fn parse_fetched(&self, artifact: &Artifact, store: &dyn EntityStore) -> LayerResult<Artifact> {
        self.check_kind(artifact)?;
        let Some(Value::Str(definition)) = artifact.field(DEFINITION) else {
            return Err(LayerError::MissingDefinition {
                id: artifact.id().clone(),
            });
        };

        let decoded = self
            .codec
            .decode(definition, artifact.kind(), store)
            .await
            .map_err(|source| LayerError::Decode {
                id: artifact.id().clone(),
                source,
            })?;

        let mut fields = artifact.fields();
        fields.shift_remove(DEFINITION);
        if let Value::Object(decoded) = decoded {
            fields.extend(decoded.into_iter().filter(|(key, _)| key != NAME));
        }
        Ok(artifact.with_value(Value::Object(fields)))
    }

    /// [`parse_fetched`](Self::parse_fetched) for many artifacts at once
    ///
    /// Results are in input order; one failure does not affect the others.
    pub async fn parse_fetched_all(
        &self,
        artifacts: &[Artifact],
        store: &dyn EntityStore,
    ) -> Vec<LayerResult<Artifact>> {
        let results = join_all(artifacts.iter().map(|artifact| self.parse_fetched(artifact, store))).await;
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            tracing::warn!(id = %err.id(), error = %err, "failed to parse fetched definition");
        }
        results
    }

    /// Rebuild the definition text of an artifact about to be deployed
    ///
    /// # Errors
    /// - [`LayerError::UnsupportedKind`] for kinds without a definition
    /// - [`LayerError::Encode`] if the value does not fit the schema
    pub fn prepare_deploy(&self, artifact: &Artifact) -> LayerResult<Artifact> {
        self.check_kind(artifact)?;
        let kind = artifact.kind();
        let fields = artifact.fields();
        let excluded = instance_fields(kind);

        let mut body: ValueMap = fields
            .iter()
            .filter(|(key, _)| !excluded.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if self.declares_name(kind) {
            if let Some(name) = fields.get(NAME) {
                let name = match name {
                    Value::Object(_) => name.clone(),
                    other => Value::object([(TRANSLATION_SCRIPT_ID, other.clone())]),
                };
                body.insert(NAME.to_string(), name);
            }
        }

        let definition = self
            .codec
            .encode(&Value::Object(body), kind)
            .map_err(|source| LayerError::Encode {
                id: artifact.id().clone(),
                source,
            })?;

        let mut value = ValueMap::new();
        for key in [NAME, SCRIPT_ID, DEPENDENCIES] {
            if let Some(field) = fields.get(key) {
                value.insert(key.to_string(), field.clone());
            }
        }
        value.insert(DEFINITION.to_string(), Value::Str(definition));
        if kind == WORKBOOK {
            value.insert("pivots".into(), summary(&fields, "pivots", "pivot"));
            value.insert("charts".into(), summary(&fields, "charts", "chart"));
            value.insert(TABLES.into(), summary(&fields, "dataViews", "table"));
        }
        Ok(artifact.with_value(Value::Object(value)))
    }

    /// [`prepare_deploy`](Self::prepare_deploy) for many artifacts
    pub fn prepare_deploy_all(&self, artifacts: &[Artifact]) -> Vec<LayerResult<Artifact>> {
        artifacts
            .iter()
            .map(|artifact| {
                let result = self.prepare_deploy(artifact);
                if let Err(err) = &result {
                    tracing::warn!(id = %err.id(), error = %err, "failed to prepare definition for deploy");
                }
                result
            })
            .collect()
    }

    fn check_kind(&self, artifact: &Artifact) -> LayerResult<()> {
        if self.supports(artifact.kind()) {
            Ok(())
        } else {
            Err(LayerError::UnsupportedKind {
                id: artifact.id().clone(),
                kind: artifact.kind().to_string(),
            })
        }
    }

    fn declares_name(&self, kind: &str) -> bool {
        let registry = self.codec.registry();
        match self.codec.schema_for(kind).map(|schema| registry.resolve(schema)) {
            Some(Resolved::Object(object)) => object.get(NAME).is_some(),
            _ => false,
        }
    }
}

/// `{<item>: {<scriptId>: {scriptid, index}}}` over the visualizations in
/// `fields[list]`
fn summary(fields: &ValueMap, list: &str, item: &str) -> Value {
    // dataViews summarize as tables, but each entry is still a dataView
    let case = if item == "table" { "dataView" } else { item };
    let mut entries = ValueMap::new();
    for (index, visualization) in fields
        .get(list)
        .and_then(Value::as_list)
        .unwrap_or_default()
        .iter()
        .enumerate()
    {
        let Some(script_id) = visualization
            .get_path(&[case, "scriptId"])
            .and_then(Value::scalar_text)
        else {
            continue;
        };
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        entries.insert(
            script_id.clone(),
            Value::object([(SCRIPT_ID, Value::str(script_id)), ("index", Value::from(index))]),
        );
    }
    Value::object([(item, Value::Object(entries))])
}
