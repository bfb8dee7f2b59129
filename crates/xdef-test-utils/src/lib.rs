//! Testing utilities for XDEF workspace
//!
//! Sample definitions, translation-collection fixtures and tracing setup.

#![allow(missing_docs)]

use std::sync::Once;
use xdef_model::{Artifact, Value};
use xdef_refs::{ArtifactPath, InMemoryEntityStore, ReferenceConvention};
use xdef_schema::{ObjectType, Schema, SchemaRegistry, VariantType};

/// Dataset definition in canonical form: every field present, in schema
/// order, laid out exactly as the encoder writes it.
pub const DATASET_XML: &str = r#"<root>
  <applicationId type="null"></applicationId>
  <audience>
    <AudienceItems type="array"></AudienceItems>
    <isPublic type="boolean">false</isPublic>
  </audience>
  <baseRecord>
    <id>customer</id>
    <label>Customer</label>
  </baseRecord>
  <columns type="array">
    <_ITEM_>
      <alias>id</alias>
      <columnId>1</columnId>
      <field>
        <_T_>fieldReference</_T_>
        <id>id</id>
        <joinTrail>
          <baseRecord>
            <id>customer</id>
            <label>Customer</label>
          </baseRecord>
          <joins type="array"></joins>
        </joinTrail>
        <label>Internal ID</label>
        <uniqueId>id</uniqueId>
      </field>
      <label type="null"></label>
    </_ITEM_>
  </columns>
  <criteria>
    <_T_>condition</_T_>
    <children type="array"></children>
    <operator>
      <code>AND</code>
    </operator>
    <targetFieldContext>
      <name>DEFAULT</name>
    </targetFieldContext>
    <meta type="null"></meta>
    <field type="null"></field>
    <fieldStateName type="null"></fieldStateName>
  </criteria>
  <description type="null"></description>
  <formulas type="array"></formulas>
  <id type="null"></id>
  <name>
    <translationScriptId>custcollectiontranslations_dataset_1.dataset_name</translationScriptId>
  </name>
  <ownerId>5</ownerId>
  <scriptId type="null"></scriptId>
  <version type="string">0.1</version>
  <_T_>dataSet</_T_>
</root>
"#;

/// Workbook definition in canonical form, with one chart and one data view
pub const WORKBOOK_XML: &str = r#"<root>
  <charts type="array">
    <_ITEM_>
      <_T_>chart</_T_>
      <id type="null"></id>
      <scriptId>custview_chart1</scriptId>
      <applicationId type="null"></applicationId>
      <version type="string">0.1</version>
      <name>
        <translationScriptId>custcollectiontranslations_workbook_1.chart_name</translationScriptId>
      </name>
      <workbook>custworkbook1</workbook>
      <datasets type="array">
        <_ITEM_>custdataset1</_ITEM_>
      </datasets>
      <format><![CDATA[{"type":"bar","stacked":false}]]></format>
      <order>0</order>
      <definition><![CDATA[{"series":[{"x":"a < b"}]}]]></definition>
      <datasetLink type="null"></datasetLink>
    </_ITEM_>
  </charts>
  <datasetLinks type="array"></datasetLinks>
  <dataViews type="array">
    <_ITEM_>
      <_T_>dataView</_T_>
      <id type="null"></id>
      <scriptId>custview_table1</scriptId>
      <applicationId type="null"></applicationId>
      <version type="string">0.1</version>
      <name type="null"></name>
      <workbook>custworkbook1</workbook>
      <datasets type="array">
        <_ITEM_>custdataset1</_ITEM_>
      </datasets>
      <columns type="array">
        <_ITEM_>
          <conditionalFormat type="array">
            <_ITEM_>
              <_T_>cellConditionalFormat</_T_>
              <formatRules type="array">
                <_ITEM_>
                  <_T_>conditionalFormatRule</_T_>
                  <filter>
                    <_T_>conditionalFormatFilter</_T_>
                    <expressions>
                      <type>NUMBER</type>
                      <value>100</value>
                    </expressions>
                    <operator>
                      <code>GREATER</code>
                    </operator>
                  </filter>
                  <id>rule_1</id>
                  <style>
                    <backgroundColor>
                      <_T_>rgbColor</_T_>
                      <blue>0</blue>
                      <green>128</green>
                      <red>255</red>
                    </backgroundColor>
                    <icon type="null"></icon>
                  </style>
                </_ITEM_>
              </formatRules>
              <id>format_1</id>
            </_ITEM_>
          </conditionalFormat>
          <criterion type="null"></criterion>
          <customLabel type="null"></customLabel>
          <dataSetColumnId>1</dataSetColumnId>
          <datasetScriptId>custdataset1</datasetScriptId>
          <fieldStateName>DISPLAY</fieldStateName>
          <sorting type="null"></sorting>
          <targetFieldContext>
            <name>DEFAULT</name>
          </targetFieldContext>
          <width type="null"></width>
        </_ITEM_>
      </columns>
      <order>1</order>
    </_ITEM_>
  </dataViews>
  <pivots type="array"></pivots>
  <Workbook>
    <id type="null"></id>
    <scriptId>custworkbook1</scriptId>
    <applicationId type="null"></applicationId>
    <version type="string">0.1</version>
    <name>
      <translationScriptId>custcollectiontranslations_workbook_1.workbook_name</translationScriptId>
    </name>
    <audience>
      <AudienceItems type="array"></AudienceItems>
      <isPublic type="boolean">false</isPublic>
    </audience>
    <ownerId>5</ownerId>
    <description type="null"></description>
    <dataViewIDs type="array">
      <_ITEM_>custview_table1</_ITEM_>
    </dataViewIDs>
    <pivotIDs type="array"></pivotIDs>
    <chartIDs type="array">
      <_ITEM_>custview_chart1</_ITEM_>
    </chartIDs>
    <_T_>workbook</_T_>
  </Workbook>
</root>
"#;

static TRACING: Once = Once::new();

/// Install an env-filtered subscriber once per test binary (`RUST_LOG`)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Translation collection holding `entries`, stored where `convention`
/// looks for collection `name`
pub fn translation_collection(convention: &ReferenceConvention, name: &str, entries: &[&str]) -> Artifact {
    let strings = entries
        .iter()
        .map(|entry| {
            (
                (*entry).to_string(),
                Value::object([
                    ("scriptid", Value::str(*entry)),
                    ("defaulttranslation", Value::str(format!("{entry} text"))),
                ]),
            )
        })
        .collect();
    let value = Value::object([
        ("scriptid", Value::str(name)),
        ("strings", Value::object([("string", Value::Object(strings))])),
    ]);
    Artifact::new(
        convention.collection_id(&ArtifactPath::new(name, "")),
        "translationcollection",
        value,
    )
}

/// Store holding the collections the sample definitions point at
pub fn sample_store(convention: &ReferenceConvention) -> InMemoryEntityStore {
    [
        translation_collection(convention, "custcollectiontranslations_dataset_1", &["dataset_name"]),
        translation_collection(
            convention,
            "custcollectiontranslations_workbook_1",
            &["workbook_name", "chart_name"],
        ),
    ]
    .into_iter()
    .collect()
}

/// Small registry: `doc` with a primitive `x`, a list `y` and a `wrapper`
/// variant field whose cases carry a translation label
pub fn variant_registry() -> SchemaRegistry {
    SchemaRegistry::builder()
        .object(ObjectType::new("label").field("translationScriptId", Schema::string()))
        .object(ObjectType::new("titled").field("title", Schema::named("label")))
        .object(ObjectType::new("captioned").field("caption", Schema::named("label")))
        .variant(VariantType::new("wrapper").case_named("titled").case_named("captioned"))
        .object(
            ObjectType::new("doc")
                .field("x", Schema::string())
                .field("y", Schema::list(Schema::number()))
                .field("wrapper", Schema::named("wrapper")),
        )
        .document("doc", Schema::named("doc"))
        .build()
        .unwrap_or_else(|e| panic!("BUG: test registry is invalid: {e}"))
}
