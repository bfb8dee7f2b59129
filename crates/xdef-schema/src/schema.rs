//! Schema descriptors
//!
//! A [`Schema`] is either a primitive, a list, or the name of an object or
//! variant type held by the [`SchemaRegistry`](crate::SchemaRegistry).
//! Named types give recursion without cyclic ownership.

use indexmap::IndexMap;
use xdef_model::Value;

/// Scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Text; never coerced on decode
    String,
    /// Number
    Number,
    /// Boolean
    Boolean,
    /// Any scalar
    Unknown,
}

/// Shape expected at one position of a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// Scalar
    Primitive(PrimitiveKind),
    /// List with the given item schema
    List(Box<Schema>),
    /// Object or variant type registered under this name
    Named(String),
}

impl Schema {
    /// `Primitive(String)`
    #[inline]
    #[must_use]
    pub fn string() -> Self {
        Self::Primitive(PrimitiveKind::String)
    }

    /// `Primitive(Number)`
    #[inline]
    #[must_use]
    pub fn number() -> Self {
        Self::Primitive(PrimitiveKind::Number)
    }

    /// `Primitive(Boolean)`
    #[inline]
    #[must_use]
    pub fn boolean() -> Self {
        Self::Primitive(PrimitiveKind::Boolean)
    }

    /// `Primitive(Unknown)`
    #[inline]
    #[must_use]
    pub fn unknown() -> Self {
        Self::Primitive(PrimitiveKind::Unknown)
    }

    /// List of `item`
    #[inline]
    #[must_use]
    pub fn list(item: Schema) -> Self {
        Self::List(Box::new(item))
    }

    /// Reference to a named type
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub(crate) fn named_type(&self) -> Option<&str> {
        match self {
            Self::Primitive(_) => None,
            Self::List(item) => item.named_type(),
            Self::Named(name) => Some(name),
        }
    }
}

/// One field of an object type
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    schema: Schema,
    literal_text: bool,
    no_default: bool,
    default: Option<Value>,
}

impl Field {
    /// Field of the given schema
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            literal_text: false,
            no_default: false,
            default: None,
        }
    }

    /// Written as a CDATA section
    #[must_use]
    pub fn literal_text(mut self) -> Self {
        self.literal_text = true;
        self
    }

    /// Never added by default synthesis
    #[must_use]
    pub fn no_default(mut self) -> Self {
        self.no_default = true;
        self
    }

    /// Value used when the field is missing
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Field schema
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// True if written as a CDATA section
    #[inline]
    #[must_use]
    pub fn is_literal_text(&self) -> bool {
        self.literal_text
    }

    /// True if excluded from default synthesis
    #[inline]
    #[must_use]
    pub fn is_no_default(&self) -> bool {
        self.no_default
    }

    /// Default literal
    #[inline]
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

impl From<Schema> for Field {
    fn from(schema: Schema) -> Self {
        Self::new(schema)
    }
}

/// Structured type with ordered fields
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    name: String,
    fields: IndexMap<String, Field>,
    tag: Option<String>,
    default: Option<Value>,
}

impl ObjectType {
    /// Object type without fields
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            tag: None,
            default: None,
        }
    }

    /// Append a field; field order is the synthesis order
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.fields.insert(name.into(), field.into());
        self
    }

    /// Constant variant marker carried by every instance of this type
    ///
    /// The marker is dropped on decode and appended on encode.
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Value used wherever the type is synthesized
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, Field> {
        &self.fields
    }

    /// Field by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Constant variant marker
    #[inline]
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Type-level default
    #[inline]
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Closed set of named cases
#[derive(Debug, Clone, PartialEq)]
pub struct VariantType {
    name: String,
    cases: IndexMap<String, Schema>,
    inline: bool,
    default: Option<Value>,
}

impl VariantType {
    /// Variant without cases
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: IndexMap::new(),
            inline: false,
            default: None,
        }
    }

    /// Add a case
    #[must_use]
    pub fn case(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.cases.insert(name.into(), schema);
        self
    }

    /// Add a case whose payload type has the same name as the case
    #[must_use]
    pub fn case_named(self, name: &str) -> Self {
        self.case(name, Schema::named(name))
    }

    /// Pass-through variant: the payload is the value itself
    #[must_use]
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Value used wherever the type is synthesized
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cases in declaration order
    #[inline]
    #[must_use]
    pub fn cases(&self) -> &IndexMap<String, Schema> {
        &self.cases
    }

    /// Payload schema of a case
    #[inline]
    #[must_use]
    pub fn case_schema(&self, case: &str) -> Option<&Schema> {
        self.cases.get(case)
    }

    /// The only case, if there is exactly one
    #[must_use]
    pub fn sole_case(&self) -> Option<(&str, &Schema)> {
        match self.cases.len() {
            1 => self.cases.first().map(|(name, schema)| (name.as_str(), schema)),
            _ => None,
        }
    }

    /// True for a pass-through variant
    #[inline]
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Type-level default
    #[inline]
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Registered type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDef {
    /// Object type
    Object(ObjectType),
    /// Variant type
    Variant(VariantType),
}

impl TypeDef {
    /// Type name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Object(object) => object.name(),
            Self::Variant(variant) => variant.name(),
        }
    }

    /// Type-level default
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        match self {
            Self::Object(object) => object.default(),
            Self::Variant(variant) => variant.default(),
        }
    }
}

/// A schema with its named type looked up
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// Scalar
    Primitive(PrimitiveKind),
    /// List with this item schema
    List(&'a Schema),
    /// Object type
    Object(&'a ObjectType),
    /// Variant type
    Variant(&'a VariantType),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_annotations() {
        let field = Field::new(Schema::string())
            .literal_text()
            .no_default()
            .with_default(Value::str("x"));
        assert!(field.is_literal_text());
        assert!(field.is_no_default());
        assert_eq!(field.default(), Some(&Value::str("x")));
    }

    #[test]
    fn object_keeps_field_order() {
        let object = ObjectType::new("sorting")
            .field("order", Schema::number())
            .field("direction", Schema::string())
            .field("caseSensitive", Schema::boolean());
        let names: Vec<_> = object.fields().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["order", "direction", "caseSensitive"]);
        assert_eq!(object.tag(), None);
    }

    #[test]
    fn sole_case() {
        let single = VariantType::new("color").case_named("rgbColor");
        assert_eq!(single.sole_case().map(|(name, _)| name), Some("rgbColor"));
        let double = single.clone().case_named("hexColor");
        assert!(double.sole_case().is_none());
    }

    #[test]
    fn nested_list_names() {
        assert_eq!(Schema::list(Schema::list(Schema::named("join"))).named_type(), Some("join"));
        assert_eq!(Schema::list(Schema::string()).named_type(), None);
    }
}
