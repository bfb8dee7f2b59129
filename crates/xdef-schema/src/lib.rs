//! XDEF schema registry
//!
//! Describes the expected shape of every analytics definition so that
//! decoding can coerce scalars, encoding can synthesize missing fields, and
//! polymorphic values can be written with the right variant marker.
//!
//! # Core Concepts
//!
//! - [`Schema`]: primitive, list, or named type
//! - [`ObjectType`] / [`VariantType`]: named types with field and case
//!   annotations (literal text, no default, default literal, pass-through)
//! - [`SchemaRegistry`]: validated, immutable set of types plus one root per
//!   document kind; [`SchemaRegistry::global`] holds the built-in dataset and
//!   workbook schemas

mod builtin;
mod error;
mod registry;
mod schema;

pub use builtin::{DATASET, WORKBOOK};
pub use error::{SchemaError, SchemaResult};
pub use registry::{SchemaRegistry, SchemaRegistryBuilder};
pub use schema::{Field, ObjectType, PrimitiveKind, Resolved, Schema, TypeDef, VariantType};
