//! XDEF data model
//!
//! Shared vocabulary of the definition codec.
//!
//! # Core Concepts
//!
//! - [`Node`]: generic tagged tree, the wire-level shape of a definition
//! - [`tag`]: marker spelling of the tagged encoding
//! - [`Value`]: decoded, schema-shaped value
//! - [`Reference`]: symbolic pointer to another artifact's field
//! - [`ElemPath`]: dotted hierarchical path
//! - [`Artifact`]: addressable unit held by an entity store

mod artifact;
mod node;
mod path;
mod reference;
pub mod tag;
mod value;

pub use artifact::Artifact;
pub use node::{Node, NodeMap};
pub use path::{ElemPath, PathError};
pub use reference::Reference;
pub use value::{canonical_bool, canonical_number, Number, Value, ValueMap};
