//! XDEF reference resolution
//!
//! Embedded dotted strings such as `custcollectiontranslations_wb.name_1`
//! point at entries of translation collections. On fetch they become
//! symbolic [`Reference`](xdef_model::Reference)s when the entry exists in the
//! [`EntityStore`]; on deploy references render back to the dotted form.
//!
//! # Example
//!
//! ```rust
//! use xdef_refs::{InMemoryEntityStore, ReferenceConvention, ReferenceResolver};
//!
//! # futures::executor::block_on(async {
//! let convention = ReferenceConvention::standard();
//! let store = InMemoryEntityStore::new();
//! let resolver = ReferenceResolver::new(&convention, &store);
//!
//! let path = resolver.parse_path("custcollectiontranslations_wb.name_1").unwrap();
//! // Nothing in the store: the caller keeps the literal text.
//! assert!(resolver.resolve(&path).await.is_none());
//! # });
//! ```

pub mod convention;
pub mod resolver;
pub mod store;

pub use convention::{ArtifactPath, ReferenceConvention};
pub use resolver::{ReferenceResolver, Resolutions};
pub use store::{EntityStore, InMemoryEntityStore};
