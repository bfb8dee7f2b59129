//! XDEF Codec - tagged-XML analytics definitions
//!
//! Converts between the tagged XML a platform stores for dataset and
//! workbook definitions and schema-shaped [`Value`](xdef_model::Value)s:
//!
//! ```text
//!              decode                                  encode
//!   XML ──► xml::parse ──► candidates ──► resolve_all     Value ──► Wrapper ──► xml::serialize ──► XML
//!                                │            │                       │
//!                                ▼            ▼                       ▼
//!                           Unwrapper ◄── Resolutions            Synthesizer
//!                                │                              (missing fields)
//!                                ▼
//!                              Value
//! ```
//!
//! Decoding is schema-advisory and resolves dotted translation paths into
//! references through an [`EntityStore`](xdef_refs::EntityStore); encoding
//! is schema-strict and fills in every field the value leaves out.
//!
//! # Example
//!
//! ```rust
//! use xdef_codec::prelude::*;
//! use xdef_refs::InMemoryEntityStore;
//!
//! # futures::executor::block_on(async {
//! let codec = Codec::standard();
//! let store = InMemoryEntityStore::new();
//!
//! let value = codec
//!     .decode("<root><version>1</version><_T_>dataSet</_T_></root>", DATASET, &store)
//!     .await
//!     .unwrap();
//! assert_eq!(value.get("version"), Some(&Value::str("1")));
//!
//! let xml = codec.encode(&value, DATASET).unwrap();
//! assert!(xml.contains("<version type=\"string\">1</version>"));
//! # });
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod layer;
pub mod synth;
pub mod unwrap;
pub mod wrap;
pub mod xml;

// Re-exports for convenience
pub use codec::{Codec, Decoded};
pub use config::CodecConfig;
pub use error::{
    ConfigError, DecodeError, DecodeResult, EncodeError, EncodeResult, LayerError, LayerResult,
};
pub use layer::AnalyticsLayer;
pub use synth::Synthesizer;
pub use unwrap::{reference_candidates, Unwrapper};
pub use wrap::Wrapper;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for decoding and encoding definitions
    pub use crate::{AnalyticsLayer, Codec, CodecConfig, DecodeError, Decoded, EncodeError};
    pub use xdef_model::{Artifact, Value};
    pub use xdef_schema::{SchemaRegistry, DATASET, WORKBOOK};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
