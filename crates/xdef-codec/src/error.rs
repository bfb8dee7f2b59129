//! Error types for the definition codec
//!
//! Provides error handling for:
//! - Decode operations (XML text → value)
//! - Encode operations (value → XML text)
//! - Artifact reshaping on fetch and deploy
//! - Configuration loading

use std::path::PathBuf;
use xdef_model::ElemPath;

/// Errors while decoding a definition
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Text is not well-formed XML
    #[error("malformed document: {message}")]
    MalformedDocument { message: String },

    /// Well-formed, but the top-level element is not `<root>`
    #[error("document has no <root> element (found: {found})")]
    MissingRoot { found: String },

    /// Document exceeds the configured size limit
    #[error("document is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },

    /// Elements nest deeper than the configured limit
    #[error("elements nest deeper than {max} levels")]
    TooDeep { max: usize },

    /// No schema registered for the artifact kind
    #[error("no schema registered for artifact kind: {0}")]
    UnknownKind(String),
}

impl DecodeError {
    /// Create malformed document error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }
}

impl From<quick_xml::Error> for DecodeError {
    fn from(err: quick_xml::Error) -> Self {
        Self::malformed(err.to_string())
    }
}

/// Errors while encoding a definition
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Value shape conflicts with the schema
    #[error("schema mismatch at {path}: {reason}")]
    SchemaMismatch { path: ElemPath, reason: String },

    /// No schema registered for the artifact kind
    #[error("no schema registered for artifact kind: {0}")]
    UnknownKind(String),
}

impl EncodeError {
    /// Create schema mismatch error at `path`
    pub fn mismatch(path: &ElemPath, reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            path: path.clone(),
            reason: reason.into(),
        }
    }
}

/// Errors while reshaping whole artifacts
#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    /// Kind has no definition schema
    #[error("{id}: artifact kind {kind} carries no tagged definition")]
    UnsupportedKind { id: ElemPath, kind: String },

    /// Fetched artifact lacks its definition text
    #[error("{id}: missing string field 'definition'")]
    MissingDefinition { id: ElemPath },

    /// Definition text did not decode
    #[error("{id}: {source}")]
    Decode {
        id: ElemPath,
        #[source]
        source: DecodeError,
    },

    /// Value did not encode
    #[error("{id}: {source}")]
    Encode {
        id: ElemPath,
        #[source]
        source: EncodeError,
    },
}

impl LayerError {
    /// Id of the artifact that failed
    #[must_use]
    pub fn id(&self) -> &ElemPath {
        match self {
            Self::UnsupportedKind { id, .. }
            | Self::MissingDefinition { id }
            | Self::Decode { id, .. }
            | Self::Encode { id, .. } => id,
        }
    }
}

/// Errors while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML
    #[error("invalid codec configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for decoding
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for encoding
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Result type for artifact reshaping
pub type LayerResult<T> = Result<T, LayerError>;
