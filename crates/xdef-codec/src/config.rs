//! Codec configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Codec configuration
///
/// Every key is optional in TOML; missing keys take their defaults.
///
/// ```toml
/// pretty = true
/// indent = 2
/// max_document_bytes = 10485760
/// max_depth = 256
/// lookup_concurrency = 16
/// keep_empty = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Indent the encoded document, one element per line
    pub pretty: bool,
    /// Spaces per nesting level when pretty
    pub indent: usize,
    /// Largest definition accepted for decoding (bytes)
    pub max_document_bytes: usize,
    /// Deepest element nesting accepted for decoding
    pub max_depth: usize,
    /// Concurrent entity-store lookups while resolving references
    pub lookup_concurrency: usize,
    /// Keep empty objects and lists in decoded values
    pub keep_empty: bool,
}

impl CodecConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With pretty printing on or off
    #[inline]
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// With indent width
    #[inline]
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// With maximum document size
    #[inline]
    #[must_use]
    pub fn with_max_document_bytes(mut self, max: usize) -> Self {
        self.max_document_bytes = max;
        self
    }

    /// With maximum element nesting
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// With lookup concurrency
    #[inline]
    #[must_use]
    pub fn with_lookup_concurrency(mut self, limit: usize) -> Self {
        self.lookup_concurrency = limit;
        self
    }

    /// With empty-value pruning disabled (`true`) or enabled (`false`)
    #[inline]
    #[must_use]
    pub fn with_keep_empty(mut self, keep: bool) -> Self {
        self.keep_empty = keep;
        self
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for invalid TOML or mistyped keys
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid configuration
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
            max_document_bytes: 10 * 1024 * 1024,
            max_depth: 256,
            lookup_concurrency: 16,
            keep_empty: false,
        }
    }
}
