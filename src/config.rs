//! Datastore configuration.

use serde::Deserialize;

use crate::error::DatastoreError;

/// Record limit applied when the host does not configure one.
pub const DEFAULT_RECORD_LIMIT: i64 = 10_000;

/// Server-side settings for the query engine.
///
/// Loadable from JSON; every field is optional and falls back to its default.
///
/// ```ignore
/// let config = DatastoreConfig::from_json_str(r#"{ "record_limit": 500 }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatastoreConfig {
    /// Maximum records per response. Zero or negative means unbounded.
    pub record_limit: i64,
    /// Require the UUID part of object ids in filters to be a real UUID.
    pub strict_ids: bool,
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            record_limit: DEFAULT_RECORD_LIMIT,
            strict_ids: false,
        }
    }
}

impl DatastoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record_limit(mut self, limit: i64) -> Self {
        self.record_limit = limit;
        self
    }

    pub fn with_strict_ids(mut self, strict: bool) -> Self {
        self.strict_ids = strict;
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DatastoreError> {
        serde_json::from_str(raw).map_err(|e| DatastoreError::Config(e.to_string()))
    }

    pub(crate) fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            strict_ids: self.strict_ids,
        }
    }
}

/// Settings that affect filter validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub strict_ids: bool,
}
