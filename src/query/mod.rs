//! Collection queries.
//!
//! A [`Query`] carries the raw filter parameters of one request exactly as
//! the HTTP layer received them. [`ResolvedPredicate::compile`] validates it
//! into a structured predicate that storage backends evaluate.
//!
//! ## Example
//!
//! ```ignore
//! use taxii_store::Query;
//!
//! let query = Query::new("91a7b528-80eb-42ed-a74d-c6fbd5a26116")
//!     .object_type("indicator")
//!     .version("first")
//!     .version("last")
//!     .added_after("2017-03-02T01:01:01.123Z")
//!     .limit("50");
//! let manifest = datastore.get_manifest(&query)?;
//! ```

mod pagination;
mod predicate;
mod version;

use serde::Deserialize;

pub use pagination::{effective_limit, fetch_size, truncate};
pub use predicate::ResolvedPredicate;
pub use version::{VersionBounds, VersionMatch, VersionRule};

/// Raw filter parameters for one collection request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Query {
    pub collection_id: String,
    pub object_ids: Vec<String>,
    pub object_types: Vec<String>,
    pub versions: Vec<String>,
    pub added_after: Option<String>,
    pub spec_versions: Vec<String>,
    pub limit: Option<String>,
}

impl Query {
    pub fn new(collection_id: impl Into<String>) -> Self {
        Self {
            collection_id: collection_id.into(),
            ..Self::default()
        }
    }

    pub fn object_id(mut self, id: impl Into<String>) -> Self {
        self.object_ids.push(id.into());
        self
    }

    pub fn object_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_types.push(object_type.into());
        self
    }

    pub fn version(mut self, selector: impl Into<String>) -> Self {
        self.versions.push(selector.into());
        self
    }

    pub fn added_after(mut self, timestamp: impl Into<String>) -> Self {
        self.added_after = Some(timestamp.into());
        self
    }

    pub fn spec_version(mut self, version: impl Into<String>) -> Self {
        self.spec_versions.push(version.into());
        self
    }

    pub fn limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// The client limit as the negotiator expects it; absent is empty.
    pub(crate) fn raw_limit(&self) -> &str {
        self.limit.as_deref().unwrap_or("")
    }
}
