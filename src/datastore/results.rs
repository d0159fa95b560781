//! Response shapes handed back to the request layer.
//!
//! Serialized field names follow the TAXII envelope. Of the page metadata
//! only the `more` flag is part of the body; the insertion-time range and
//! collection size travel in response headers.

use serde::{Serialize, Serializer};

use crate::object::StixObject;
use crate::store::VersionRecord;
use crate::timestamp::Timestamp;
use crate::vocab;

/// Metadata about one matching object version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestRecord {
    pub id: String,
    pub date_added: Timestamp,
    pub version: Timestamp,
    pub media_type: String,
}

impl From<&VersionRecord> for ManifestRecord {
    fn from(record: &VersionRecord) -> Self {
        Self {
            id: record.object_id.clone(),
            date_added: record.date_added,
            version: record.modified,
            media_type: vocab::media_type_for(&record.spec_version).to_string(),
        }
    }
}

/// Shared result metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Records in the whole collection, from the cache.
    pub total_size: u64,
    pub first_added: Timestamp,
    pub last_added: Timestamp,
    pub more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestResult {
    #[serde(rename = "more", serialize_with = "more_flag")]
    pub info: PageInfo,
    pub objects: Vec<ManifestRecord>,
}

impl ManifestResult {
    pub fn more(&self) -> bool {
        self.info.more
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleResult {
    #[serde(rename = "more", serialize_with = "more_flag")]
    pub info: PageInfo,
    pub objects: Vec<StixObject>,
}

impl BundleResult {
    pub fn more(&self) -> bool {
        self.info.more
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionsResult {
    #[serde(rename = "more", serialize_with = "more_flag")]
    pub info: PageInfo,
    pub versions: Vec<Timestamp>,
}

impl VersionsResult {
    pub fn more(&self) -> bool {
        self.info.more
    }
}

fn more_flag<S: Serializer>(info: &PageInfo, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(info.more)
}
