//! STIX vocabularies the engine validates against, and the media types
//! reported for each spec version.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DatastoreError;

/// Media type reported for records whose spec version is not recognized.
pub const DEFAULT_STIX_MEDIA_TYPE: &str = "application/stix+json";

/// Media type new collections advertise when none are given.
pub const DEFAULT_TAXII_MEDIA_TYPE: &str = "application/taxii+json;version=2.1";

/// Every object type a filter may name.
pub const OBJECT_TYPES: &[&str] = &[
    // domain objects
    "attack-pattern",
    "campaign",
    "course-of-action",
    "grouping",
    "identity",
    "incident",
    "indicator",
    "infrastructure",
    "intrusion-set",
    "location",
    "malware",
    "malware-analysis",
    "note",
    "observed-data",
    "opinion",
    "report",
    "threat-actor",
    "tool",
    "vulnerability",
    // relationship objects
    "relationship",
    "sighting",
    // cyber-observable objects
    "artifact",
    "autonomous-system",
    "directory",
    "domain-name",
    "email-addr",
    "email-message",
    "file",
    "ipv4-addr",
    "ipv6-addr",
    "mac-addr",
    "mutex",
    "network-traffic",
    "process",
    "software",
    "url",
    "user-account",
    "windows-registry-key",
    "x509-certificate",
    // meta objects
    "extension-definition",
    "language-content",
    "marking-definition",
];

pub fn is_object_type(value: &str) -> bool {
    OBJECT_TYPES.contains(&value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecVersion {
    #[serde(rename = "2.0")]
    V2_0,
    #[serde(rename = "2.1")]
    V2_1,
}

impl SpecVersion {
    pub fn parse(token: &str) -> Result<Self, DatastoreError> {
        match token {
            "2.0" => Ok(SpecVersion::V2_0),
            "2.1" => Ok(SpecVersion::V2_1),
            other => Err(DatastoreError::InvalidSpecVersion(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecVersion::V2_0 => "2.0",
            SpecVersion::V2_1 => "2.1",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            SpecVersion::V2_0 => "application/stix+json;version=2.0",
            SpecVersion::V2_1 => "application/stix+json;version=2.1",
        }
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media type for a stored spec-version token. Legacy or unknown tokens get
/// the generic STIX media type instead of an error.
pub fn media_type_for(spec_version: &str) -> &'static str {
    SpecVersion::parse(spec_version)
        .map(|version| version.media_type())
        .unwrap_or(DEFAULT_STIX_MEDIA_TYPE)
}
