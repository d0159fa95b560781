//! The slice of a STIX object the datastore cares about.
//!
//! Object bodies are opaque JSON; only the envelope fields needed to index a
//! version (`id`, `type`, `spec_version`, `modified`) are read.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::DatastoreError;
use crate::identifier::ObjectId;
use crate::timestamp::Timestamp;

/// Spec version assumed for objects that carry no `spec_version` (STIX 2.0
/// objects never do).
pub const IMPLICIT_SPEC_VERSION: &str = "2.0";

/// One stored version of a STIX object.
#[derive(Debug, Clone, PartialEq)]
pub struct StixObject {
    id: ObjectId,
    spec_version: String,
    modified: Timestamp,
    body: Value,
}

impl StixObject {
    /// Index a JSON object. `modified` falls back to `created` for objects
    /// that are never revised.
    pub fn from_json(body: Value) -> Result<Self, DatastoreError> {
        let fields = body.as_object().ok_or_else(|| {
            DatastoreError::InvalidObject("object body is not a JSON object".into())
        })?;

        let raw_id = string_field(&body, "id")?;
        let id = ObjectId::parse(raw_id, false)?;

        let object_type = string_field(&body, "type")?;
        if object_type != id.object_type() {
            return Err(DatastoreError::InvalidObject(format!(
                "type {} does not match id {}",
                object_type, id
            )));
        }

        let spec_version = match fields.get("spec_version") {
            Some(Value::String(version)) => version.clone(),
            Some(_) => {
                return Err(DatastoreError::InvalidObject(
                    "spec_version must be a string".into(),
                ))
            }
            None => IMPLICIT_SPEC_VERSION.to_string(),
        };

        let modified = match fields.get("modified").or_else(|| fields.get("created")) {
            Some(Value::String(raw)) => Timestamp::parse_envelope(raw)?,
            _ => {
                return Err(DatastoreError::InvalidObject(format!(
                    "{} has no modified or created timestamp",
                    id
                )))
            }
        };

        Ok(StixObject {
            id,
            spec_version,
            modified,
            body,
        })
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn object_type(&self) -> &str {
        self.id.object_type()
    }

    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    pub fn modified(&self) -> Timestamp {
        self.modified
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

fn string_field<'a>(body: &'a Value, name: &str) -> Result<&'a str, DatastoreError> {
    body.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| DatastoreError::InvalidObject(format!("missing string field {}", name)))
}

impl Serialize for StixObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}
