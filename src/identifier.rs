//! STIX object identifiers: `<type>--<uuid>`.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DatastoreError;

const SEPARATOR: &str = "--";
const MIN_TYPE_LEN: usize = 3;
const MAX_TYPE_LEN: usize = 250;

/// A syntactically valid object identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse an identifier. With `strict` set the part after `--` must be a
    /// valid UUID; otherwise any non-empty run of alphanumerics and hyphens
    /// is accepted.
    pub fn parse(value: &str, strict: bool) -> Result<Self, DatastoreError> {
        let invalid = || DatastoreError::InvalidObjectId(value.to_string());

        let (object_type, uuid_part) = value.split_once(SEPARATOR).ok_or_else(invalid)?;
        if !is_valid_type(object_type) {
            return Err(invalid());
        }

        let uuid_ok = if strict {
            Uuid::try_parse(uuid_part).is_ok()
        } else {
            !uuid_part.is_empty()
                && uuid_part
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        };
        if !uuid_ok {
            return Err(invalid());
        }

        Ok(ObjectId(value.to_string()))
    }

    /// The type prefix, e.g. `indicator` for `indicator--…`.
    pub fn object_type(&self) -> &str {
        object_type_of(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Type prefix of a raw identifier string, or the whole string when it has
/// no separator.
pub fn object_type_of(id: &str) -> &str {
    id.split_once(SEPARATOR).map(|(t, _)| t).unwrap_or(id)
}

fn is_valid_type(value: &str) -> bool {
    let len = value.len();
    if !(MIN_TYPE_LEN..=MAX_TYPE_LEN).contains(&len) {
        return false;
    }
    let starts_with_letter = value
        .bytes()
        .next()
        .map(|b| b.is_ascii_lowercase())
        .unwrap_or(false);
    starts_with_letter
        && !value.ends_with('-')
        && value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
