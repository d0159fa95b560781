use std::fmt;

use crate::store::StoreError;

/// Errors surfaced by the datastore engine.
///
/// Validation variants are always produced before any storage access.
/// `NoRecordsFound` is an ordinary empty result, not a fault; `Store` wraps
/// an infrastructure failure from a collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatastoreError {
    MissingCollectionId,
    InvalidTimestamp(String),
    InvalidObjectId(String),
    InvalidObjectType(String),
    InvalidSpecVersion(String),
    InvalidVersionToken(String),
    InvalidVersionCombination(String),
    InvalidObject(String),
    CollectionNotFound(String),
    CollectionAlreadyExists(String),
    NoRecordsFound,
    Config(String),
    Store(StoreError),
}

impl DatastoreError {
    /// True when the request itself was at fault (bad filter, unknown
    /// collection, nothing matched) rather than the storage layer.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, DatastoreError::Store(_) | DatastoreError::Config(_))
    }
}

impl fmt::Display for DatastoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatastoreError::MissingCollectionId => write!(f, "no collection id was provided"),
            DatastoreError::InvalidTimestamp(value) => {
                write!(f, "invalid timestamp: {:?}", value)
            }
            DatastoreError::InvalidObjectId(value) => {
                write!(f, "invalid object id: {:?}", value)
            }
            DatastoreError::InvalidObjectType(value) => {
                write!(f, "invalid object type: {:?}", value)
            }
            DatastoreError::InvalidSpecVersion(value) => {
                write!(f, "invalid spec version: {:?}", value)
            }
            DatastoreError::InvalidVersionToken(value) => {
                write!(f, "invalid version selector: {:?}", value)
            }
            DatastoreError::InvalidVersionCombination(message) => {
                write!(f, "invalid version selector combination: {}", message)
            }
            DatastoreError::InvalidObject(message) => write!(f, "invalid object: {}", message),
            DatastoreError::CollectionNotFound(id) => write!(f, "collection {} not found", id),
            DatastoreError::CollectionAlreadyExists(id) => {
                write!(f, "collection {} already exists", id)
            }
            DatastoreError::NoRecordsFound => write!(f, "no records found"),
            DatastoreError::Config(message) => write!(f, "invalid configuration: {}", message),
            DatastoreError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DatastoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatastoreError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for DatastoreError {
    fn from(err: StoreError) -> Self {
        DatastoreError::Store(err)
    }
}

pub type Result<T> = std::result::Result<T, DatastoreError>;
