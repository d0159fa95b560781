use std::fmt;

/// Failure reported by a storage collaborator (object store or collection table).
///
/// Backends wrap their native errors in `Backend`; the engine never inspects
/// them beyond passing them through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    LockPoisoned(&'static str),
    ObjectNotFound {
        id: String,
        version: String,
    },
    DuplicateObject {
        id: String,
        version: String,
    },
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::ObjectNotFound { id, version } => {
                write!(f, "object {} at version {} not found", id, version)
            }
            StoreError::DuplicateObject { id, version } => {
                write!(f, "object {} at version {} already stored", id, version)
            }
            StoreError::Backend(message) => write!(f, "storage backend error: {}", message),
        }
    }
}

impl std::error::Error for StoreError {}
