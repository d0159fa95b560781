//! Object store: persisted object versions and their collection membership.
//!
//! The engine only talks to storage through [`ObjectStore`]; the in-memory
//! backend is provided for development and tests.

mod error;
mod in_memory;
mod object_store;

use serde::{Deserialize, Serialize};

use crate::identifier::object_type_of;
use crate::timestamp::Timestamp;

pub use error::StoreError;
pub use in_memory::InMemoryObjectStore;
pub use object_store::ObjectStore;

/// One version of one object, as a member of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub collection_key: i64,
    pub object_id: String,
    pub date_added: Timestamp,
    pub modified: Timestamp,
    pub spec_version: String,
}

impl VersionRecord {
    pub fn object_type(&self) -> &str {
        object_type_of(&self.object_id)
    }
}
