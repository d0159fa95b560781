use crate::store::StoreError;

use super::Collection;

/// Persistent table of collection metadata.
pub trait CollectionTable: Send + Sync {
    /// Every stored collection, enabled or not.
    fn list_all_collections(&self) -> Result<Vec<Collection>, StoreError>;

    /// Persist a new collection. The caller assigns its key.
    fn insert_collection(&self, collection: &Collection) -> Result<(), StoreError>;
}
