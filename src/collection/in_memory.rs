//! InMemoryCollectionTable - HashMap-backed collection table for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::store::StoreError;

use super::{Collection, CollectionTable};

/// In-memory collection table keyed by collection id.
///
/// Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryCollectionTable {
    storage: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryCollectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-populated with existing collections, as if loaded from disk.
    pub fn with_collections<I>(collections: I) -> Self
    where
        I: IntoIterator<Item = Collection>,
    {
        let storage = collections
            .into_iter()
            .map(|collection| (collection.id.clone(), collection))
            .collect();
        Self {
            storage: Arc::new(RwLock::new(storage)),
        }
    }
}

impl CollectionTable for InMemoryCollectionTable {
    fn list_all_collections(&self) -> Result<Vec<Collection>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("collections read"))?;
        let mut collections: Vec<Collection> = storage.values().cloned().collect();
        collections.sort_by_key(|collection| collection.key);
        Ok(collections)
    }

    fn insert_collection(&self, collection: &Collection) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("collections write"))?;
        if storage.contains_key(&collection.id) {
            return Err(StoreError::Backend(format!(
                "collection {} already stored",
                collection.id
            )));
        }
        storage.insert(collection.id.clone(), collection.clone());
        Ok(())
    }
}
