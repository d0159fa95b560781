//! CollectionCache - process-wide collection metadata shared by all requests.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::DatastoreError;
use crate::store::{ObjectStore, StoreError};

use super::{CacheEntry, Collection};

/// Collection metadata keyed by collection id.
///
/// Loaded once at startup, then kept in step with storage by the add
/// operations. One `RwLock` guards the whole map; size increments take the
/// write lock so concurrent adds never lose an update. Cloning shares the
/// same map.
#[derive(Clone, Default)]
pub struct CollectionCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl CollectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the cache from the collection table, asking the store for
    /// each collection's current size. Any failure aborts the load and
    /// leaves the cache untouched.
    pub fn load<S>(&self, collections: Vec<Collection>, store: &S) -> Result<(), DatastoreError>
    where
        S: ObjectStore + ?Sized,
    {
        let mut loaded = HashMap::with_capacity(collections.len());
        for collection in &collections {
            let mut entry = CacheEntry::from(collection);
            entry.size = store.count_versions(collection.key)?;
            tracing::debug!(
                collection = %entry.id,
                key = entry.key,
                size = entry.size,
                "loaded collection"
            );
            loaded.insert(entry.id.clone(), entry);
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned("cache write"))?;
        entries.extend(loaded);
        tracing::info!(collections = entries.len(), "collection cache loaded");
        Ok(())
    }

    pub fn exists(&self, id: &str) -> Result<bool, DatastoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned("cache read"))?;
        Ok(entries.contains_key(id))
    }

    pub fn get(&self, id: &str) -> Result<Option<CacheEntry>, DatastoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned("cache read"))?;
        Ok(entries.get(id).cloned())
    }

    /// Insert a new collection with size zero.
    pub fn add_collection(&self, mut entry: CacheEntry) -> Result<CacheEntry, DatastoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned("cache write"))?;
        if entries.contains_key(&entry.id) {
            return Err(DatastoreError::CollectionAlreadyExists(entry.id));
        }
        entry.size = 0;
        entries.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    /// Count one more committed version record. Returns the new size.
    ///
    /// # Panics
    ///
    /// If the collection is not cached. Records can only be inserted into a
    /// collection that was looked up first, so this is a caller bug.
    pub fn increment_size(&self, id: &str) -> Result<u64, DatastoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::LockPoisoned("cache write"))?;
        let size = entries.get_mut(id).map(|entry| {
            entry.size += 1;
            entry.size
        });
        // release before panicking so the map is not poisoned
        drop(entries);
        match size {
            Some(size) => Ok(size),
            None => panic!("size increment for uncached collection {}", id),
        }
    }

    /// Snapshot of cached collections ordered by key. Hidden collections are
    /// left out unless `include_hidden` is set.
    pub fn list(&self, include_hidden: bool) -> Result<Vec<CacheEntry>, DatastoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned("cache read"))?;
        let mut listed: Vec<CacheEntry> = entries
            .values()
            .filter(|entry| include_hidden || !entry.hidden)
            .cloned()
            .collect();
        listed.sort_by_key(|entry| entry.key);
        Ok(listed)
    }

    /// The next unused join key.
    pub fn next_key(&self) -> Result<i64, DatastoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned("cache read"))?;
        Ok(entries.values().map(|entry| entry.key).max().unwrap_or(0) + 1)
    }

    pub fn len(&self) -> Result<usize, DatastoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned("cache read"))?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, DatastoreError> {
        Ok(self.len()? == 0)
    }
}
