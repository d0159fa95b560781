//! InMemoryObjectStore - HashMap-backed object store for testing and development.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::object::StixObject;
use crate::query::ResolvedPredicate;
use crate::timestamp::Timestamp;

use super::{ObjectStore, StoreError, VersionRecord};

/// In-memory object store.
///
/// Objects are keyed by id, then by `modified`. Version records live in one
/// append-only list, so insertion order is also `date_added` order.
/// Clone-friendly via Arc: clones share the same storage.
#[derive(Clone)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, BTreeMap<Timestamp, StixObject>>>>,
    records: Arc<RwLock<Vec<VersionRecord>>>,
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Total version records across all collections.
    pub fn record_count(&self) -> Result<usize, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("records read"))?;
        Ok(records.len())
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn put_object(&self, object: StixObject) -> Result<(), StoreError> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| StoreError::LockPoisoned("objects write"))?;

        let versions = objects.entry(object.id().to_string()).or_default();
        if versions.contains_key(&object.modified()) {
            return Err(StoreError::DuplicateObject {
                id: object.id().to_string(),
                version: object.modified().to_string(),
            });
        }
        versions.insert(object.modified(), object);
        Ok(())
    }

    fn get_object(&self, id: &str, modified: &Timestamp) -> Result<StixObject, StoreError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| StoreError::LockPoisoned("objects read"))?;

        objects
            .get(id)
            .and_then(|versions| versions.get(modified))
            .cloned()
            .ok_or_else(|| StoreError::ObjectNotFound {
                id: id.to_string(),
                version: modified.to_string(),
            })
    }

    fn insert_version_record(
        &self,
        collection_key: i64,
        object_id: &str,
    ) -> Result<VersionRecord, StoreError> {
        let (modified, spec_version) = {
            let objects = self
                .objects
                .read()
                .map_err(|_| StoreError::LockPoisoned("objects read"))?;
            let latest = objects
                .get(object_id)
                .and_then(|versions| versions.values().next_back())
                .ok_or_else(|| StoreError::ObjectNotFound {
                    id: object_id.to_string(),
                    version: "latest".to_string(),
                })?;
            (latest.modified(), latest.spec_version().to_string())
        };

        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::LockPoisoned("records write"))?;

        let now = Timestamp::now();
        let date_added = match records.last() {
            Some(previous) if previous.date_added >= now => previous.date_added.next_tick(),
            _ => now,
        };

        let record = VersionRecord {
            collection_key,
            object_id: object_id.to_string(),
            date_added,
            modified,
            spec_version,
        };
        records.push(record.clone());
        Ok(record)
    }

    fn count_versions(&self, collection_key: i64) -> Result<u64, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("records read"))?;
        Ok(records
            .iter()
            .filter(|record| record.collection_key == collection_key)
            .count() as u64)
    }

    fn query_versions(
        &self,
        collection_key: i64,
        predicate: &ResolvedPredicate,
        limit: Option<usize>,
    ) -> Result<Vec<VersionRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("records read"))?;

        let in_collection = records
            .iter()
            .filter(|record| record.collection_key == collection_key);

        let selected = predicate
            .select(in_collection)
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(selected)
    }
}
