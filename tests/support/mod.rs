#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use taxii_store::{
    Collection, Datastore, DatastoreConfig, InMemoryCollectionTable, InMemoryObjectStore,
    ObjectStore, ResolvedPredicate, StixObject, StoreError, Timestamp, VersionRecord,
};

pub const COLLECTION: &str = "91a7b528-80eb-42ed-a74d-c6fbd5a26116";

pub type MemoryDatastore = Datastore<InMemoryObjectStore, InMemoryCollectionTable>;

pub fn object_id(object_type: &str, n: u32) -> String {
    format!("{}--{:08x}-0000-4000-8000-000000000000", object_type, n)
}

pub fn stix(object_type: &str, id: &str, modified: &str) -> StixObject {
    StixObject::from_json(json!({
        "type": object_type,
        "spec_version": "2.1",
        "id": id,
        "created": "2016-01-01T00:00:00Z",
        "modified": modified,
        "name": format!("{} at {}", id, modified),
    }))
    .unwrap()
}

pub fn indicator(id: &str, modified: &str) -> StixObject {
    stix("indicator", id, modified)
}

pub fn ts(value: &str) -> Timestamp {
    Timestamp::parse(value).unwrap()
}

pub fn datastore(config: DatastoreConfig) -> MemoryDatastore {
    Datastore::open(
        InMemoryObjectStore::new(),
        InMemoryCollectionTable::new(),
        config,
    )
    .unwrap()
}

/// A datastore with one empty, enabled collection named [`COLLECTION`].
pub fn datastore_with_collection(config: DatastoreConfig) -> MemoryDatastore {
    let ds = datastore(config);
    ds.add_collection(Collection::new(COLLECTION, "Test Collection"))
        .unwrap();
    ds
}

/// Store an object version and add it to a collection.
pub fn add_version<S, T>(ds: &Datastore<S, T>, collection: &str, object: StixObject) -> VersionRecord
where
    S: ObjectStore,
    T: taxii_store::CollectionTable,
{
    let id = object.id().to_string();
    ds.add_object(object).unwrap();
    ds.add_object_to_collection(collection, &id).unwrap()
}

/// Object store wrapper that counts calls and injects failures.
#[derive(Clone, Default)]
pub struct ProbeStore {
    pub inner: InMemoryObjectStore,
    pub queries: Arc<AtomicUsize>,
    pub lookups: Arc<AtomicUsize>,
    pub fail_get_for: Option<String>,
    pub fail_count: bool,
}

impl ProbeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_get_for(id: &str) -> Self {
        Self {
            fail_get_for: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_count() -> Self {
        Self {
            fail_count: true,
            ..Self::default()
        }
    }

    pub fn query_calls(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ObjectStore for ProbeStore {
    fn put_object(&self, object: StixObject) -> Result<(), StoreError> {
        self.inner.put_object(object)
    }

    fn get_object(&self, id: &str, modified: &Timestamp) -> Result<StixObject, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_get_for.as_deref() == Some(id) {
            return Err(StoreError::Backend(format!("injected failure for {}", id)));
        }
        self.inner.get_object(id, modified)
    }

    fn insert_version_record(
        &self,
        collection_key: i64,
        object_id: &str,
    ) -> Result<VersionRecord, StoreError> {
        self.inner.insert_version_record(collection_key, object_id)
    }

    fn count_versions(&self, collection_key: i64) -> Result<u64, StoreError> {
        if self.fail_count {
            return Err(StoreError::Backend("count unavailable".into()));
        }
        self.inner.count_versions(collection_key)
    }

    fn query_versions(
        &self,
        collection_key: i64,
        predicate: &ResolvedPredicate,
        limit: Option<usize>,
    ) -> Result<Vec<VersionRecord>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query_versions(collection_key, predicate, limit)
    }
}

pub type ProbeDatastore = Datastore<ProbeStore, InMemoryCollectionTable>;

pub fn probe_datastore(store: ProbeStore) -> ProbeDatastore {
    let ds = Datastore::open(
        store,
        InMemoryCollectionTable::new(),
        DatastoreConfig::default(),
    )
    .unwrap();
    ds.add_collection(Collection::new(COLLECTION, "Probe Collection"))
        .unwrap();
    ds
}
