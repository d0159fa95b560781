//! Datastore - the query and manifest engine.
//!
//! Ties the collection cache, the predicate compiler and the limit
//! negotiation to the storage collaborators, and exposes the operations the
//! request layer calls.
//!
//! ## Example
//!
//! ```ignore
//! use taxii_store::{
//!     Collection, Datastore, DatastoreConfig, InMemoryCollectionTable, InMemoryObjectStore,
//!     Query, StixObject,
//! };
//!
//! let datastore = Datastore::open(
//!     InMemoryObjectStore::new(),
//!     InMemoryCollectionTable::new(),
//!     DatastoreConfig::default(),
//! )?;
//! datastore.add_collection(Collection::new(collection_id, "Indicators"))?;
//! datastore.add_object(StixObject::from_json(indicator_json)?)?;
//! datastore.add_object_to_collection(collection_id, indicator_id)?;
//!
//! let manifest = datastore.get_manifest(&Query::new(collection_id).version("all"))?;
//! ```

mod results;

use std::sync::Mutex;

use crate::collection::{CacheEntry, Collection, CollectionCache, CollectionTable};
use crate::config::DatastoreConfig;
use crate::error::{DatastoreError, Result};
use crate::identifier::ObjectId;
use crate::object::StixObject;
use crate::query::{self, Query, ResolvedPredicate};
use crate::store::{ObjectStore, StoreError, VersionRecord};

pub use results::{BundleResult, ManifestRecord, ManifestResult, PageInfo, VersionsResult};

/// One page of matching version records.
struct Page {
    records: Vec<VersionRecord>,
    info: PageInfo,
}

/// The collection datastore.
///
/// Safe to share between request threads (wrap it in an `Arc`).
pub struct Datastore<S, T> {
    store: S,
    table: T,
    cache: CollectionCache,
    config: DatastoreConfig,
    admin: Mutex<()>,
}

impl<S, T> Datastore<S, T>
where
    S: ObjectStore,
    T: CollectionTable,
{
    /// Load every collection from the table into the cache and return a
    /// datastore ready to serve requests. Fails if any collection's size
    /// cannot be read.
    pub fn open(store: S, table: T, config: DatastoreConfig) -> Result<Self> {
        let cache = CollectionCache::new();
        let collections = table.list_all_collections()?;
        cache.load(collections, &store)?;

        Ok(Self {
            store,
            table,
            cache,
            config,
            admin: Mutex::new(()),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Manifest of the version records matching `query`.
    pub fn get_manifest(&self, query: &Query) -> Result<ManifestResult> {
        let page = self.fetch(query)?;
        Ok(ManifestResult {
            info: page.info,
            objects: page.records.iter().map(ManifestRecord::from).collect(),
        })
    }

    /// Full objects for the version records matching `query`, in insertion
    /// order. The first object that cannot be loaded fails the whole bundle.
    pub fn get_bundle(&self, query: &Query) -> Result<BundleResult> {
        let page = self.fetch(query)?;
        let mut objects = Vec::with_capacity(page.records.len());
        for record in &page.records {
            objects.push(self.store.get_object(&record.object_id, &record.modified)?);
        }
        Ok(BundleResult {
            info: page.info,
            objects,
        })
    }

    /// The `modified` timestamps of matching versions. Without an explicit
    /// selector every version is listed.
    pub fn get_versions(&self, query: &Query) -> Result<VersionsResult> {
        let page = if query.versions.is_empty() {
            self.fetch(&query.clone().version("all"))?
        } else {
            self.fetch(query)?
        };
        Ok(VersionsResult {
            info: page.info,
            versions: page.records.iter().map(|record| record.modified).collect(),
        })
    }

    /// Create a collection: assign its join key, persist it, then cache it.
    pub fn add_collection(&self, collection: Collection) -> Result<CacheEntry> {
        if collection.id.is_empty() {
            return Err(DatastoreError::MissingCollectionId);
        }

        let _admin = self
            .admin
            .lock()
            .map_err(|_| StoreError::LockPoisoned("admin"))?;

        if self.cache.exists(&collection.id)? {
            return Err(DatastoreError::CollectionAlreadyExists(collection.id));
        }

        let collection = Collection {
            key: self.cache.next_key()?,
            size: 0,
            ..collection
        };
        self.table.insert_collection(&collection)?;
        let entry = self.cache.add_collection(CacheEntry::from(&collection))?;

        tracing::info!(
            collection = %entry.id,
            key = entry.key,
            hidden = entry.hidden,
            "collection added"
        );
        Ok(entry)
    }

    /// Persist one object version so it can later be added to collections.
    /// The id is held to the same grammar as collection adds, so an object
    /// that could never join a collection is refused here.
    pub fn add_object(&self, object: StixObject) -> Result<()> {
        let id = ObjectId::parse(object.id().as_str(), self.config.strict_ids)?;
        let modified = object.modified();
        self.store.put_object(object)?;
        tracing::debug!(object = %id, version = %modified, "object version stored");
        Ok(())
    }

    /// Add the latest stored version of an object to a collection and count
    /// it in the cache once the store has committed it.
    pub fn add_object_to_collection(
        &self,
        collection_id: &str,
        object_id: &str,
    ) -> Result<VersionRecord> {
        if collection_id.is_empty() {
            return Err(DatastoreError::MissingCollectionId);
        }
        let object_id = ObjectId::parse(object_id, self.config.strict_ids)?;
        let entry = self
            .cache
            .get(collection_id)?
            .ok_or_else(|| DatastoreError::CollectionNotFound(collection_id.to_string()))?;

        let record = self
            .store
            .insert_version_record(entry.key, object_id.as_str())?;
        let size = self.cache.increment_size(collection_id)?;

        tracing::debug!(
            collection = %collection_id,
            object = %object_id,
            version = %record.modified,
            size,
            "object added to collection"
        );
        Ok(record)
    }

    /// Cached collections, ordered by key.
    pub fn list_collections(&self, include_hidden: bool) -> Result<Vec<CacheEntry>> {
        self.cache.list(include_hidden)
    }

    pub fn collection(&self, id: &str) -> Result<CacheEntry> {
        self.cache
            .get(id)?
            .ok_or_else(|| DatastoreError::CollectionNotFound(id.to_string()))
    }

    /// Validate, negotiate the limit, query the store and cut the page.
    fn fetch(&self, query: &Query) -> Result<Page> {
        if query.collection_id.is_empty() {
            return Err(DatastoreError::MissingCollectionId);
        }

        let entry = self.readable_collection(&query.collection_id)?;
        let predicate = ResolvedPredicate::compile(query, &self.config.compile_options())?;
        let limit = query::effective_limit(self.config.record_limit, query.raw_limit());

        tracing::debug!(
            collection = %entry.id,
            limit,
            versions = ?predicate.versions,
            "querying collection"
        );

        let rows = self
            .store
            .query_versions(entry.key, &predicate, query::fetch_size(limit))?;
        if rows.is_empty() {
            tracing::debug!(collection = %entry.id, "no records matched");
            return Err(DatastoreError::NoRecordsFound);
        }

        let (records, more) = query::truncate(rows, limit);
        let (first_added, last_added) = match (records.first(), records.last()) {
            (Some(first), Some(last)) => (first.date_added, last.date_added),
            _ => return Err(DatastoreError::NoRecordsFound),
        };

        Ok(Page {
            info: PageInfo {
                total_size: entry.size,
                first_added,
                last_added,
                more,
            },
            records,
        })
    }

    fn readable_collection(&self, id: &str) -> Result<CacheEntry> {
        match self.cache.get(id)? {
            Some(entry) if entry.enabled => Ok(entry),
            Some(_) => {
                tracing::warn!(collection = %id, "query against disabled collection");
                Err(DatastoreError::CollectionNotFound(id.to_string()))
            }
            None => Err(DatastoreError::CollectionNotFound(id.to_string())),
        }
    }
}
