//! TAXII collection datastore.
//!
//! Stores versions of STIX objects grouped into collections and answers
//! manifest, bundle and version queries over them: filter validation,
//! version selectors (`first`, `last`, `all`, exact timestamps), client and
//! server page-limit negotiation, and a shared collection cache kept in step
//! with storage.

mod collection;
mod config;
mod datastore;
mod error;
mod identifier;
mod object;
mod query;
mod store;
mod timestamp;
mod vocab;

pub use collection::{
    CacheEntry, Collection, CollectionCache, CollectionTable, InMemoryCollectionTable,
};
pub use config::{CompileOptions, DatastoreConfig, DEFAULT_RECORD_LIMIT};
pub use datastore::{
    BundleResult, Datastore, ManifestRecord, ManifestResult, PageInfo, VersionsResult,
};
pub use error::{DatastoreError, Result};
pub use identifier::{object_type_of, ObjectId};
pub use object::{StixObject, IMPLICIT_SPEC_VERSION};
pub use query::{
    effective_limit, fetch_size, truncate, Query, ResolvedPredicate, VersionBounds,
    VersionMatch, VersionRule,
};
pub use store::{InMemoryObjectStore, ObjectStore, StoreError, VersionRecord};
pub use timestamp::Timestamp;
pub use vocab::{
    is_object_type, media_type_for, SpecVersion, DEFAULT_STIX_MEDIA_TYPE,
    DEFAULT_TAXII_MEDIA_TYPE, OBJECT_TYPES,
};
