use crate::object::StixObject;
use crate::query::ResolvedPredicate;
use crate::timestamp::Timestamp;

use super::{StoreError, VersionRecord};

/// Storage collaborator holding object versions and collection membership.
///
/// Implementations must be safe to share between request threads.
pub trait ObjectStore: Send + Sync {
    /// Persist one object version. Fails if `(id, modified)` is already stored.
    fn put_object(&self, object: StixObject) -> Result<(), StoreError>;

    /// Load the version of `id` modified at exactly `modified`.
    fn get_object(&self, id: &str, modified: &Timestamp) -> Result<StixObject, StoreError>;

    /// Record the latest stored version of `object_id` as a member of the
    /// collection. The store stamps the insertion time; insertion times are
    /// strictly increasing.
    fn insert_version_record(
        &self,
        collection_key: i64,
        object_id: &str,
    ) -> Result<VersionRecord, StoreError>;

    /// Number of version records in a collection.
    fn count_versions(&self, collection_key: i64) -> Result<u64, StoreError>;

    /// Version records of a collection matching the predicate, ascending by
    /// insertion time, at most `limit` of them when given.
    fn query_versions(
        &self,
        collection_key: i64,
        predicate: &ResolvedPredicate,
        limit: Option<usize>,
    ) -> Result<Vec<VersionRecord>, StoreError>;
}
