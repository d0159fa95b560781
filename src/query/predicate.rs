//! Validated query predicates.

use std::collections::HashMap;

use crate::config::CompileOptions;
use crate::error::DatastoreError;
use crate::identifier::ObjectId;
use crate::store::VersionRecord;
use crate::timestamp::Timestamp;
use crate::vocab::{self, SpecVersion};

use super::version::{VersionBounds, VersionRule};
use super::Query;

/// A query whose every field has been validated.
///
/// Fields combine with AND; the values inside a field combine with OR. An
/// empty list places no constraint on its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPredicate {
    pub collection_id: String,
    pub object_ids: Vec<ObjectId>,
    pub object_types: Vec<String>,
    pub versions: VersionRule,
    pub added_after: Option<Timestamp>,
    pub spec_versions: Vec<SpecVersion>,
}

impl ResolvedPredicate {
    /// Validate a raw query. The first invalid value fails the whole query.
    pub fn compile(query: &Query, options: &CompileOptions) -> Result<Self, DatastoreError> {
        if query.collection_id.is_empty() {
            return Err(DatastoreError::MissingCollectionId);
        }

        let added_after = query
            .added_after
            .as_deref()
            .map(Timestamp::parse)
            .transpose()?;

        let object_ids = query
            .object_ids
            .iter()
            .map(|id| ObjectId::parse(id, options.strict_ids))
            .collect::<Result<Vec<_>, _>>()?;

        let object_types = query
            .object_types
            .iter()
            .map(|object_type| {
                if vocab::is_object_type(object_type) {
                    Ok(object_type.clone())
                } else {
                    Err(DatastoreError::InvalidObjectType(object_type.clone()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let versions = VersionRule::resolve(query.versions.as_slice())?;

        let spec_versions = query
            .spec_versions
            .iter()
            .map(|token| SpecVersion::parse(token))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedPredicate {
            collection_id: query.collection_id.clone(),
            object_ids,
            object_types,
            versions,
            added_after,
            spec_versions,
        })
    }

    /// Id, type and spec-version constraints. These decide which versions
    /// take part in `first`/`last` resolution.
    pub fn matches_object(&self, record: &VersionRecord) -> bool {
        let id_ok = self.object_ids.is_empty()
            || self
                .object_ids
                .iter()
                .any(|id| id.as_str() == record.object_id);
        let type_ok = self.object_types.is_empty()
            || self
                .object_types
                .iter()
                .any(|t| t == record.object_type());
        let spec_ok = self.spec_versions.is_empty()
            || self
                .spec_versions
                .iter()
                .any(|v| v.as_str() == record.spec_version);
        id_ok && type_ok && spec_ok
    }

    /// Strictly-after check on the insertion time.
    pub fn matches_added_after(&self, record: &VersionRecord) -> bool {
        self.added_after
            .map(|after| record.date_added > after)
            .unwrap_or(true)
    }

    /// Evaluate the predicate over one collection's records by scanning them.
    ///
    /// Version bounds are taken over the records that pass
    /// [`matches_object`](Self::matches_object); `added_after` applies to the
    /// selected versions. Output keeps the input order.
    pub fn select<'a, I>(&self, records: I) -> Vec<&'a VersionRecord>
    where
        I: IntoIterator<Item = &'a VersionRecord>,
    {
        let candidates: Vec<&VersionRecord> = records
            .into_iter()
            .filter(|record| self.matches_object(record))
            .collect();

        let mut bounds: HashMap<&str, VersionBounds> = HashMap::new();
        if self.versions.needs_bounds() {
            for record in &candidates {
                bounds
                    .entry(record.object_id.as_str())
                    .and_modify(|b| b.include(record.modified))
                    .or_insert_with(|| VersionBounds::of(record.modified));
            }
        }

        candidates
            .into_iter()
            .filter(|record| {
                let own = VersionBounds::of(record.modified);
                let object_bounds = bounds.get(record.object_id.as_str()).unwrap_or(&own);
                self.versions.admits(record.modified, object_bounds)
            })
            .filter(|record| self.matches_added_after(record))
            .collect()
    }
}
