//! Integration tests for manifest queries.

#[path = "../support/mod.rs"]
mod support;

use support::{
    add_version, datastore_with_collection, indicator, object_id, probe_datastore, stix, ts,
    ProbeStore, COLLECTION,
};
use taxii_store::{Collection, DatastoreConfig, DatastoreError, Query, DEFAULT_STIX_MEDIA_TYPE};

#[test]
fn round_trip_first_last_all() {
    let ds = datastore_with_collection(DatastoreConfig::default());
    let x = object_id("indicator", 1);
    let (t1, t2, t3) = (
        "2020-01-01T00:00:00Z",
        "2020-02-01T00:00:00.5Z",
        "2020-03-01T12:00:00.123456Z",
    );

    add_version(&ds, COLLECTION, indicator(&x, t1));
    add_version(&ds, COLLECTION, indicator(&x, t2));
    add_version(&ds, COLLECTION, indicator(&x, t3));
    assert_eq!(ds.collection(COLLECTION).unwrap().size, 3);

    let last = ds
        .get_manifest(&Query::new(COLLECTION).version("last"))
        .unwrap();
    assert_eq!(last.objects.len(), 1);
    assert_eq!(last.objects[0].id, x);
    assert_eq!(last.objects[0].version, ts(t3));

    let all = ds
        .get_manifest(&Query::new(COLLECTION).version("all"))
        .unwrap();
    let versions: Vec<_> = all.objects.iter().map(|r| r.version).collect();
    assert_eq!(versions, vec![ts(t1), ts(t2), ts(t3)]);
    assert!(all
        .objects
        .windows(2)
        .all(|pair| pair[0].date_added < pair[1].date_added));
    assert_eq!(all.info.total_size, 3);
    assert!(!all.more());

    let first = ds
        .get_manifest(&Query::new(COLLECTION).version("first"))
        .unwrap();
    assert_eq!(first.objects.len(), 1);
    assert_eq!(first.objects[0].version, ts(t1));
}

#[test]
fn no_selector_means_latest() {
    let ds = datastore_with_collection(DatastoreConfig::default());
    let x = object_id("indicator", 1);
    add_version(&ds, COLLECTION, indicator(&x, "2020-01-01T00:00:00Z"));
    add_version(&ds, COLLECTION, indicator(&x, "2021-01-01T00:00:00Z"));

    let manifest = ds.get_manifest(&Query::new(COLLECTION)).unwrap();
    assert_eq!(manifest.objects.len(), 1);
    assert_eq!(manifest.objects[0].version, ts("2021-01-01T00:00:00Z"));
}

#[test]
fn first_or_last_or_exact() {
    let ds = datastore_with_collection(DatastoreConfig::default());
    let x = object_id("indicator", 1);
    for modified in [
        "2020-01-01T00:00:00Z",
        "2020-02-01T00:00:00Z",
        "2020-03-01T00:00:00Z",
        "2020-04-01T00:00:00Z",
    ] {
        add_version(&ds, COLLECTION, indicator(&x, modified));
    }

    let manifest = ds
        .get_manifest(
            &Query::new(COLLECTION)
                .version("first")
                .version("last")
                .version("2020-02-01T00:00:00Z"),
        )
        .unwrap();
    let versions: Vec<_> = manifest.objects.iter().map(|r| r.version).collect();
    assert_eq!(
        versions,
        vec![
            ts("2020-01-01T00:00:00Z"),
            ts("2020-02-01T00:00:00Z"),
            ts("2020-04-01T00:00:00Z"),
        ]
    );
}

#[test]
fn truncates_one_past_the_limit() {
    let ds = datastore_with_collection(DatastoreConfig::default().with_record_limit(20));
    for n in 0..21 {
        add_version(
            &ds,
            COLLECTION,
            indicator(&object_id("indicator", n), "2020-01-01T00:00:00Z"),
        );
    }

    let manifest = ds.get_manifest(&Query::new(COLLECTION)).unwrap();
    assert_eq!(manifest.objects.len(), 20);
    assert!(manifest.more());
    assert!(manifest.info.more);
    assert_eq!(manifest.info.total_size, 21);
    assert_eq!(manifest.objects[19].id, object_id("indicator", 19));
    assert_eq!(manifest.info.first_added, manifest.objects[0].date_added);
    assert_eq!(manifest.info.last_added, manifest.objects[19].date_added);
}

#[test]
fn exact_page_has_no_more() {
    let ds = datastore_with_collection(DatastoreConfig::default().with_record_limit(20));
    for n in 0..20 {
        add_version(
            &ds,
            COLLECTION,
            indicator(&object_id("indicator", n), "2020-01-01T00:00:00Z"),
        );
    }

    let manifest = ds.get_manifest(&Query::new(COLLECTION)).unwrap();
    assert_eq!(manifest.objects.len(), 20);
    assert!(!manifest.more());
}

#[test]
fn client_limit_is_negotiated() {
    let ds = datastore_with_collection(DatastoreConfig::default().with_record_limit(10));
    for n in 0..30 {
        add_version(
            &ds,
            COLLECTION,
            indicator(&object_id("indicator", n), "2020-01-01T00:00:00Z"),
        );
    }

    let small = ds
        .get_manifest(&Query::new(COLLECTION).limit("3"))
        .unwrap();
    assert_eq!(small.objects.len(), 3);
    assert!(small.more());

    let greedy = ds
        .get_manifest(&Query::new(COLLECTION).limit("500"))
        .unwrap();
    assert_eq!(greedy.objects.len(), 10);

    let malformed = ds
        .get_manifest(&Query::new(COLLECTION).limit("lots"))
        .unwrap();
    assert_eq!(malformed.objects.len(), 10);
}

#[test]
fn unbounded_server_returns_everything() {
    let ds = datastore_with_collection(DatastoreConfig::default().with_record_limit(0));
    for n in 0..30 {
        add_version(
            &ds,
            COLLECTION,
            indicator(&object_id("indicator", n), "2020-01-01T00:00:00Z"),
        );
    }

    let manifest = ds.get_manifest(&Query::new(COLLECTION)).unwrap();
    assert_eq!(manifest.objects.len(), 30);
    assert!(!manifest.more());

    let client_bound = ds
        .get_manifest(&Query::new(COLLECTION).limit("5"))
        .unwrap();
    assert_eq!(client_bound.objects.len(), 5);
    assert!(client_bound.more());
}

#[test]
fn paging_with_added_after() {
    let ds = datastore_with_collection(DatastoreConfig::default().with_record_limit(4));
    for n in 0..10 {
        add_version(
            &ds,
            COLLECTION,
            indicator(&object_id("indicator", n), "2020-01-01T00:00:00Z"),
        );
    }

    let mut seen = Vec::new();
    let mut query = Query::new(COLLECTION);
    loop {
        let page = ds.get_manifest(&query).unwrap();
        seen.extend(page.objects.iter().map(|r| r.id.clone()));
        if !page.more() {
            break;
        }
        query = Query::new(COLLECTION).added_after(page.info.last_added.to_string());
    }

    let expected: Vec<_> = (0..10).map(|n| object_id("indicator", n)).collect();
    assert_eq!(seen, expected);
}

#[test]
fn filters_combine() {
    let ds = datastore_with_collection(DatastoreConfig::default());
    let ind = object_id("indicator", 1);
    let mal = object_id("malware", 2);
    let tool = object_id("tool", 3);
    add_version(&ds, COLLECTION, indicator(&ind, "2020-01-01T00:00:00Z"));
    add_version(&ds, COLLECTION, stix("malware", &mal, "2020-01-01T00:00:00Z"));
    add_version(&ds, COLLECTION, stix("tool", &tool, "2020-01-01T00:00:00Z"));

    let by_type = ds
        .get_manifest(
            &Query::new(COLLECTION)
                .object_type("malware")
                .object_type("tool"),
        )
        .unwrap();
    let ids: Vec<_> = by_type.objects.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec![mal.clone(), tool.clone()]);

    let by_id_and_type = ds
        .get_manifest(
            &Query::new(COLLECTION)
                .object_id(ind.clone())
                .object_id(mal.clone())
                .object_type("malware"),
        )
        .unwrap();
    assert_eq!(by_id_and_type.objects.len(), 1);
    assert_eq!(by_id_and_type.objects[0].id, mal);

    let conflicting = ds.get_manifest(
        &Query::new(COLLECTION)
            .object_id(ind)
            .object_type("tool"),
    );
    assert_eq!(conflicting.unwrap_err(), DatastoreError::NoRecordsFound);
}

#[test]
fn spec_version_filter_and_media_types() {
    let ds = datastore_with_collection(DatastoreConfig::default());
    let modern = object_id("indicator", 1);
    let legacy = object_id("indicator", 2);
    let odd = object_id("indicator", 3);
    add_version(&ds, COLLECTION, indicator(&modern, "2020-01-01T00:00:00Z"));
    ds.add_object(
        taxii_store::StixObject::from_json(serde_json::json!({
            "type": "indicator",
            "id": legacy,
            "modified": "2017-01-01T00:00:00Z"
        }))
        .unwrap(),
    )
    .unwrap();
    ds.add_object_to_collection(COLLECTION, &legacy).unwrap();
    ds.add_object(
        taxii_store::StixObject::from_json(serde_json::json!({
            "type": "indicator",
            "spec_version": "2.9",
            "id": odd,
            "modified": "2017-01-01T00:00:00Z"
        }))
        .unwrap(),
    )
    .unwrap();
    ds.add_object_to_collection(COLLECTION, &odd).unwrap();

    let all = ds.get_manifest(&Query::new(COLLECTION)).unwrap();
    let media: Vec<_> = all.objects.iter().map(|r| r.media_type.as_str()).collect();
    assert_eq!(
        media,
        vec![
            "application/stix+json;version=2.1",
            "application/stix+json;version=2.0",
            DEFAULT_STIX_MEDIA_TYPE,
        ]
    );

    let only_20 = ds
        .get_manifest(&Query::new(COLLECTION).spec_version("2.0"))
        .unwrap();
    assert_eq!(only_20.objects.len(), 1);
    assert_eq!(only_20.objects[0].id, legacy);
}

#[test]
fn added_after_excludes_boundary() {
    let ds = datastore_with_collection(DatastoreConfig::default());
    let first = add_version(
        &ds,
        COLLECTION,
        indicator(&object_id("indicator", 1), "2020-01-01T00:00:00Z"),
    );
    add_version(
        &ds,
        COLLECTION,
        indicator(&object_id("indicator", 2), "2020-01-01T00:00:00Z"),
    );

    let manifest = ds
        .get_manifest(&Query::new(COLLECTION).added_after(first.date_added.to_string()))
        .unwrap();
    assert_eq!(manifest.objects.len(), 1);
    assert_eq!(manifest.objects[0].id, object_id("indicator", 2));

    let future = ds.get_manifest(&Query::new(COLLECTION).added_after("9999-01-01"));
    assert_eq!(future.unwrap_err(), DatastoreError::NoRecordsFound);
}

#[test]
fn empty_collection_has_no_records() {
    let ds = datastore_with_collection(DatastoreConfig::default());
    let err = ds.get_manifest(&Query::new(COLLECTION)).unwrap_err();
    assert_eq!(err, DatastoreError::NoRecordsFound);
    assert!(err.is_client_error());
}

#[test]
fn unknown_and_disabled_collections_are_not_found() {
    let ds = datastore_with_collection(DatastoreConfig::default());
    assert!(matches!(
        ds.get_manifest(&Query::new("no-such-collection")),
        Err(DatastoreError::CollectionNotFound(_))
    ));

    ds.add_collection(Collection::new("paused", "Paused").with_enabled(false))
        .unwrap();
    let id = object_id("indicator", 1);
    add_version(&ds, "paused", indicator(&id, "2020-01-01T00:00:00Z"));
    assert_eq!(ds.collection("paused").unwrap().size, 1);
    assert!(matches!(
        ds.get_manifest(&Query::new("paused")),
        Err(DatastoreError::CollectionNotFound(_))
    ));
}

#[test]
fn hidden_collections_are_still_queryable() {
    let ds = datastore_with_collection(DatastoreConfig::default());
    ds.add_collection(Collection::new("secret", "Secret").with_hidden(true))
        .unwrap();
    add_version(
        &ds,
        "secret",
        indicator(&object_id("indicator", 1), "2020-01-01T00:00:00Z"),
    );

    assert_eq!(ds.get_manifest(&Query::new("secret")).unwrap().objects.len(), 1);
}

#[test]
fn validation_errors_never_reach_the_store() {
    let store = ProbeStore::new();
    let ds = probe_datastore(store.clone());

    let cases = vec![
        (Query::new(""), DatastoreError::MissingCollectionId),
        (
            Query::new("").version("first").version("first"),
            DatastoreError::MissingCollectionId,
        ),
        (
            Query::new(COLLECTION).added_after("2017-03-02 01:01:01"),
            DatastoreError::InvalidTimestamp("2017-03-02 01:01:01".into()),
        ),
        (
            Query::new(COLLECTION).object_id("not-an-id"),
            DatastoreError::InvalidObjectId("not-an-id".into()),
        ),
        (
            Query::new(COLLECTION).object_type("pineapple"),
            DatastoreError::InvalidObjectType("pineapple".into()),
        ),
        (
            Query::new(COLLECTION).spec_version("2.5"),
            DatastoreError::InvalidSpecVersion("2.5".into()),
        ),
        (
            Query::new(COLLECTION).version("200111"),
            DatastoreError::InvalidVersionToken("200111".into()),
        ),
    ];

    for (query, expected) in cases {
        assert_eq!(ds.get_manifest(&query).unwrap_err(), expected);
        assert_eq!(ds.get_bundle(&query).unwrap_err(), expected);
    }

    for combo in [["first", "first"], ["last", "last"], ["all", "first"]] {
        let query = Query::new(COLLECTION).version(combo[0]).version(combo[1]);
        assert!(matches!(
            ds.get_manifest(&query),
            Err(DatastoreError::InvalidVersionCombination(_))
        ));
    }

    assert_eq!(store.query_calls(), 0);
    assert_eq!(store.lookup_calls(), 0);
}

#[test]
fn strict_ids_reject_non_uuid_filters() {
    let ds = datastore_with_collection(DatastoreConfig::default().with_strict_ids(true));
    add_version(
        &ds,
        COLLECTION,
        indicator(&object_id("indicator", 1), "2020-01-01T00:00:00Z"),
    );

    let err = ds
        .get_manifest(&Query::new(COLLECTION).object_id("indicator--42"))
        .unwrap_err();
    assert_eq!(err, DatastoreError::InvalidObjectId("indicator--42".into()));
}

#[test]
fn manifest_serializes_as_taxii_envelope() {
    let ds = datastore_with_collection(DatastoreConfig::default());
    let id = object_id("indicator", 1);
    let record = add_version(&ds, COLLECTION, indicator(&id, "2020-01-01T00:00:00Z"));

    let manifest = ds.get_manifest(&Query::new(COLLECTION)).unwrap();
    let json = serde_json::to_value(&manifest).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "more": false,
            "objects": [{
                "id": id,
                "date_added": record.date_added.to_string(),
                "version": "2020-01-01T00:00:00.000000Z",
                "media_type": "application/stix+json;version=2.1"
            }]
        })
    );
}
