use docstore_provider::{
    DeleteManyParams, DocumentStore, GetManyParams, GetOneParams, ListParams, ProviderError,
    UpdateManyParams,
};
use serde_json::Map;

use crate::support::seeded;

#[test]
fn get_many_returns_only_existing_records_in_request_order() {
    let provider = seeded();
    let many = provider
        .get_many("posts", GetManyParams::new(["p07", "missing", "p02"]))
        .unwrap();

    assert_eq!(many.ids(), vec!["p07", "p02"]);
    assert_eq!(many.total, 2);
}

#[test]
fn get_many_skips_deleted_records() {
    let provider = seeded();
    provider
        .delete_many("posts", DeleteManyParams::new(["p01"]))
        .unwrap();

    let many = provider
        .get_many("posts", GetManyParams::new(["p01", "p02"]))
        .unwrap();
    assert_eq!(many.ids(), vec!["p02"]);
}

#[test]
fn delete_many_removes_exactly_the_requested_ids() {
    let provider = seeded();
    let deleted = provider
        .delete_many("posts", DeleteManyParams::new(["p02", "p04", "p06"]))
        .unwrap();
    assert_eq!(deleted.data, vec!["p02", "p04", "p06"]);

    let remaining = provider
        .get_list("posts", ListParams::default().page(1, 100))
        .unwrap();
    assert_eq!(remaining.total, 9);
    for id in ["p02", "p04", "p06"] {
        assert!(!remaining.ids().contains(&id));
    }
    for id in ["p01", "p03", "p05", "p12"] {
        assert!(remaining.ids().contains(&id));
    }

    // Comments share no keys with posts and are untouched.
    let comments = provider.get_list("comments", ListParams::default()).unwrap();
    assert_eq!(comments.total, 3);
}

#[test]
fn delete_many_writes_deletion_markers() {
    let provider = seeded();
    provider
        .delete_many("posts", DeleteManyParams::new(["p08"]))
        .unwrap();

    assert!(provider.store().get("posts:p08").is_err());
    assert_eq!(provider.store().info().unwrap().doc_count, 14);
}

#[test]
fn delete_many_skips_missing_ids() {
    let provider = seeded();
    let deleted = provider
        .delete_many("posts", DeleteManyParams::new(["ghost", "p09"]))
        .unwrap();
    assert_eq!(deleted.data, vec!["p09"]);

    let again = provider
        .delete_many("posts", DeleteManyParams::new(["p09"]))
        .unwrap();
    assert!(again.data.is_empty());
}

#[test]
fn deleted_records_are_gone_from_get_one() {
    let provider = seeded();
    provider
        .delete_many("posts", DeleteManyParams::new(["p10"]))
        .unwrap();
    assert!(matches!(
        provider.get_one("posts", GetOneParams::new("p10")),
        Err(ProviderError::NotFound(_))
    ));
}

#[test]
fn update_many_is_unsupported() {
    let provider = seeded();
    let err = provider
        .update_many(
            "posts",
            UpdateManyParams {
                ids: vec!["p01".into()],
                data: Map::new(),
            },
        )
        .unwrap_err();
    assert_eq!(err, ProviderError::UnsupportedType("updateMany".into()));
}
