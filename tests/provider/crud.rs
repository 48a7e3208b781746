use docstore_provider::{
    CreateParams, DataProvider, DeleteParams, DocumentStore, GetManyReferenceParams,
    GetOneParams, InMemoryDocumentStore, ListParams, ProviderError, SortOrder, UpdateParams,
};
use serde_json::{json, Map, Value};

use crate::support::{create, object, seeded};

#[test]
fn get_one_returns_bare_id_and_fields() {
    let provider = seeded();
    let record = provider
        .get_one("posts", GetOneParams::new("p03"))
        .unwrap()
        .data;

    assert_eq!(record.id, "p03");
    assert_eq!(record.get("title"), Some(&json!("Post 3 about Rust")));
    assert!(record.rev().is_some());
    assert!(record.get("_id").is_none());
}

#[test]
fn get_one_missing_is_not_found() {
    let provider = seeded();
    let err = provider
        .get_one("posts", GetOneParams::new("nope"))
        .unwrap_err();
    assert_eq!(err, ProviderError::NotFound("posts:nope".into()));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn create_generates_an_id_when_none_given() {
    let provider = DataProvider::new(InMemoryDocumentStore::new());
    let record = provider
        .create(
            "posts",
            CreateParams {
                data: object(json!({ "title": "Fresh" })),
            },
        )
        .unwrap()
        .data;

    assert_eq!(record.id.len(), 22);
    assert!(record.rev().unwrap().starts_with("1-"));

    let stored = provider.store().get(&format!("posts:{}", record.id)).unwrap();
    assert_eq!(stored.body.get("title"), Some(&json!("Fresh")));
    assert!(stored.body.get("id").is_none());
}

#[test]
fn create_uses_the_configured_generator() {
    let provider = DataProvider::new(InMemoryDocumentStore::new()).id_generator(
        |data: &Map<String, Value>| {
            data.get("slug")
                .and_then(Value::as_str)
                .unwrap_or("untitled")
                .to_string()
        },
    );
    let record = provider
        .create(
            "pages",
            CreateParams {
                data: object(json!({ "slug": "about" })),
            },
        )
        .unwrap()
        .data;
    assert_eq!(record.id, "about");
}

#[test]
fn create_with_taken_id_conflicts() {
    let provider = seeded();
    let err = provider
        .create(
            "posts",
            CreateParams {
                data: object(json!({ "id": "p01", "title": "dup" })),
            },
        )
        .unwrap_err();
    assert_eq!(err, ProviderError::Conflict("posts:p01".into()));
    assert_eq!(err.status_code(), 409);
}

#[test]
fn update_replaces_the_whole_record() {
    let provider = seeded();
    let current = provider
        .get_one("posts", GetOneParams::new("p01"))
        .unwrap()
        .data;

    let mut data = current.fields.clone();
    data.insert("id".into(), json!("p01"));
    data.insert("title".into(), json!("Renamed"));
    data.remove("views");

    let updated = provider
        .update(
            "posts",
            UpdateParams {
                id: Some("p01".into()),
                data,
                previous_data: None,
            },
        )
        .unwrap()
        .data;
    assert_eq!(updated.id, "p01");
    assert!(updated.rev().unwrap().starts_with("2-"));

    let reloaded = provider
        .get_one("posts", GetOneParams::new("p01"))
        .unwrap()
        .data;
    assert_eq!(reloaded.get("title"), Some(&json!("Renamed")));
    assert!(reloaded.get("views").is_none());
}

#[test]
fn update_takes_revision_from_previous_data() {
    let provider = seeded();
    let current = provider
        .get_one("posts", GetOneParams::new("p02"))
        .unwrap()
        .data;

    let result = provider.update(
        "posts",
        UpdateParams {
            id: Some("p02".into()),
            data: object(json!({ "title": "From previous" })),
            previous_data: Some(current.fields.clone()),
        },
    );
    assert!(result.is_ok());
}

#[test]
fn update_with_stale_revision_conflicts() {
    let provider = seeded();
    let stale = provider
        .get_one("posts", GetOneParams::new("p04"))
        .unwrap()
        .data;

    let first = UpdateParams {
        id: Some("p04".into()),
        data: stale.fields.clone(),
        previous_data: None,
    };
    provider.update("posts", first.clone()).unwrap();

    let err = provider.update("posts", first).unwrap_err();
    assert!(matches!(err, ProviderError::Conflict(_)));
}

#[test]
fn update_without_any_id_is_invalid() {
    let provider = seeded();
    let err = provider
        .update(
            "posts",
            UpdateParams {
                id: None,
                data: object(json!({ "title": "?" })),
                previous_data: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidParams(_)));
}

#[test]
fn delete_removes_only_that_record() {
    let provider = seeded();
    let removed = provider
        .delete("posts", DeleteParams::new("p05"))
        .unwrap()
        .data;
    assert_eq!(removed.id, "p05");
    assert_eq!(removed.get("title"), Some(&json!("Post 5")));

    assert!(matches!(
        provider.get_one("posts", GetOneParams::new("p05")),
        Err(ProviderError::NotFound(_))
    ));
    let page = provider
        .get_list("posts", ListParams::default().page(1, 100))
        .unwrap();
    assert_eq!(page.total, 11);
}

#[test]
fn delete_missing_is_not_found() {
    let provider = seeded();
    let err = provider
        .delete("posts", DeleteParams::new("ghost"))
        .unwrap_err();
    assert!(matches!(err, ProviderError::NotFound(_)));
}

#[test]
fn references_are_scoped_and_paginated() {
    let provider = seeded();
    create(&provider, "likes", json!({ "id": "l1", "post_id": "p03" }));

    let all = provider
        .get_many_reference(
            "comments",
            GetManyReferenceParams::new("post_id", json!("p03")),
        )
        .unwrap();
    assert_eq!(all.ids(), vec!["c1", "c2"]);
    assert_eq!(all.total, 2);

    let second = provider
        .get_many_reference(
            "comments",
            GetManyReferenceParams::new("post_id", json!("p03"))
                .page(2, 1)
                .sort("body", SortOrder::Asc),
        )
        .unwrap();
    assert_eq!(second.ids(), vec!["c1"]);
    assert_eq!(second.total, 2);
}
