use docstore_provider::{Operation, ProviderError};
use serde_json::json;

use crate::support::seeded;

#[test]
fn dispatch_get_list_returns_data_and_total() {
    let provider = seeded();
    let reply = provider
        .dispatch(
            "getList",
            "posts",
            json!({
                "pagination": { "page": 1, "perPage": 2 },
                "sort": { "field": "views", "order": "DESC" },
                "filter": {}
            }),
        )
        .unwrap();

    assert_eq!(reply["total"], json!(12));
    assert_eq!(reply["data"][0]["id"], json!("p12"));
    assert_eq!(reply["data"][1]["id"], json!("p11"));
    assert!(reply["data"][0].get("_id").is_none());
}

#[test]
fn dispatch_accepts_legacy_names_and_numeric_ids() {
    let provider = seeded();
    provider
        .dispatch("CREATE", "posts", json!({ "data": { "id": 7, "title": "seven" } }))
        .unwrap();

    let reply = provider
        .dispatch("GET_ONE", "posts", json!({ "id": 7 }))
        .unwrap();
    assert_eq!(reply["data"]["title"], json!("seven"));
    assert_eq!(reply["data"]["id"], json!("7"));
}

#[test]
fn dispatch_create_update_delete_round() {
    let provider = seeded();
    let created = provider
        .dispatch("create", "posts", json!({ "data": { "title": "draft" } }))
        .unwrap();
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let rev = created["data"]["_rev"].clone();

    let updated = provider
        .dispatch(
            "update",
            "posts",
            json!({ "id": id, "data": { "id": id, "_rev": rev, "title": "final" } }),
        )
        .unwrap();
    assert_eq!(updated["data"]["title"], json!("final"));

    let deleted = provider
        .dispatch("deleteMany", "posts", json!({ "ids": [id] }))
        .unwrap();
    assert_eq!(deleted["data"], json!([id]));
}

#[test]
fn dispatch_unknown_operation_rejects_before_decoding() {
    let provider = seeded();
    for name in ["patch", "getEverything", ""] {
        let err = provider.dispatch(name, "posts", json!(null)).unwrap_err();
        assert_eq!(err, ProviderError::UnsupportedType(name.to_string()));
    }
}

#[test]
fn dispatch_update_many_rejects() {
    let provider = seeded();
    let err = provider
        .dispatch("updateMany", "posts", json!({ "ids": ["p01"], "data": {} }))
        .unwrap_err();
    assert_eq!(err.to_string(), "Unsupported fetch action type updateMany");
}

#[test]
fn dispatch_with_bad_params_is_invalid() {
    let provider = seeded();
    let err = provider
        .dispatch("getOne", "posts", json!({ "identifier": "p01" }))
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidParams(_)));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn null_params_decode_as_empty() {
    let provider = seeded();
    let reply = provider.handle(Operation::GetList, "comments", json!(null)).unwrap();
    assert_eq!(reply["total"], json!(3));
}

#[test]
fn dispatch_rejects_page_past_addressable_range() {
    let provider = seeded();
    let err = provider
        .dispatch(
            "getList",
            "posts",
            json!({ "pagination": { "page": 1_000_000_000_000_000_000u64, "perPage": 100 } }),
        )
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidParams(_)));
}
