use docstore_provider::{
    CreateParams, DataProvider, DeleteParams, GetManyParams, GetOneParams,
    GetManyReferenceParams, InMemoryDocumentStore, ListParams, ProviderConfig, ProviderError,
    Record, TotalMode, ViewQuery, ViewResource,
};
use serde_json::{json, Map, Value};

use crate::support::object;

/// Tags counted across posts: one row per (tag, post).
fn tag_store() -> InMemoryDocumentStore {
    InMemoryDocumentStore::new().with_view("tags/by_name", |doc| {
        if !doc.id.starts_with("posts:") {
            return Vec::new();
        }
        doc.body
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .map(|tag| (tag.clone(), json!({ "post": doc.id })))
                    .collect()
            })
            .unwrap_or_default()
    })
}

fn tag_provider() -> DataProvider<InMemoryDocumentStore> {
    let provider = DataProvider::new(tag_store())
        .view_resource("tags", ViewResource::new("tags/by_name"));
    let posts = [
        ("1", json!(["rust", "db"])),
        ("2", json!(["rust"])),
        ("3", json!(["go", "ruby"])),
    ];
    for (id, tags) in posts {
        provider
            .create(
                "posts",
                CreateParams {
                    data: object(json!({ "id": id, "tags": tags })),
                },
            )
            .unwrap();
    }
    provider
}

#[test]
fn view_list_filters_by_key_prefix() {
    let provider = tag_provider();
    let page = provider
        .get_list("tags", ListParams::default().filter("q", json!("ru")))
        .unwrap();

    assert_eq!(page.ids(), vec!["ruby", "rust", "rust"]);
    assert_eq!(page.data[0].get("name"), Some(&json!("ruby")));
    assert_eq!(page.data[0].get("post"), Some(&json!("posts:3")));
    assert_eq!(page.total, 3);
}

#[test]
fn view_list_paginates_only_with_page_size() {
    let provider = tag_provider();
    let all = provider.get_list("tags", ListParams::default()).unwrap();
    assert_eq!(all.data.len(), 5);

    let page = provider
        .get_list("tags", ListParams::default().page(2, 2))
        .unwrap();
    assert_eq!(page.ids(), vec!["ruby", "rust"]);
    assert_eq!(page.total, 5);
}

#[test]
fn view_list_doc_count_total() {
    let provider = tag_provider()
        .with_config(ProviderConfig::default().total_mode(TotalMode::DocCount))
        .unwrap();
    let page = provider
        .get_list("tags", ListParams::default().page(1, 1))
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.total, 3);
}

#[test]
fn view_get_many_by_keys() {
    let provider = tag_provider();
    let many = provider
        .get_many("tags", GetManyParams::new(["go", "db"]))
        .unwrap();
    assert_eq!(many.ids(), vec!["go", "db"]);
    assert_eq!(many.total, 2);
}

#[test]
fn view_get_one_and_not_found() {
    let provider = tag_provider();
    let one = provider.get_one("tags", GetOneParams::new("go")).unwrap();
    assert_eq!(one.data.id, "go");

    let err = provider
        .get_one("tags", GetOneParams::new("cobol"))
        .unwrap_err();
    assert!(matches!(err, ProviderError::NotFound(_)));
}

#[test]
fn view_options_and_custom_format_apply() {
    let provider = DataProvider::new(tag_store()).view_resource(
        "tags",
        ViewResource::new("tags/by_name")
            .options(ViewQuery {
                descending: true,
                ..Default::default()
            })
            .format(|row| {
                let mut fields = Map::new();
                fields.insert("label".into(), json!(format!("#{}", row.key.as_str().unwrap_or(""))));
                Record::new(row.id.clone(), fields)
            }),
    );
    provider
        .create(
            "posts",
            CreateParams {
                data: object(json!({ "id": "9", "tags": ["a", "b"] })),
            },
        )
        .unwrap();

    let page = provider.get_list("tags", ListParams::default()).unwrap();
    let labels: Vec<&Value> = page.data.iter().filter_map(|r| r.get("label")).collect();
    assert_eq!(labels, vec![&json!("#b"), &json!("#a")]);
    assert!(page.data.iter().all(|r| r.id == "posts:9"));
}

#[test]
fn writes_and_references_are_unsupported_on_views() {
    let provider = tag_provider();

    let err = provider
        .delete("tags", DeleteParams::new("rust"))
        .unwrap_err();
    assert_eq!(err, ProviderError::UnsupportedType("delete".into()));

    let err = provider
        .create(
            "tags",
            CreateParams {
                data: object(json!({ "name": "new" })),
            },
        )
        .unwrap_err();
    assert_eq!(err, ProviderError::UnsupportedType("create".into()));

    let err = provider
        .get_many_reference("tags", GetManyReferenceParams::new("post", json!("posts:1")))
        .unwrap_err();
    assert!(matches!(err, ProviderError::UnsupportedType(_)));
}

fn year_provider() -> DataProvider<InMemoryDocumentStore> {
    let store = InMemoryDocumentStore::new().with_view("posts/by_year", |doc| {
        doc.body
            .get("year")
            .map(|year| vec![(year.clone(), json!({ "count": 1 }))])
            .unwrap_or_default()
    });
    let provider =
        DataProvider::new(store).view_resource("years", ViewResource::new("posts/by_year"));
    for (id, year) in [("1", 2023), ("2", 2024)] {
        provider
            .create(
                "posts",
                CreateParams {
                    data: object(json!({ "id": id, "year": year })),
                },
            )
            .unwrap();
    }
    provider
}

#[test]
fn numeric_view_keys_are_matched_as_sent() {
    let provider = year_provider();
    let page = provider.get_list("years", ListParams::default()).unwrap();
    assert_eq!(page.ids(), vec!["2023", "2024"]);

    let one = provider
        .dispatch("getOne", "years", json!({ "id": 2024 }))
        .unwrap();
    assert_eq!(one["data"]["id"], json!("2024"));
    assert_eq!(one["data"]["name"], json!(2024));

    let many = provider
        .dispatch("getMany", "years", json!({ "ids": [2024, 2023] }))
        .unwrap();
    assert_eq!(many["total"], json!(2));
    assert_eq!(many["data"][0]["name"], json!(2024));
}

#[test]
fn view_pages_past_addressable_range_are_rejected() {
    let provider = year_provider();
    let err = provider
        .get_list("years", ListParams::default().page(usize::MAX, 2))
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidParams(_)));
}
