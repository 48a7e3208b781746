//! Test fixtures: a provider over an in-memory store seeded with posts and comments.

use docstore_provider::{CreateParams, DataProvider, InMemoryDocumentStore};
use serde_json::{json, Map, Value};

pub type TestProvider = DataProvider<InMemoryDocumentStore>;

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

pub fn create(provider: &TestProvider, resource: &str, data: Value) {
    provider
        .create(resource, CreateParams { data: object(data) })
        .unwrap();
}

/// Posts `p01`..`p12` titled "Post 1".."Post 12"; every third one mentions Rust.
pub fn seeded() -> TestProvider {
    let provider = DataProvider::new(InMemoryDocumentStore::new());
    for n in 1..=12 {
        let title = if n % 3 == 0 {
            format!("Post {} about Rust", n)
        } else {
            format!("Post {}", n)
        };
        create(
            &provider,
            "posts",
            json!({ "id": format!("p{:02}", n), "title": title, "views": n * 10 }),
        );
    }
    create(&provider, "comments", json!({ "id": "c1", "post_id": "p03", "body": "nice" }));
    create(&provider, "comments", json!({ "id": "c2", "post_id": "p03", "body": "meh" }));
    create(&provider, "comments", json!({ "id": "c3", "post_id": "p05", "body": "ok" }));
    provider
}
