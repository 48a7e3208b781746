//! Secondary-index (view) queries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;

/// Options for querying a view. Key bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<Value>>,
    #[serde(
        default,
        rename = "startkey",
        alias = "startKey",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_key: Option<Value>,
    #[serde(
        default,
        rename = "endkey",
        alias = "endKey",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_key: Option<Value>,
    #[serde(default)]
    pub descending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default)]
    pub include_docs: bool,
}

impl ViewQuery {
    /// Fill every option this query leaves unset from `base`.
    pub fn or(self, base: &ViewQuery) -> ViewQuery {
        ViewQuery {
            key: self.key.or_else(|| base.key.clone()),
            keys: self.keys.or_else(|| base.keys.clone()),
            start_key: self.start_key.or_else(|| base.start_key.clone()),
            end_key: self.end_key.or_else(|| base.end_key.clone()),
            descending: self.descending || base.descending,
            skip: self.skip.or(base.skip),
            limit: self.limit.or(base.limit),
            include_docs: self.include_docs || base.include_docs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    /// Id of the document that emitted the row.
    pub id: String,
    pub key: Value,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Document>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewResponse {
    /// Rows in the whole view, before key filtering and paging.
    pub total_rows: usize,
    pub offset: usize,
    pub rows: Vec<ViewRow>,
}
