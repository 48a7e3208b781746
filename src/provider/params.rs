//! Request parameters and replies, in the admin UI's camelCase JSON shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::document::Record;
use crate::error::ProviderError;
use crate::query::SortOrder;

/// Record ids arrive as strings or numbers; both are stored as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn record_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(Into::into)
}

fn optional_record_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(Into::into))
}

fn record_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Vec::<RawId>::deserialize(deserializer).map(|ids| ids.into_iter().map(Into::into).collect())
}

/// Text form of an id-like JSON value.
pub(crate) fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Like [`id_from_value`], rejecting values that cannot name a record.
pub(crate) fn require_id(value: &Value) -> Result<String, ProviderError> {
    id_from_value(value)
        .ok_or_else(|| ProviderError::InvalidParams(format!("not a record id: {}", value)))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Rows to skip before `page` (1-based); `InvalidParams` when the offset overflows.
pub(crate) fn page_offset(page: usize, per_page: usize) -> Result<usize, ProviderError> {
    page.saturating_sub(1)
        .checked_mul(per_page)
        .ok_or_else(|| ProviderError::InvalidParams(format!("page {} is out of range", page)))
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Sort {
    pub field: Option<String>,
    pub order: Option<SortOrder>,
}

impl Sort {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: Some(field.into()),
            order: Some(order),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    pub pagination: Option<Pagination>,
    pub sort: Option<Sort>,
    pub filter: Map<String, Value>,
}

impl ListParams {
    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(Sort::new(field, order));
        self
    }

    pub fn filter(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filter.insert(field.into(), value);
        self
    }
}

/// Reads keep the id as sent: documents need its text, views match it as a key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GetOneParams {
    pub id: Value,
}

impl GetOneParams {
    pub fn new(id: impl Into<Value>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GetManyParams {
    pub ids: Vec<Value>,
}

impl GetManyParams {
    pub fn new<I: IntoIterator<Item = S>, S: Into<Value>>(ids: I) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Records whose `target` field equals `id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetManyReferenceParams {
    pub target: String,
    pub id: Value,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub sort: Option<Sort>,
    #[serde(default)]
    pub filter: Map<String, Value>,
}

impl GetManyReferenceParams {
    pub fn new(target: impl Into<String>, id: Value) -> Self {
        Self {
            target: target.into(),
            id,
            pagination: None,
            sort: None,
            filter: Map::new(),
        }
    }

    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(Sort::new(field, order));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateParams {
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParams {
    #[serde(default, deserialize_with = "optional_record_id")]
    pub id: Option<String>,
    pub data: Map<String, Value>,
    #[serde(default)]
    pub previous_data: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateManyParams {
    #[serde(deserialize_with = "record_ids")]
    pub ids: Vec<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParams {
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    #[serde(default)]
    pub previous_data: Option<Map<String, Value>>,
}

impl DeleteParams {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            previous_data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteManyParams {
    #[serde(deserialize_with = "record_ids")]
    pub ids: Vec<String>,
}

impl DeleteManyParams {
    pub fn new<I: IntoIterator<Item = S>, S: Into<String>>(ids: I) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// Reply of `getList`, `getMany` and `getManyReference`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResponse {
    pub data: Vec<Record>,
    pub total: usize,
}

impl ListResponse {
    pub fn ids(&self) -> Vec<&str> {
        self.data.iter().map(|r| r.id.as_str()).collect()
    }
}

/// Reply of `getOne`, `create`, `update` and `delete`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordResponse {
    pub data: Record,
}

/// Reply of `deleteMany`: the ids actually deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdsResponse {
    pub data: Vec<String>,
}
