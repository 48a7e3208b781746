//! Stored documents and the caller-visible records they translate to.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::key::KeyFormat;

pub const ID_FIELD: &str = "_id";
pub const REV_FIELD: &str = "_rev";
pub const DELETED_FIELD: &str = "_deleted";
pub const RECORD_ID_FIELD: &str = "id";

fn is_false(value: &bool) -> bool {
    !*value
}

/// A document as the store sees it: reserved `_id`/`_rev`/`_deleted`
/// fields plus an arbitrary JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(rename = "_deleted", default, skip_serializing_if = "is_false")]
    pub deleted: bool,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, body: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            rev: None,
            deleted: false,
            body,
        }
    }

    pub fn with_rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = Some(rev.into());
        self
    }

    /// A body-less marker that deletes `id` at revision `rev` when bulk-written.
    pub fn deletion_marker(id: impl Into<String>, rev: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rev: Some(rev.into()),
            deleted: true,
            body: Map::new(),
        }
    }

    /// Build a document from record fields stored under `key`.
    ///
    /// `_rev` is taken from the fields; `id`, `_id` and `_deleted` are dropped
    /// so the key is the only identity the store sees.
    pub fn from_fields(key: impl Into<String>, mut fields: Map<String, Value>) -> Self {
        let rev = match fields.remove(REV_FIELD) {
            Some(Value::String(rev)) => Some(rev),
            _ => None,
        };
        fields.remove(RECORD_ID_FIELD);
        fields.remove(ID_FIELD);
        fields.remove(DELETED_FIELD);
        Self {
            id: key.into(),
            rev,
            deleted: false,
            body: fields,
        }
    }

    /// Look up a field by name, including the reserved ones.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            ID_FIELD => Some(Value::String(self.id.clone())),
            REV_FIELD => self.rev.clone().map(Value::String),
            DELETED_FIELD => Some(Value::Bool(self.deleted)),
            _ => lookup_path(&self.body, name).cloned(),
        }
    }

    /// Convert to the caller-visible record, replacing `_id` with the bare record id.
    pub fn into_record(self, keys: &KeyFormat) -> Record {
        let id = keys
            .record_id(&self.id)
            .map(str::to_string)
            .unwrap_or_else(|| self.id.clone());
        let mut fields = self.body;
        fields.remove(RECORD_ID_FIELD);
        if let Some(rev) = self.rev {
            fields.insert(REV_FIELD.to_string(), Value::String(rev));
        }
        Record { id, fields }
    }
}

/// Resolve a dotted path (`author.name`) inside a JSON object.
pub(crate) fn lookup_path<'a>(body: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = body.get(path) {
        return Some(value);
    }
    let mut parts = path.split('.');
    let mut current = body.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// A record as the admin UI sees it: an `id` plus its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn rev(&self) -> Option<&str> {
        self.fields.get(REV_FIELD).and_then(Value::as_str)
    }
}
