//! InMemoryDocumentStore - BTreeMap-backed document store for testing and development.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::DocumentStore;
use crate::document::Document;
use crate::error::StoreError;
use crate::query::{
    collate, AllDocsRequest, AllDocsResponse, AllDocsRow, BulkResult, DatabaseInfo, FindRequest,
    FindResponse, RowValue, SortOrder, ViewQuery, ViewResponse, ViewRow, WriteResult,
};

/// Map function of a view: emits `(key, value)` rows for one document.
pub type MapFn = dyn Fn(&Document) -> Vec<(Value, Value)> + Send + Sync;

/// Internal stored representation of a document revision.
struct StoredDocument {
    bytes: Vec<u8>,
    rev: String,
    generation: u64,
    deleted: bool,
}

impl StoredDocument {
    fn decode(&self, key: &str) -> Result<Document, StoreError> {
        let body: Map<String, Value> = serde_json::from_slice(&self.bytes)?;
        Ok(Document {
            id: key.to_string(),
            rev: Some(self.rev.clone()),
            deleted: self.deleted,
            body,
        })
    }
}

type Storage = BTreeMap<String, StoredDocument>;

/// In-memory document store with revisions, tombstones, selector queries
/// and registered map views.
///
/// Keys iterate in lexicographic order. Clone-friendly via Arc.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    name: String,
    storage: Arc<RwLock<Storage>>,
    views: Arc<RwLock<HashMap<String, Arc<MapFn>>>>,
    update_seq: Arc<AtomicU64>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::named("memory")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage: Arc::new(RwLock::new(BTreeMap::new())),
            views: Arc::new(RwLock::new(HashMap::new())),
            update_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Register a view, builder style.
    pub fn with_view<F>(self, name: &str, map: F) -> Self
    where
        F: Fn(&Document) -> Vec<(Value, Value)> + Send + Sync + 'static,
    {
        self.views
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), Arc::new(map));
        self
    }

    /// Register (or replace) a view on a shared store.
    pub fn register_view<F>(&self, name: &str, map: F) -> Result<(), StoreError>
    where
        F: Fn(&Document) -> Vec<(Value, Value)> + Send + Sync + 'static,
    {
        let mut views = self
            .views
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        views.insert(name.to_string(), Arc::new(map));
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Storage>, StoreError> {
        self.storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Storage>, StoreError> {
        self.storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    /// Apply one write under an already-held lock.
    fn write_locked(&self, storage: &mut Storage, doc: Document) -> Result<WriteResult, StoreError> {
        let conflict = || StoreError::Conflict {
            key: doc.id.clone(),
        };

        let generation = match storage.get(&doc.id) {
            None if doc.deleted => {
                return Err(StoreError::NotFound {
                    key: doc.id.clone(),
                })
            }
            None if doc.rev.is_some() => return Err(conflict()),
            None => 1,
            Some(stored) if stored.deleted => match &doc.rev {
                Some(rev) if *rev != stored.rev => return Err(conflict()),
                _ => stored.generation + 1,
            },
            Some(stored) => match &doc.rev {
                Some(rev) if *rev == stored.rev => stored.generation + 1,
                _ => return Err(conflict()),
            },
        };

        let bytes = serde_json::to_vec(&doc.body)?;
        let rev = format!("{}-{}", generation, Uuid::new_v4().simple());
        storage.insert(
            doc.id.clone(),
            StoredDocument {
                bytes,
                rev: rev.clone(),
                generation,
                deleted: doc.deleted,
            },
        );
        self.update_seq.fetch_add(1, AtomicOrdering::SeqCst);

        Ok(WriteResult {
            ok: true,
            id: doc.id,
            rev,
        })
    }

    fn live_documents(storage: &Storage) -> Result<Vec<Document>, StoreError> {
        storage
            .iter()
            .filter(|(_, stored)| !stored.deleted)
            .map(|(key, stored)| stored.decode(key))
            .collect()
    }
}

fn compare_by_sort(a: &Document, b: &Document, request: &FindRequest) -> Ordering {
    for sort in &request.sort {
        // Documents missing the sort field go first.
        let ord = match (a.field(&sort.field), b.field(&sort.field)) {
            (Some(x), Some(y)) => collate(&x, &y),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let ord = match sort.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.id.cmp(&b.id)
}

fn page<T>(items: Vec<T>, skip: Option<usize>, limit: Option<usize>) -> Vec<T> {
    let iter = items.into_iter().skip(skip.unwrap_or(0));
    match limit {
        Some(limit) => iter.take(limit).collect(),
        None => iter.collect(),
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get(&self, key: &str) -> Result<Document, StoreError> {
        let storage = self.read()?;
        match storage.get(key) {
            Some(stored) if !stored.deleted => stored.decode(key),
            _ => Err(StoreError::NotFound {
                key: key.to_string(),
            }),
        }
    }

    fn put(&self, doc: Document) -> Result<WriteResult, StoreError> {
        let mut storage = self.write()?;
        self.write_locked(&mut storage, doc)
    }

    fn remove(&self, doc: &Document) -> Result<WriteResult, StoreError> {
        let rev = doc.rev.clone().ok_or_else(|| StoreError::Conflict {
            key: doc.id.clone(),
        })?;
        let mut storage = self.write()?;
        self.write_locked(&mut storage, Document::deletion_marker(doc.id.clone(), rev))
    }

    fn bulk_docs(&self, docs: Vec<Document>) -> Result<Vec<BulkResult>, StoreError> {
        let mut storage = self.write()?;
        let mut results = Vec::with_capacity(docs.len());
        for doc in docs {
            let id = doc.id.clone();
            let result = match self.write_locked(&mut storage, doc) {
                Ok(written) => BulkResult::ok(written.id, written.rev),
                Err(err @ StoreError::Conflict { .. }) => {
                    BulkResult::failed(id, "conflict", err.to_string())
                }
                Err(err @ StoreError::NotFound { .. }) => {
                    BulkResult::failed(id, "not_found", err.to_string())
                }
                Err(err) => BulkResult::failed(id, "bad_request", err.to_string()),
            };
            if !result.is_ok() {
                debug!(
                    "event=bulk_write module=store status=rejected id={} error={}",
                    result.id,
                    result.error.as_deref().unwrap_or_default()
                );
            }
            results.push(result);
        }
        Ok(results)
    }

    fn find(&self, request: &FindRequest) -> Result<FindResponse, StoreError> {
        let matcher = request.selector.matcher()?;
        let storage = self.read()?;

        let mut docs: Vec<Document> = Self::live_documents(&storage)?
            .into_iter()
            .filter(|doc| matcher.matches(doc))
            .collect();
        if !request.sort.is_empty() {
            docs.sort_by(|a, b| compare_by_sort(a, b, request));
        }

        Ok(FindResponse {
            docs: page(docs, request.skip, request.limit),
        })
    }

    fn all_docs(&self, request: &AllDocsRequest) -> Result<AllDocsResponse, StoreError> {
        let storage = self.read()?;
        let total_rows = storage.values().filter(|s| !s.deleted).count();

        let row_for = |key: &str, stored: &StoredDocument| -> Result<AllDocsRow, StoreError> {
            let doc = if request.include_docs && !stored.deleted {
                Some(stored.decode(key)?)
            } else {
                None
            };
            Ok(AllDocsRow {
                key: key.to_string(),
                id: Some(key.to_string()),
                value: Some(RowValue {
                    rev: stored.rev.clone(),
                    deleted: stored.deleted,
                }),
                doc,
                error: None,
            })
        };

        let rows = match &request.keys {
            Some(keys) => keys
                .iter()
                .map(|key| match storage.get(key) {
                    Some(stored) => row_for(key.as_str(), stored),
                    None => Ok(AllDocsRow {
                        key: key.clone(),
                        id: None,
                        value: None,
                        doc: None,
                        error: Some("not_found".into()),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => storage
                .iter()
                .filter(|(_, stored)| !stored.deleted)
                .map(|(key, stored)| row_for(key.as_str(), stored))
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(AllDocsResponse { total_rows, rows })
    }

    fn query(&self, view: &str, query: &ViewQuery) -> Result<ViewResponse, StoreError> {
        let map = {
            let views = self
                .views
                .read()
                .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
            views
                .get(view)
                .cloned()
                .ok_or_else(|| StoreError::InvalidQuery(format!("unknown view: {}", view)))?
        };

        let storage = self.read()?;
        let mut rows = Vec::new();
        for doc in Self::live_documents(&storage)? {
            for (key, value) in map(&doc) {
                rows.push(ViewRow {
                    id: doc.id.clone(),
                    key,
                    value,
                    doc: query.include_docs.then(|| doc.clone()),
                });
            }
        }
        rows.sort_by(|a, b| collate(&a.key, &b.key).then_with(|| a.id.cmp(&b.id)));
        let total_rows = rows.len();

        let mut selected: Vec<ViewRow> = if let Some(keys) = &query.keys {
            keys.iter()
                .flat_map(|wanted| {
                    rows.iter()
                        .filter(move |row| collate(&row.key, wanted) == Ordering::Equal)
                        .cloned()
                })
                .collect()
        } else if let Some(key) = &query.key {
            rows.into_iter()
                .filter(|row| collate(&row.key, key) == Ordering::Equal)
                .collect()
        } else {
            if query.descending {
                rows.reverse();
            }
            let in_bounds = |row: &ViewRow| {
                let after_start = query.start_key.as_ref().map_or(true, |start| {
                    let ord = collate(&row.key, start);
                    if query.descending {
                        ord != Ordering::Greater
                    } else {
                        ord != Ordering::Less
                    }
                });
                let before_end = query.end_key.as_ref().map_or(true, |end| {
                    let ord = collate(&row.key, end);
                    if query.descending {
                        ord != Ordering::Less
                    } else {
                        ord != Ordering::Greater
                    }
                });
                after_start && before_end
            };
            rows.into_iter().filter(in_bounds).collect()
        };
        if query.descending && (query.keys.is_some() || query.key.is_some()) {
            selected.reverse();
        }

        Ok(ViewResponse {
            total_rows,
            offset: query.skip.unwrap_or(0),
            rows: page(selected, query.skip, query.limit),
        })
    }

    fn info(&self) -> Result<DatabaseInfo, StoreError> {
        let storage = self.read()?;
        Ok(DatabaseInfo {
            db_name: self.name.clone(),
            doc_count: storage.values().filter(|s| !s.deleted).count(),
            update_seq: self.update_seq.load(AtomicOrdering::SeqCst),
        })
    }
}
