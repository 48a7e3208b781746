//! Document-mode translation: records stored as documents keyed
//! `resource<separator>id`, listed through range selectors over that prefix.

use log::warn;
use serde_json::{Map, Value};

use super::config::{FilterMode, TotalMode};
use super::data_provider::DataProvider;
use super::params::{
    id_from_value, page_offset, require_id, CreateParams, DeleteManyParams, DeleteParams,
    GetManyParams, GetManyReferenceParams, GetOneParams, IdsResponse, ListParams, ListResponse,
    Pagination, RecordResponse, Sort, UpdateParams,
};
use crate::document::{Document, Record, ID_FIELD, RECORD_ID_FIELD, REV_FIELD};
use crate::error::ProviderError;
use crate::query::{AllDocsRequest, Condition, FindRequest, Selector, SortField, SortOrder};
use crate::store::DocumentStore;

impl<S: DocumentStore> DataProvider<S> {
    /// Range selector over the resource's keys, narrowed by `filter`.
    pub fn list_selector(&self, resource: &str, filter: &Map<String, Value>) -> Selector {
        let mut selector = Selector::new()
            .and(ID_FIELD, Condition::Gt(Value::String(self.keys.range_start(resource))))
            .and(ID_FIELD, Condition::Lt(Value::String(self.keys.range_end(resource))));
        for (field, value) in filter {
            selector.push(
                storage_field(field),
                self.filter_condition(resource, field, value),
            );
        }
        selector
    }

    fn filter_condition(&self, resource: &str, field: &str, value: &Value) -> Condition {
        if let Value::Array(values) = value {
            let values = if field == RECORD_ID_FIELD {
                values
                    .iter()
                    .filter_map(id_from_value)
                    .map(|id| Value::String(self.keys.compose(resource, &id)))
                    .collect()
            } else {
                values.clone()
            };
            return Condition::In(values);
        }

        match self.config.filter_mode {
            FilterMode::Equality => match (field, id_from_value(value)) {
                (RECORD_ID_FIELD, Some(id)) => {
                    Condition::Eq(Value::String(self.keys.compose(resource, &id)))
                }
                _ => Condition::Eq(value.clone()),
            },
            FilterMode::Substring => {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                if field == RECORD_ID_FIELD {
                    // Search only the record id part of the key.
                    Condition::Regex(format!(
                        "(?i)^{}.*{}",
                        regex::escape(&self.keys.range_start(resource)),
                        regex::escape(&text)
                    ))
                } else {
                    Condition::Regex(format!("(?i).*{}.*", regex::escape(&text)))
                }
            }
        }
    }

    /// One sorted page of `selector` plus its total.
    fn find_page(
        &self,
        selector: Selector,
        pagination: Option<Pagination>,
        sort: Option<Sort>,
        total_mode: TotalMode,
    ) -> Result<ListResponse, ProviderError> {
        let pagination = pagination.unwrap_or_default();
        let page = pagination.page.unwrap_or(self.config.default_page).max(1);
        let per_page = pagination.per_page.unwrap_or(self.config.default_per_page);

        let sort = sort.unwrap_or_default();
        let field = sort
            .field
            .as_deref()
            .map(storage_field)
            .unwrap_or(ID_FIELD);
        let order = sort.order.unwrap_or(SortOrder::Asc);

        let request = FindRequest::new(selector.clone())
            .sort(SortField::new(field, order))
            .limit(per_page)
            .skip(page_offset(page, per_page)?);
        let docs = self.store.find(&request)?.docs;

        let total = match total_mode {
            TotalMode::MatchCount => self.store.find(&FindRequest::new(selector))?.docs.len(),
            TotalMode::DocCount => self.store.info()?.doc_count,
        };

        Ok(ListResponse {
            data: docs
                .into_iter()
                .map(|doc| doc.into_record(&self.keys))
                .collect(),
            total,
        })
    }

    pub(super) fn list_documents(
        &self,
        resource: &str,
        params: ListParams,
    ) -> Result<ListResponse, ProviderError> {
        let selector = self.list_selector(resource, &params.filter);
        self.find_page(
            selector,
            params.pagination,
            params.sort,
            self.config.total_mode,
        )
    }

    pub(super) fn get_document(
        &self,
        resource: &str,
        params: GetOneParams,
    ) -> Result<RecordResponse, ProviderError> {
        let id = require_id(&params.id)?;
        let doc = self.store.get(&self.keys.compose(resource, &id))?;
        Ok(RecordResponse {
            data: doc.into_record(&self.keys),
        })
    }

    pub(super) fn get_documents(
        &self,
        resource: &str,
        params: GetManyParams,
    ) -> Result<ListResponse, ProviderError> {
        let keys = params
            .ids
            .iter()
            .map(|id| Ok(self.keys.compose(resource, &require_id(id)?)))
            .collect::<Result<Vec<_>, ProviderError>>()?;
        let response = self
            .store
            .all_docs(&AllDocsRequest::keys(keys).include_docs())?;

        let data: Vec<Record> = response
            .rows
            .into_iter()
            .filter_map(|row| row.doc)
            .map(|doc| doc.into_record(&self.keys))
            .collect();
        Ok(ListResponse {
            total: data.len(),
            data,
        })
    }

    pub(super) fn reference_documents(
        &self,
        resource: &str,
        params: GetManyReferenceParams,
    ) -> Result<ListResponse, ProviderError> {
        let mut selector = self.list_selector(resource, &params.filter);
        selector.push(storage_field(&params.target), Condition::Eq(params.id));
        self.find_page(
            selector,
            params.pagination,
            params.sort,
            TotalMode::MatchCount,
        )
    }

    pub(super) fn create_document(
        &self,
        resource: &str,
        params: CreateParams,
    ) -> Result<RecordResponse, ProviderError> {
        let data = params.data;
        let id = data
            .get(RECORD_ID_FIELD)
            .and_then(id_from_value)
            .unwrap_or_else(|| self.id_generator.generate(&data));

        let mut doc = Document::from_fields(self.keys.compose(resource, &id), data);
        // A new document never carries a revision.
        doc.rev = None;
        let written = self.store.put(doc.clone())?;
        doc.rev = Some(written.rev);

        Ok(RecordResponse {
            data: doc.into_record(&self.keys),
        })
    }

    pub(super) fn update_document(
        &self,
        resource: &str,
        params: UpdateParams,
    ) -> Result<RecordResponse, ProviderError> {
        let id = params
            .data
            .get(RECORD_ID_FIELD)
            .and_then(id_from_value)
            .or(params.id)
            .ok_or_else(|| ProviderError::InvalidParams("update requires an id".into()))?;

        let mut doc = Document::from_fields(self.keys.compose(resource, &id), params.data);
        if doc.rev.is_none() {
            doc.rev = params
                .previous_data
                .as_ref()
                .and_then(|previous| previous.get(REV_FIELD))
                .and_then(Value::as_str)
                .map(str::to_string);
        }
        let written = self.store.put(doc.clone())?;
        doc.rev = Some(written.rev);

        Ok(RecordResponse {
            data: doc.into_record(&self.keys),
        })
    }

    pub(super) fn delete_document(
        &self,
        resource: &str,
        params: DeleteParams,
    ) -> Result<RecordResponse, ProviderError> {
        let doc = self.store.get(&self.keys.compose(resource, &params.id))?;
        self.store.remove(&doc)?;
        Ok(RecordResponse {
            data: doc.into_record(&self.keys),
        })
    }

    pub(super) fn delete_documents(
        &self,
        resource: &str,
        params: DeleteManyParams,
    ) -> Result<IdsResponse, ProviderError> {
        let keys = params
            .ids
            .iter()
            .map(|id| self.keys.compose(resource, id))
            .collect();
        let rows = self.store.all_docs(&AllDocsRequest::keys(keys))?.rows;

        let markers: Vec<Document> = rows
            .into_iter()
            .filter(|row| row.is_live())
            .filter_map(|row| match (row.id, row.value) {
                (Some(id), Some(value)) => Some(Document::deletion_marker(id, value.rev)),
                _ => None,
            })
            .collect();
        if markers.is_empty() {
            return Ok(IdsResponse { data: Vec::new() });
        }

        let mut deleted = Vec::with_capacity(markers.len());
        for result in self.store.bulk_docs(markers)? {
            if result.is_ok() {
                if let Some(id) = self.keys.record_id(&result.id) {
                    deleted.push(id.to_string());
                }
            } else {
                warn!(
                    "event=delete_many module=provider status=skipped resource={} key={} error={}",
                    resource,
                    result.id,
                    result.error.as_deref().unwrap_or_default()
                );
            }
        }
        Ok(IdsResponse { data: deleted })
    }
}

/// Record field name as stored: `id` lives in the document key.
fn storage_field(field: &str) -> &str {
    if field == RECORD_ID_FIELD {
        ID_FIELD
    } else {
        field
    }
}
