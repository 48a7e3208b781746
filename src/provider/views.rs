//! View-mode translation: read-only resources served from a precomputed view.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::config::TotalMode;
use super::data_provider::DataProvider;
use super::params::{
    page_offset, GetManyParams, GetOneParams, ListParams, ListResponse, RecordResponse,
};
use crate::document::Record;
use crate::error::ProviderError;
use crate::key::HIGH_KEY_SENTINEL;
use crate::query::{ViewQuery, ViewRow};
use crate::store::DocumentStore;

/// Turns one view row into a record.
pub type RowFormatter = dyn Fn(&ViewRow) -> Record + Send + Sync;

/// Filter field whose value becomes a key-prefix range on the view.
pub const SEARCH_FILTER: &str = "q";

/// A resource served from a view.
#[derive(Clone)]
pub struct ViewResource {
    view: String,
    options: ViewQuery,
    format: Option<Arc<RowFormatter>>,
}

impl fmt::Debug for ViewResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewResource")
            .field("view", &self.view)
            .field("options", &self.options)
            .field("custom_format", &self.format.is_some())
            .finish()
    }
}

impl ViewResource {
    pub fn new(view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            options: ViewQuery::default(),
            format: None,
        }
    }

    /// Options applied to every query; request-specific options take precedence.
    pub fn options(mut self, options: ViewQuery) -> Self {
        self.options = options;
        self
    }

    /// Custom row formatting. Defaults to [`key_as_name_and_id`].
    pub fn format<F>(mut self, format: F) -> Self
    where
        F: Fn(&ViewRow) -> Record + Send + Sync + 'static,
    {
        self.format = Some(Arc::new(format));
        self
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    fn record(&self, row: &ViewRow) -> Record {
        match &self.format {
            Some(format) => format(row),
            None => key_as_name_and_id(row),
        }
    }

    fn records(&self, rows: &[ViewRow]) -> Vec<Record> {
        rows.iter().map(|row| self.record(row)).collect()
    }
}

/// Default row shape: `{ id: key, name: key, ...value }`.
pub fn key_as_name_and_id(row: &ViewRow) -> Record {
    let key_text = key_text(&row.key);
    let mut fields = Map::new();
    fields.insert("name".to_string(), row.key.clone());
    if let Value::Object(value) = &row.value {
        for (field, v) in value {
            fields.insert(field.clone(), v.clone());
        }
    }
    let id = match fields.remove("id") {
        Some(Value::String(id)) => id,
        _ => key_text,
    };
    Record::new(id, fields)
}

fn key_text(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl<S: DocumentStore> DataProvider<S> {
    pub(super) fn list_view(
        &self,
        view: &ViewResource,
        params: ListParams,
    ) -> Result<ListResponse, ProviderError> {
        let mut range = ViewQuery::default();
        if let Some(q) = params.filter.get(SEARCH_FILTER) {
            let prefix = key_text(q);
            let mut end = prefix.clone();
            end.push(HIGH_KEY_SENTINEL);
            let (start, end) = if view.options.descending {
                (end, prefix)
            } else {
                (prefix, end)
            };
            range.start_key = Some(Value::String(start));
            range.end_key = Some(Value::String(end));
        }

        // Only an explicit page size paginates a view.
        let mut paged = range.clone();
        if let Some(per_page) = params.pagination.as_ref().and_then(|p| p.per_page) {
            let page = params
                .pagination
                .as_ref()
                .and_then(|p| p.page)
                .unwrap_or(1)
                .max(1);
            paged.limit = Some(per_page);
            paged.skip = Some(page_offset(page, per_page)?);
        }

        let response = self.store.query(&view.view, &paged.or(&view.options))?;
        let total = match self.config.total_mode {
            TotalMode::DocCount => self.store.info()?.doc_count,
            TotalMode::MatchCount => {
                self.store
                    .query(&view.view, &range.or(&view.options))?
                    .rows
                    .len()
            }
        };

        Ok(ListResponse {
            data: view.records(&response.rows),
            total,
        })
    }

    pub(super) fn get_view_rows(
        &self,
        view: &ViewResource,
        params: GetManyParams,
    ) -> Result<ListResponse, ProviderError> {
        let query = ViewQuery {
            keys: Some(params.ids),
            ..Default::default()
        };
        let response = self.store.query(&view.view, &query.or(&view.options))?;
        Ok(ListResponse {
            total: response.rows.len(),
            data: view.records(&response.rows),
        })
    }

    pub(super) fn get_view_row(
        &self,
        resource: &str,
        view: &ViewResource,
        params: GetOneParams,
    ) -> Result<RecordResponse, ProviderError> {
        let query = ViewQuery {
            key: Some(params.id.clone()),
            ..Default::default()
        };
        let response = self.store.query(&view.view, &query.or(&view.options))?;
        match response.rows.first() {
            Some(row) => Ok(RecordResponse {
                data: view.record(row),
            }),
            None => Err(ProviderError::NotFound(
                self.keys.compose(resource, &key_text(&params.id)),
            )),
        }
    }
}
