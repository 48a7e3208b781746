//! DataProvider: translates admin UI data requests into document store calls.
//!
//! Resources are routed one of two ways:
//! - **documents** (default): records live as documents keyed
//!   `resource<separator>id` and are read/written directly.
//! - **views**: resources registered with [`DataProvider::view_resource`] are
//!   read-only projections served from a precomputed view.
//!
//! ## Example
//!
//! ```ignore
//! use docstore_provider::{DataProvider, InMemoryDocumentStore, ListParams};
//! use serde_json::json;
//!
//! let provider = DataProvider::new(InMemoryDocumentStore::new());
//! provider.dispatch("create", "posts", json!({ "data": { "title": "Hello" } }))?;
//! let page = provider.get_list("posts", ListParams::default().page(1, 25))?;
//! ```

use std::collections::HashMap;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::config::ProviderConfig;
use super::operation::Operation;
use super::params::{
    CreateParams, DeleteManyParams, DeleteParams, GetManyParams, GetManyReferenceParams,
    GetOneParams, IdsResponse, ListParams, ListResponse, RecordResponse, UpdateManyParams,
    UpdateParams,
};
use super::views::ViewResource;
use crate::error::ProviderError;
use crate::id::{IdGenerator, ShortUuid};
use crate::key::KeyFormat;
use crate::store::DocumentStore;

/// How a resource is served.
pub(super) enum Route<'a> {
    Documents,
    View(&'a ViewResource),
}

/// Data provider over a [`DocumentStore`].
///
/// Holds no request state: every call is translated and sent independently.
pub struct DataProvider<S> {
    pub(super) store: S,
    pub(super) config: ProviderConfig,
    pub(super) keys: KeyFormat,
    pub(super) views: HashMap<String, ViewResource>,
    pub(super) id_generator: Box<dyn IdGenerator>,
}

impl<S: DocumentStore> DataProvider<S> {
    /// Create a provider with the default configuration.
    pub fn new(store: S) -> Self {
        let config = ProviderConfig::default();
        Self {
            store,
            keys: KeyFormat::new(config.separator.clone()),
            config,
            views: HashMap::new(),
            id_generator: Box::new(ShortUuid),
        }
    }

    /// Replace the configuration.
    ///
    /// Uses builder pattern, returns `self` for chaining.
    pub fn with_config(mut self, config: ProviderConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        self.keys = KeyFormat::new(config.separator.clone());
        self.config = config;
        Ok(self)
    }

    /// Serve `resource` from a view instead of from its documents.
    pub fn view_resource(mut self, resource: &str, view: ViewResource) -> Self {
        self.views.insert(resource.to_string(), view);
        self
    }

    /// Replace the generator used for ids of created records.
    pub fn id_generator<G: IdGenerator + 'static>(mut self, generator: G) -> Self {
        self.id_generator = Box::new(generator);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn keys(&self) -> &KeyFormat {
        &self.keys
    }

    /// Resource names served from views.
    pub fn view_resources(&self) -> Vec<&str> {
        self.views.keys().map(|s| s.as_str()).collect()
    }

    pub(super) fn route(&self, op: Operation, resource: &str) -> Result<Route<'_>, ProviderError> {
        match self.views.get(resource) {
            Some(view) if op.is_view_readable() => {
                debug!(
                    "event=provider_request module=provider mode=view op={} resource={} view={}",
                    op,
                    resource,
                    view.view()
                );
                Ok(Route::View(view))
            }
            Some(_) => Err(ProviderError::UnsupportedType(op.to_string())),
            None => {
                debug!(
                    "event=provider_request module=provider mode=documents op={} resource={}",
                    op, resource
                );
                Ok(Route::Documents)
            }
        }
    }

    /// A page of records, filtered and sorted.
    pub fn get_list(&self, resource: &str, params: ListParams) -> Result<ListResponse, ProviderError> {
        match self.route(Operation::GetList, resource)? {
            Route::Documents => self.list_documents(resource, params),
            Route::View(view) => self.list_view(view, params),
        }
    }

    /// One record by id; `NotFound` when absent.
    pub fn get_one(&self, resource: &str, params: GetOneParams) -> Result<RecordResponse, ProviderError> {
        match self.route(Operation::GetOne, resource)? {
            Route::Documents => self.get_document(resource, params),
            Route::View(view) => self.get_view_row(resource, view, params),
        }
    }

    /// The records among `ids` that exist, in request order.
    pub fn get_many(&self, resource: &str, params: GetManyParams) -> Result<ListResponse, ProviderError> {
        match self.route(Operation::GetMany, resource)? {
            Route::Documents => self.get_documents(resource, params),
            Route::View(view) => self.get_view_rows(view, params),
        }
    }

    /// Records referencing another record through `target`.
    pub fn get_many_reference(
        &self,
        resource: &str,
        params: GetManyReferenceParams,
    ) -> Result<ListResponse, ProviderError> {
        self.route(Operation::GetManyReference, resource)?;
        self.reference_documents(resource, params)
    }

    /// Store a new record; `Conflict` when its id is taken.
    pub fn create(&self, resource: &str, params: CreateParams) -> Result<RecordResponse, ProviderError> {
        self.route(Operation::Create, resource)?;
        self.create_document(resource, params)
    }

    /// Replace a record in full.
    pub fn update(&self, resource: &str, params: UpdateParams) -> Result<RecordResponse, ProviderError> {
        self.route(Operation::Update, resource)?;
        self.update_document(resource, params)
    }

    /// Batch updates are not translated; always `UnsupportedType`.
    pub fn update_many(
        &self,
        resource: &str,
        _params: UpdateManyParams,
    ) -> Result<IdsResponse, ProviderError> {
        self.route(Operation::UpdateMany, resource)?;
        Err(ProviderError::UnsupportedType(
            Operation::UpdateMany.to_string(),
        ))
    }

    /// Remove one record, returning what it held.
    pub fn delete(&self, resource: &str, params: DeleteParams) -> Result<RecordResponse, ProviderError> {
        self.route(Operation::Delete, resource)?;
        self.delete_document(resource, params)
    }

    /// Remove every listed record that exists; returns the ids removed.
    pub fn delete_many(
        &self,
        resource: &str,
        params: DeleteManyParams,
    ) -> Result<IdsResponse, ProviderError> {
        self.route(Operation::DeleteMany, resource)?;
        self.delete_documents(resource, params)
    }

    /// Run an operation given by name with JSON params, returning the JSON reply.
    ///
    /// Unknown names reject with `UnsupportedType` before params are decoded.
    pub fn dispatch(&self, op: &str, resource: &str, params: Value) -> Result<Value, ProviderError> {
        let result = op
            .parse::<Operation>()
            .and_then(|op| self.handle(op, resource, params));
        if let Err(err) = &result {
            warn!(
                "event=provider_request module=provider status=error op={} resource={} code={} error={}",
                op,
                resource,
                err.status_code(),
                err
            );
        }
        result
    }

    /// Run a parsed operation with JSON params.
    pub fn handle(&self, op: Operation, resource: &str, params: Value) -> Result<Value, ProviderError> {
        match op {
            Operation::GetList => reply(self.get_list(resource, decode(params)?)),
            Operation::GetOne => reply(self.get_one(resource, decode(params)?)),
            Operation::GetMany => reply(self.get_many(resource, decode(params)?)),
            Operation::GetManyReference => {
                reply(self.get_many_reference(resource, decode(params)?))
            }
            Operation::Create => reply(self.create(resource, decode(params)?)),
            Operation::Update => reply(self.update(resource, decode(params)?)),
            Operation::UpdateMany => reply(self.update_many(resource, decode(params)?)),
            Operation::Delete => reply(self.delete(resource, decode(params)?)),
            Operation::DeleteMany => reply(self.delete_many(resource, decode(params)?)),
        }
    }
}

fn decode<T: DeserializeOwned>(params: Value) -> Result<T, ProviderError> {
    // Absent params decode like an empty object.
    let params = match params {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    Ok(serde_json::from_value(params)?)
}

fn reply<T: Serialize>(result: Result<T, ProviderError>) -> Result<Value, ProviderError> {
    Ok(serde_json::to_value(result?)?)
}
