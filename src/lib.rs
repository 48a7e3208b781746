//! Serve an admin UI's CRUD requests from a document database.
//!
//! Records of each resource are stored as documents keyed
//! `resource<separator>id`. The [`DataProvider`] turns `getList`, `getOne`,
//! `getMany`, `getManyReference`, `create`, `update`, `delete` and
//! `deleteMany` into store primitives (`get`, `put`, `remove`, `find`,
//! `all_docs`, `bulk_docs`, `query`, `info`) and maps the replies back.

mod document;
mod error;
mod id;
mod key;
mod provider;
mod query;
mod store;

pub use document::{Document, Record};
pub use error::{ProviderError, StoreError};
pub use id::{short_uuid, IdGenerator, ShortUuid};
pub use key::{KeyFormat, DEFAULT_SEPARATOR, HIGH_KEY_SENTINEL};
pub use provider::{
    key_as_name_and_id, CreateParams, DataProvider, DeleteManyParams, DeleteParams, FilterMode,
    GetManyParams, GetManyReferenceParams, GetOneParams, IdsResponse, ListParams, ListResponse,
    Operation, Pagination, ProviderConfig, RecordResponse, RowFormatter, Sort, TotalMode,
    UpdateManyParams, UpdateParams, ViewResource, SEARCH_FILTER,
};
pub use query::{
    collate, AllDocsRequest, AllDocsResponse, AllDocsRow, BulkResult, Condition, DatabaseInfo,
    FindRequest, FindResponse, Matcher, RowValue, Selector, SortField, SortOrder, ViewQuery,
    ViewResponse, ViewRow, WriteResult,
};
pub use store::{DocumentStore, InMemoryDocumentStore, MapFn};
