//! DocumentStore - the document database the provider phrases requests to.
//!
//! The provider never manages storage itself: every translated request ends
//! up as one of these primitives. Implement the trait over whatever client
//! talks to the real database; `InMemoryDocumentStore` backs tests and
//! development.

mod in_memory;

use crate::document::Document;
use crate::error::StoreError;
use crate::query::{
    AllDocsRequest, AllDocsResponse, BulkResult, DatabaseInfo, FindRequest, FindResponse,
    ViewQuery, ViewResponse, WriteResult,
};

/// Primitives of a revisioned document database.
pub trait DocumentStore: Send + Sync {
    /// Fetch a live document by key. `NotFound` if absent or deleted.
    fn get(&self, key: &str) -> Result<Document, StoreError>;

    /// Create or replace a document. Replacing requires the current `_rev`.
    fn put(&self, doc: Document) -> Result<WriteResult, StoreError>;

    /// Delete a document at its current `_rev`, leaving a tombstone.
    fn remove(&self, doc: &Document) -> Result<WriteResult, StoreError>;

    /// Write many documents (including deletion markers). Each document
    /// reports its own outcome; one failure does not fail the batch.
    fn bulk_docs(&self, docs: Vec<Document>) -> Result<Vec<BulkResult>, StoreError>;

    /// Selector query with sort, skip and limit.
    fn find(&self, request: &FindRequest) -> Result<FindResponse, StoreError>;

    /// Primary-index lookup by key.
    fn all_docs(&self, request: &AllDocsRequest) -> Result<AllDocsResponse, StoreError>;

    /// Query a precomputed view.
    fn query(&self, view: &str, query: &ViewQuery) -> Result<ViewResponse, StoreError>;

    /// Database-wide metadata.
    fn info(&self) -> Result<DatabaseInfo, StoreError>;
}

pub use in_memory::{InMemoryDocumentStore, MapFn};
