//! Query vocabulary shared by the provider and the store: selectors,
//! find/all-docs/bulk/view requests and their replies, and value collation.

mod collate;
mod requests;
mod selector;
mod view;

pub use collate::collate;
pub use requests::{
    AllDocsRequest, AllDocsResponse, AllDocsRow, BulkResult, DatabaseInfo, FindRequest,
    FindResponse, RowValue, SortField, SortOrder, WriteResult,
};
pub use selector::{Condition, Matcher, Selector};
pub use view::{ViewQuery, ViewResponse, ViewRow};
