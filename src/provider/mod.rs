//! The admin-UI-facing side: operations, params, replies and
//! the [`DataProvider`] that translates them into document store calls.

mod config;
mod data_provider;
mod documents;
mod operation;
mod params;
mod views;

pub use config::{FilterMode, ProviderConfig, TotalMode};
pub use data_provider::DataProvider;
pub use operation::Operation;
pub use params::{
    CreateParams, DeleteManyParams, DeleteParams, GetManyParams, GetManyReferenceParams,
    GetOneParams, IdsResponse, ListParams, ListResponse, Pagination, RecordResponse, Sort,
    UpdateManyParams, UpdateParams,
};
pub use views::{key_as_name_and_id, RowFormatter, ViewResource, SEARCH_FILTER};
