use std::error::Error;
use std::fmt;

/// Error type for document store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No live document under this key.
    NotFound { key: String },
    /// Revision mismatch or write to an existing key without its revision.
    Conflict { key: String },
    /// The document could not be read or written as JSON.
    InvalidDocument(String),
    /// The query could not be evaluated (bad regex, unknown view).
    InvalidQuery(String),
    /// Storage-level error.
    Storage(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { key } => write!(f, "document not found: {}", key),
            StoreError::Conflict { key } => write!(f, "document update conflict: {}", key),
            StoreError::InvalidDocument(msg) => write!(f, "invalid document: {}", msg),
            StoreError::InvalidQuery(msg) => write!(f, "invalid query: {}", msg),
            StoreError::Storage(msg) => write!(f, "document storage error: {}", msg),
        }
    }
}

impl Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidDocument(err.to_string())
    }
}

/// Error type returned by the data provider.
///
/// Store rejections pass through unchanged; `NotFound` and `Conflict` are
/// lifted to their own variants so callers can match on them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Record (or view row) not found.
    NotFound(String),
    /// Write conflict reported by the store.
    Conflict(String),
    /// The operation name is not handled for this resource.
    UnsupportedType(String),
    /// Request parameters could not be decoded or are incomplete.
    InvalidParams(String),
    /// Any other store error.
    Store(StoreError),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::NotFound(key) => write!(f, "not found: {}", key),
            ProviderError::Conflict(key) => write!(f, "conflict: {}", key),
            ProviderError::UnsupportedType(name) => {
                write!(f, "Unsupported fetch action type {}", name)
            }
            ProviderError::InvalidParams(msg) => write!(f, "invalid params: {}", msg),
            ProviderError::Store(e) => write!(f, "store error: {}", e),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProviderError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ProviderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { key } => ProviderError::NotFound(key),
            StoreError::Conflict { key } => ProviderError::Conflict(key),
            other => ProviderError::Store(other),
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::InvalidParams(err.to_string())
    }
}

impl ProviderError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ProviderError::NotFound(_) => 404,
            ProviderError::Conflict(_) => 409,
            ProviderError::UnsupportedType(_) => 400,
            ProviderError::InvalidParams(_) => 400,
            ProviderError::Store(_) => 500,
        }
    }
}
