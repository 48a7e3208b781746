//! Record id generation for `create`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Produces the record id of a new record from its submitted fields.
pub trait IdGenerator: Send + Sync {
    fn generate(&self, data: &Map<String, Value>) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn(&Map<String, Value>) -> String + Send + Sync,
{
    fn generate(&self, data: &Map<String, Value>) -> String {
        self(data)
    }
}

/// Random v4 UUID, base64url-encoded without padding (22 characters).
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortUuid;

impl IdGenerator for ShortUuid {
    fn generate(&self, _data: &Map<String, Value>) -> String {
        short_uuid()
    }
}

pub fn short_uuid() -> String {
    URL_SAFE_NO_PAD.encode(Uuid::new_v4().as_bytes())
}
