//! Composite document keys: `resource<separator>id`.

/// Upper sentinel appended to a prefix to close a range scan.
pub const HIGH_KEY_SENTINEL: char = '\u{fff0}';

pub const DEFAULT_SEPARATOR: &str = ":";

/// Joins resource names and record ids into document keys and splits them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFormat {
    separator: String,
}

impl Default for KeyFormat {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl KeyFormat {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// `resource<sep>id`
    pub fn compose(&self, resource: &str, id: &str) -> String {
        format!("{}{}{}", resource, self.separator, id)
    }

    /// Record id part of a document key: everything after the first separator.
    ///
    /// Returns `None` for keys that carry no separator.
    pub fn record_id<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.split_once(self.separator.as_str()).map(|(_, id)| id)
    }

    /// Resource part of a document key.
    pub fn resource<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.split_once(self.separator.as_str())
            .map(|(resource, _)| resource)
    }

    /// Lower (exclusive) bound of the resource's key range.
    pub fn range_start(&self, resource: &str) -> String {
        format!("{}{}", resource, self.separator)
    }

    /// Upper (exclusive) bound of the resource's key range.
    pub fn range_end(&self, resource: &str) -> String {
        let mut end = self.range_start(resource);
        end.push(HIGH_KEY_SENTINEL);
        end
    }

    /// Whether `key` falls inside the resource's key range.
    pub fn belongs_to(&self, resource: &str, key: &str) -> bool {
        let start = self.range_start(resource);
        key > start.as_str() && key < self.range_end(resource).as_str()
    }
}
