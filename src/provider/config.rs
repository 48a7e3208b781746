//! Provider configuration.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::key::DEFAULT_SEPARATOR;

/// How `filter` entries of a list request become selector conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterMode {
    /// Case-insensitive "contains" match on the value's text.
    #[default]
    Substring,
    /// Exact equality.
    Equality,
}

/// What the `total` of a list reply counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TotalMode {
    /// Records matching the list query, ignoring pagination.
    #[default]
    MatchCount,
    /// Live documents in the whole database.
    DocCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// Joins resource name and record id into a document key.
    pub separator: String,
    pub filter_mode: FilterMode,
    pub total_mode: TotalMode,
    pub default_page: usize,
    pub default_per_page: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            filter_mode: FilterMode::default(),
            total_mode: TotalMode::default(),
            default_page: 1,
            default_per_page: 10,
        }
    }
}

impl ProviderConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        let config: ProviderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.separator.is_empty() {
            return Err(ProviderError::InvalidParams(
                "separator must not be empty".into(),
            ));
        }
        if self.default_page == 0 || self.default_per_page == 0 {
            return Err(ProviderError::InvalidParams(
                "default page and page size must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn filter_mode(mut self, mode: FilterMode) -> Self {
        self.filter_mode = mode;
        self
    }

    pub fn total_mode(mut self, mode: TotalMode) -> Self {
        self.total_mode = mode;
        self
    }
}
