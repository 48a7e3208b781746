//! Declarative selectors: which documents a `find` should return.
//!
//! A selector is an implicit AND over fields; each field carries one or more
//! operator conditions. It serializes to the store's JSON selector syntax:
//!
//! ```json
//! { "_id": { "$gt": "posts:", "$lt": "posts:\ufff0" }, "title": { "$regex": "(?i).*rust.*" } }
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;

use regex::Regex;
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::collate::collate;
use crate::document::Document;
use crate::error::StoreError;

/// A single operator applied to one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    /// Regular expression over string values; use `(?i)` for case-insensitive matching.
    Regex(String),
}

impl Condition {
    pub fn operator(&self) -> &'static str {
        match self {
            Condition::Eq(_) => "$eq",
            Condition::Ne(_) => "$ne",
            Condition::Gt(_) => "$gt",
            Condition::Gte(_) => "$gte",
            Condition::Lt(_) => "$lt",
            Condition::Lte(_) => "$lte",
            Condition::In(_) => "$in",
            Condition::Regex(_) => "$regex",
        }
    }

    fn operand(&self) -> Value {
        match self {
            Condition::Eq(v)
            | Condition::Ne(v)
            | Condition::Gt(v)
            | Condition::Gte(v)
            | Condition::Lt(v)
            | Condition::Lte(v) => v.clone(),
            Condition::In(values) => Value::Array(values.clone()),
            Condition::Regex(pattern) => Value::String(pattern.clone()),
        }
    }
}

/// Field-to-conditions map, ANDed together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    fields: BTreeMap<String, Vec<Condition>>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition on `field`, keeping any existing ones.
    pub fn and(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.push(field, condition);
        self
    }

    pub fn push(&mut self, field: impl Into<String>, condition: Condition) {
        self.fields.entry(field.into()).or_default().push(condition);
    }

    pub fn conditions(&self, field: &str) -> &[Condition] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Selector JSON. A repeated operator on one field moves to a top-level `$and`.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        let mut extra = Vec::new();
        for (field, conditions) in &self.fields {
            let mut ops = Map::new();
            for condition in conditions {
                let operator = condition.operator();
                if ops.contains_key(operator) {
                    let mut single = Map::new();
                    single.insert(operator.to_string(), condition.operand());
                    let mut clause = Map::new();
                    clause.insert(field.clone(), Value::Object(single));
                    extra.push(Value::Object(clause));
                } else {
                    ops.insert(operator.to_string(), condition.operand());
                }
            }
            out.insert(field.clone(), Value::Object(ops));
        }
        if !extra.is_empty() {
            out.insert("$and".to_string(), Value::Array(extra));
        }
        Value::Object(out)
    }

    /// Compile regex conditions once so the selector can be evaluated per document.
    pub fn matcher(&self) -> Result<Matcher<'_>, StoreError> {
        let mut regexes = BTreeMap::new();
        for conditions in self.fields.values() {
            for condition in conditions {
                if let Condition::Regex(pattern) = condition {
                    if !regexes.contains_key(pattern.as_str()) {
                        let compiled = Regex::new(pattern)
                            .map_err(|e| StoreError::InvalidQuery(e.to_string()))?;
                        regexes.insert(pattern.as_str(), compiled);
                    }
                }
            }
        }
        Ok(Matcher {
            selector: self,
            regexes,
        })
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// A selector with its regular expressions compiled.
pub struct Matcher<'s> {
    selector: &'s Selector,
    regexes: BTreeMap<&'s str, Regex>,
}

impl Matcher<'_> {
    pub fn matches(&self, doc: &Document) -> bool {
        self.selector.fields.iter().all(|(field, conditions)| {
            // Every operator requires the field to be present.
            match doc.field(field) {
                Some(value) => conditions.iter().all(|c| self.check(c, &value)),
                None => false,
            }
        })
    }

    fn check(&self, condition: &Condition, value: &Value) -> bool {
        match condition {
            Condition::Eq(v) => collate(value, v) == Ordering::Equal,
            Condition::Ne(v) => collate(value, v) != Ordering::Equal,
            Condition::Gt(v) => collate(value, v) == Ordering::Greater,
            Condition::Gte(v) => collate(value, v) != Ordering::Less,
            Condition::Lt(v) => collate(value, v) == Ordering::Less,
            Condition::Lte(v) => collate(value, v) != Ordering::Greater,
            Condition::In(values) => values
                .iter()
                .any(|v| collate(value, v) == Ordering::Equal),
            Condition::Regex(pattern) => match (value, self.regexes.get(pattern.as_str())) {
                (Value::String(s), Some(re)) => re.is_match(s),
                _ => false,
            },
        }
    }
}
