#![forbid(unsafe_code)]

use crate::StoreError;
use crate::path::{CollectionPath, DocPath};
use crate::watch::Subscription;
use serde_json::{Map, Value};
use std::cmp::Ordering;

pub type Document = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoredDoc {
    pub id: String,
    pub data: Document,
}

impl StoredDoc {
    /// String field, or `""` when missing or not a string.
    pub fn str_field(&self, field: &str) -> String {
        str_field(&self.data, field)
    }

    /// Integer field, or `0` when missing or not an integer.
    pub fn i64_field(&self, field: &str) -> i64 {
        i64_field(&self.data, field)
    }

    pub fn str_list_field(&self, field: &str) -> Vec<String> {
        match self.data.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

pub fn str_field(doc: &Document, field: &str) -> String {
    doc.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub fn i64_field(doc: &Document, field: &str) -> i64 {
    doc.get(field).and_then(Value::as_i64).unwrap_or(0)
}

/// Document collection capability consumed by the application services.
///
/// Writes under a collection are announced to every live [`Subscription`] on
/// that exact collection path.
pub trait DocumentStore {
    fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError>;

    /// Creates or replaces the whole document.
    fn set(&mut self, path: &DocPath, doc: Document) -> Result<(), StoreError>;

    /// Overwrites the given top-level fields; fails with `UnknownId` when absent.
    fn merge(&mut self, path: &DocPath, fields: Document) -> Result<(), StoreError>;

    /// Adds `by` to an integer field (missing counts as zero) and returns the new value.
    fn increment(&mut self, path: &DocPath, field: &str, by: i64) -> Result<i64, StoreError>;

    /// Returns whether a document was removed. Nested collections are kept.
    fn delete(&mut self, path: &DocPath) -> Result<bool, StoreError>;

    /// Stores `doc` under a generated id and returns its path.
    fn add(&mut self, collection: &CollectionPath, doc: Document) -> Result<DocPath, StoreError>;

    /// Every document in the collection, ordered by id.
    fn list(&self, collection: &CollectionPath) -> Result<Vec<StoredDoc>, StoreError>;

    fn subscribe(&mut self, collection: &CollectionPath) -> Result<Subscription, StoreError>;

    fn exists(&self, path: &DocPath) -> Result<bool, StoreError> {
        Ok(self.get(path)?.is_some())
    }

    /// Documents ordered by `field`, ties broken by id; `limit == 0` means no limit.
    fn list_ordered(
        &self,
        collection: &CollectionPath,
        field: &str,
        direction: Direction,
        limit: usize,
    ) -> Result<Vec<StoredDoc>, StoreError> {
        let mut docs = self.list(collection)?;
        docs.sort_by(|a, b| {
            let ord = compare_values(a.data.get(field), b.data.get(field))
                .then_with(|| a.id.cmp(&b.id));
            match direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            }
        });
        if limit > 0 {
            docs.truncate(limit);
        }
        Ok(docs)
    }

    /// Documents whose `field` equals `value`.
    fn list_where(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDoc>, StoreError> {
        Ok(self
            .list(collection)?
            .into_iter()
            .filter(|doc| doc.data.get(field) == Some(value))
            .collect())
    }
}

// Missing < bool < number < string; other kinds compare equal.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .unwrap_or(0.0)
                .total_cmp(&y.as_f64().unwrap_or(0.0)),
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
