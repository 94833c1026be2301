use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::document::{Document, DocumentStore, Fields};
use crate::error::StoreError;

/// Store primitives, used to inject failures into a [`MemoryStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    QueryExact,
    QueryOrdered,
    Increment,
}

#[derive(Debug, Default)]
struct State {
    collections: HashMap<String, Vec<Document>>,
    unique: HashMap<String, HashSet<String>>,
    failing: HashSet<Operation>,
}

/// In-memory DocumentStore for tests and local development.
///
/// Clones share the same underlying collections.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a unique index on `collection.field`.
    pub fn with_unique_field(self, collection: &str, field: &str) -> Self {
        self.state()
            .unique
            .entry(collection.to_string())
            .or_default()
            .insert(field.to_string());
        self
    }

    /// Make the given operations fail with [`StoreError::Unavailable`] until cleared.
    pub fn fail_operations(&self, ops: &[Operation]) {
        self.state().failing.extend(ops.iter().copied());
    }

    pub fn clear_failures(&self) {
        self.state().failing.clear();
    }

    /// Snapshot of a collection in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.state()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl State {
    fn check(&self, op: Operation) -> Result<(), StoreError> {
        if self.failing.contains(&op) {
            return Err(StoreError::Unavailable(format!("{op:?} is failing")));
        }
        Ok(())
    }

    fn docs(&self, collection: &str) -> &[Document] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, fields: Fields) -> Result<Document, StoreError> {
        let mut state = self.state();
        state.check(Operation::Create)?;

        if let Some(unique) = state.unique.get(collection) {
            for field in unique {
                let Some(value) = fields.get(field).filter(|v| !v.is_null()) else {
                    continue;
                };
                if state
                    .docs(collection)
                    .iter()
                    .any(|d| d.fields.get(field) == Some(value))
                {
                    return Err(StoreError::Conflict {
                        collection: collection.to_string(),
                        field: field.clone(),
                    });
                }
            }
        }

        let document = Document {
            id: Uuid::new_v4().to_string(),
            fields,
            created_at: Utc::now(),
        };
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        Ok(document)
    }

    async fn query_exact(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let state = self.state();
        state.check(Operation::QueryExact)?;

        Ok(state
            .docs(collection)
            .iter()
            .filter(|d| d.str_field(field) == Some(value))
            .cloned()
            .collect())
    }

    async fn query_all_ordered_desc(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let state = self.state();
        state.check(Operation::QueryOrdered)?;

        // A document without an integer value sorts as 0, like increment.
        let key = |d: &Document| d.i64_field(field).unwrap_or(0);
        let mut docs: Vec<Document> = state.docs(collection).to_vec();
        docs.sort_by(|a, b| key(b).cmp(&key(a)).then(a.created_at.cmp(&b.created_at)));
        Ok(docs)
    }

    async fn increment_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        state.check(Operation::Increment)?;

        let document = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        let current = match document.fields.get(field) {
            None | Some(Value::Null) => 0,
            Some(value) => value.as_i64().ok_or_else(|| StoreError::Malformed {
                id: id.to_string(),
                reason: format!("{field} is not an integer"),
            })?,
        };
        document
            .fields
            .insert(field.to_string(), Value::from(current + delta));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let store = MemoryStore::new();

        let a = store
            .create("people", fields(json!({ "name": "Ada" })))
            .await
            .unwrap();
        let b = store
            .create("people", fields(json!({ "name": "Grace" })))
            .await
            .unwrap();

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert!(a.created_at <= b.created_at);
        assert_eq!(store.documents("people").len(), 2);
        assert!(store.documents("other").is_empty());
    }

    #[tokio::test]
    async fn test_query_exact() {
        let store = MemoryStore::new();
        store
            .create("people", fields(json!({ "name": "Ada", "city": "London" })))
            .await
            .unwrap();
        store
            .create("people", fields(json!({ "name": "Grace", "city": "Arlington" })))
            .await
            .unwrap();

        let found = store.query_exact("people", "city", "London").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].str_field("name"), Some("Ada"));

        assert!(store
            .query_exact("people", "city", "london")
            .await
            .unwrap()
            .is_empty());
        assert!(store
            .query_exact("nobody", "city", "London")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_unique_field_conflict() {
        let store = MemoryStore::new().with_unique_field("people", "email");
        store
            .create("people", fields(json!({ "email": "a@x.com" })))
            .await
            .unwrap();

        let err = store
            .create("people", fields(json!({ "email": "a@x.com" })))
            .await
            .unwrap_err();
        assert!(err.is_conflict_on("email"));
        assert_eq!(store.documents("people").len(), 1);

        // Null and missing values are not indexed.
        store
            .create("people", fields(json!({ "email": null })))
            .await
            .unwrap();
        store
            .create("people", fields(json!({ "email": null })))
            .await
            .unwrap();
        store.create("people", Fields::new()).await.unwrap();
        assert_eq!(store.documents("people").len(), 4);
    }

    #[tokio::test]
    async fn test_ordered_desc_with_ties_oldest_first() {
        let store = MemoryStore::new();
        for (name, score) in [("a", 1), ("b", 5), ("c", 1), ("d", 3)] {
            store
                .create("scores", fields(json!({ "name": name, "score": score })))
                .await
                .unwrap();
        }
        store
            .create("scores", fields(json!({ "name": "unscored" })))
            .await
            .unwrap();

        let ordered = store
            .query_all_ordered_desc("scores", "score")
            .await
            .unwrap();
        let names: Vec<_> = ordered.iter().filter_map(|d| d.str_field("name")).collect();
        assert_eq!(names, vec!["b", "d", "a", "c", "unscored"]);
    }

    #[tokio::test]
    async fn test_ordered_desc_counts_missing_field_as_zero() {
        let store = MemoryStore::new();
        store
            .create("scores", fields(json!({ "name": "old" })))
            .await
            .unwrap();
        store
            .create("scores", fields(json!({ "name": "null", "score": null })))
            .await
            .unwrap();
        store
            .create("scores", fields(json!({ "name": "one", "score": 1 })))
            .await
            .unwrap();
        store
            .create("scores", fields(json!({ "name": "zero", "score": 0 })))
            .await
            .unwrap();

        let ordered = store
            .query_all_ordered_desc("scores", "score")
            .await
            .unwrap();
        let names: Vec<_> = ordered.iter().filter_map(|d| d.str_field("name")).collect();
        assert_eq!(names, vec!["one", "old", "null", "zero"]);
    }

    #[tokio::test]
    async fn test_increment_field() {
        let store = MemoryStore::new();
        let doc = store
            .create("scores", fields(json!({ "score": 2, "label": "x" })))
            .await
            .unwrap();

        store
            .increment_field("scores", &doc.id, "score", 1)
            .await
            .unwrap();
        store
            .increment_field("scores", &doc.id, "bonus", 4)
            .await
            .unwrap();

        let stored = &store.documents("scores")[0];
        assert_eq!(stored.i64_field("score"), Some(3));
        assert_eq!(stored.i64_field("bonus"), Some(4));

        let err = store
            .increment_field("scores", &doc.id, "label", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));

        let err = store
            .increment_field("scores", "missing", "score", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::new();
        store.fail_operations(&[Operation::Create, Operation::QueryOrdered]);

        assert!(matches!(
            store.create("people", Fields::new()).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store
            .query_all_ordered_desc("people", "score")
            .await
            .is_err());
        assert!(store.query_exact("people", "name", "Ada").await.is_ok());

        store.clear_failures();
        assert!(store.create("people", Fields::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        other
            .create("people", fields(json!({ "name": "Ada" })))
            .await
            .unwrap();
        assert_eq!(store.documents("people").len(), 1);
    }
}
