//! # Documents and the abstract document store
//!
//! A [`Document`] is a schemaless record living in a named collection. Its
//! identity (`id`) and creation time (`created_at`) are assigned by the store,
//! never by the caller, so every backend agrees on one clock and one id space.
//! Everything else lives in [`Fields`], a JSON object keyed by field name.
//!
//! ## [`DocumentStore`] trait
//!
//! The four primitives every backend must provide:
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`create`](DocumentStore::create) | Inserts a document and returns it with its assigned id and timestamp. Rejects with [`StoreError::Conflict`] when a unique field is already taken. |
//! | [`query_exact`](DocumentStore::query_exact) | All documents whose field equals the given string. |
//! | [`query_all_ordered_desc`](DocumentStore::query_all_ordered_desc) | All documents of a collection by a numeric field, largest first, ties oldest first. A missing or non-integer value sorts as 0. |
//! | [`increment_field`](DocumentStore::increment_field) | Atomically adds `delta` to a numeric field of one document. |
//!
//! Futures returned by the trait are `Send` so the store can be driven from a
//! multi-threaded HTTP server.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// Field map of a document.
pub type Fields = serde_json::Map<String, Value>;

/// A stored document together with its store-assigned metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Read a string field.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Read an integer field.
    pub fn i64_field(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(Value::as_i64)
    }

    /// Deserialize the field map into a typed struct.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| StoreError::Malformed {
                id: self.id.clone(),
                reason: e.to_string(),
            })
    }
}

/// Async interface to a document database.
pub trait DocumentStore {
    fn create(
        &self,
        collection: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<Document, StoreError>> + Send;

    fn query_exact(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send;

    fn query_all_ordered_desc(
        &self,
        collection: &str,
        field: &str,
    ) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send;

    fn increment_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
