//! Errors reported by document store backends.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A unique field already holds this value in the collection.
    #[error("unique constraint on {collection}.{field} violated")]
    Conflict { collection: String, field: String },

    #[error("document {id} not found in {collection}")]
    NotFound { collection: String, id: String },

    /// A stored document could not be decoded into the expected shape.
    #[error("document {id} is malformed: {reason}")]
    Malformed { id: String, reason: String },
}

impl StoreError {
    /// Whether this is a uniqueness violation on the given field.
    pub fn is_conflict_on(&self, field_name: &str) -> bool {
        matches!(self, StoreError::Conflict { field, .. } if field == field_name)
    }
}
