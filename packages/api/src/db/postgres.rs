//! Postgres-backed DocumentStore.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use store::{Document, DocumentStore, Fields, StoreError};
use uuid::Uuid;

/// Unique indexes created by the migrations, mapped to the field they guard.
const UNIQUE_INDEXES: &[(&str, &str)] = &[
    ("documents_waitlist_email_key", "email"),
    ("documents_waitlist_referral_code_key", "referralCode"),
];

/// DocumentStore over the `documents` table.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    fields: Json<Fields>,
    created_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id.to_string(),
            fields: row.fields.0,
            created_at: row.created_at,
        }
    }
}

fn field_for_constraint(constraint: &str) -> Option<&'static str> {
    UNIQUE_INDEXES
        .iter()
        .find(|(name, _)| *name == constraint)
        .map(|(_, field)| *field)
}

fn map_error(collection: &str, err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            if let Some(field) = db_err.constraint().and_then(field_for_constraint) {
                return StoreError::Conflict {
                    collection: collection.to_string(),
                    field: field.to_string(),
                };
            }
        }
    }
    StoreError::Unavailable(err.to_string())
}

impl DocumentStore for PgStore {
    async fn create(&self, collection: &str, fields: Fields) -> Result<Document, StoreError> {
        let row: DocumentRow = sqlx::query_as(
            "INSERT INTO documents (collection, fields) VALUES ($1, $2)
             RETURNING id, fields, created_at",
        )
        .bind(collection)
        .bind(Json(&fields))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_error(collection, e))?;

        Ok(row.into())
    }

    async fn query_exact(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            "SELECT id, fields, created_at FROM documents
             WHERE collection = $1 AND fields @> jsonb_build_object($2::text, $3::text)
             ORDER BY created_at",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_error(collection, e))?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn query_all_ordered_desc(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            "SELECT id, fields, created_at FROM documents
             WHERE collection = $1
             ORDER BY CASE
                 WHEN jsonb_typeof(fields -> $2) = 'number' THEN (fields ->> $2)::numeric
                 ELSE 0
             END DESC, created_at ASC",
        )
        .bind(collection)
        .bind(field)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_error(collection, e))?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn increment_field(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError> {
        let not_found = || StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        };
        let uuid = Uuid::parse_str(id).map_err(|_| not_found())?;

        // One statement, so concurrent increments never lose updates.
        let result = sqlx::query(
            "UPDATE documents
             SET fields = jsonb_set(
                 fields,
                 ARRAY[$3::text],
                 to_jsonb(COALESCE((fields ->> $3)::bigint, 0) + $4)
             )
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(uuid)
        .bind(field)
        .bind(delta)
        .execute(&self.pool)
        .await
        .map_err(|e| map_error(collection, e))?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_for_constraint() {
        assert_eq!(
            field_for_constraint("documents_waitlist_email_key"),
            Some("email")
        );
        assert_eq!(
            field_for_constraint("documents_waitlist_referral_code_key"),
            Some("referralCode")
        );
        assert_eq!(field_for_constraint("documents_pkey"), None);
    }

    #[test]
    fn test_non_database_errors_are_unavailable() {
        let err = map_error("waitlist", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
