use crate::domain::{RecordEmail, StoredRecord};
use async_trait::async_trait;
use sqlx::PgPool;

/// Any failure reported by the record store.
///
/// The message is exactly what gets surfaced to the user; we make no attempt to distinguish
/// transient causes from permanent ones, and we never retry on the caller's behalf.
#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct StoreError(String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self(e.to_string())
    }
}

/// The persistence boundary of the application: a single-row insert and a bounded
/// newest-first listing.
///
/// The form receives its store as an explicit constructor argument rather than reaching for a
/// module-level handle, so tests can substitute an in-memory double.
#[async_trait]
pub trait RecordStore {
    /// Persists one record and returns the stored row, including the identifier and creation
    /// timestamp assigned by the store.
    async fn insert(&self, email: &RecordEmail) -> Result<StoredRecord, StoreError>;

    /// Returns up to `limit` rows, ordered by creation time descending.
    async fn list_recent(&self, limit: i64) -> Result<Vec<StoredRecord>, StoreError>;
}

/// The production store: a thin wrapper over a Postgres connection pool.
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    #[tracing::instrument(
        name = "Saving a new record in the database",
        skip(self, email),
        fields(record_email = %email)
    )]
    async fn insert(&self, email: &RecordEmail) -> Result<StoredRecord, StoreError> {
        // `id` and `created_at` come from the column defaults; the application only ever
        // supplies the email.
        let record = sqlx::query_as::<_, StoredRecord>(
            r#"
            INSERT INTO logins (email)
            VALUES ($1)
            RETURNING id, email, created_at
            "#,
        )
        .bind(email.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            e
        })?;

        Ok(record)
    }

    #[tracing::instrument(name = "Fetching the most recent records", skip(self))]
    async fn list_recent(&self, limit: i64) -> Result<Vec<StoredRecord>, StoreError> {
        let records = sqlx::query_as::<_, StoredRecord>(
            r#"
            SELECT id, email, created_at
            FROM logins
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            e
        })?;

        Ok(records)
    }
}
