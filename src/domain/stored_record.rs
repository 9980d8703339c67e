use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A row persisted by the record store.
///
/// `id` and `created_at` are assigned by the store itself on insertion; the application never
/// mutates a `StoredRecord`, it only reads them back for display.
#[derive(Debug, Clone, PartialEq, serde::Serialize, sqlx::FromRow)]
pub struct StoredRecord {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
