use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every update; list and search order by this, descending.
    pub updated_at: DateTime<Utc>,
    /// Owner; immutable after creation and part of every query predicate.
    pub user_id: i64,
}
