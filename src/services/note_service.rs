use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::note::Note;

// Fields default to empty so an absent title reaches the validation path and
// comes back as a 400, not a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateNoteRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("title is required")]
    TitleRequired,

    #[error("note {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Note operations. Every method takes the authenticated owner id and every
/// SQL statement filters on it; that ownership predicate is the only access
/// control there is. A note owned by someone else and a note that never
/// existed are both `NotFound`.
pub struct NoteService {
    pool: PgPool,
}

impl NoteService {
    pub async fn new() -> Result<Self, NoteError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    pub async fn list_notes(&self, owner_id: i64) -> Result<Vec<Note>, NoteError> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    /// Literal substring match over title and content. The term is escaped so
    /// LIKE metacharacters in user input match themselves; Postgres LIKE is
    /// case-sensitive.
    pub async fn search_notes(&self, term: &str, owner_id: i64) -> Result<Vec<Note>, NoteError> {
        let pattern = format!("%{}%", escape_like(term));

        let notes = sqlx::query_as::<_, Note>(
            "SELECT * FROM notes \
             WHERE user_id = $1 AND (title LIKE $2 OR content LIKE $2) \
             ORDER BY updated_at DESC",
        )
        .bind(owner_id)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    pub async fn get_note(&self, id: i64, owner_id: i64) -> Result<Note, NoteError> {
        sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(NoteError::NotFound(id))
    }

    /// Both timestamps are bound to the same instant, so a fresh note always
    /// has created_at == updated_at.
    pub async fn create_note(
        &self,
        req: CreateNoteRequest,
        owner_id: i64,
    ) -> Result<Note, NoteError> {
        if req.title.trim().is_empty() {
            return Err(NoteError::TitleRequired);
        }

        let now = Utc::now();
        let note = sqlx::query_as::<_, Note>(
            "INSERT INTO notes (title, content, created_at, updated_at, user_id) \
             VALUES ($1, $2, $3, $3, $4) \
             RETURNING *",
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(now)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    pub async fn update_note(
        &self,
        id: i64,
        req: UpdateNoteRequest,
        owner_id: i64,
    ) -> Result<Note, NoteError> {
        if req.title.trim().is_empty() {
            return Err(NoteError::TitleRequired);
        }

        // Single statement: the ownership filter and the row mutation are one
        // atomic UPDATE, and created_at is never touched.
        sqlx::query_as::<_, Note>(
            "UPDATE notes SET title = $1, content = $2, updated_at = $3 \
             WHERE id = $4 AND user_id = $5 \
             RETURNING *",
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(Utc::now())
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(NoteError::NotFound(id))
    }

    /// Returns whether a row was actually removed. Deleting a missing or
    /// non-owned note reports `NotFound` rather than failing, so a repeated
    /// delete is harmless.
    pub async fn delete_note(&self, id: i64, owner_id: i64) -> Result<(), NoteError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(NoteError::NotFound(id));
        }
        Ok(())
    }
}

/// Escape `\`, `%` and `_` so a LIKE pattern built from user input matches
/// the term literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
