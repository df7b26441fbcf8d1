// handlers/protected/notes/note_update.rs - PUT /notes/:id handler

use axum::extract::Path;
use axum::{Extension, Json};

use crate::database::models::note::Note;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::note_service::{NoteService, UpdateNoteRequest};

/// PUT /notes/:id - Update an owned note's title and content
///
/// Refreshes updated_at; a note owned by someone else is a plain 404.
pub async fn note_update(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateNoteRequest>,
) -> ApiResult<Note> {
    let service = NoteService::new().await?;
    let note = service.update_note(id, payload, auth_user.user_id).await?;

    Ok(ApiResponse::success(note))
}
