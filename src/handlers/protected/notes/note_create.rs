// handlers/protected/notes/note_create.rs - POST /notes handler

use axum::{Extension, Json};

use crate::database::models::note::Note;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::note_service::{CreateNoteRequest, NoteService};

/// POST /notes - Create a note owned by the caller
///
/// Title must be non-empty; content may be empty.
pub async fn note_create(
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateNoteRequest>,
) -> ApiResult<Note> {
    let service = NoteService::new().await?;
    let note = service.create_note(payload, auth_user.user_id).await?;

    Ok(ApiResponse::created(note))
}
