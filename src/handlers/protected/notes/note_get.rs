// handlers/protected/notes/note_get.rs - GET /notes/:id handler

use axum::extract::Path;
use axum::Extension;

use crate::database::models::note::Note;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::note_service::NoteService;

/// GET /notes/:id - Show a single owned note
pub async fn note_get(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Note> {
    let service = NoteService::new().await?;
    let note = service.get_note(id, auth_user.user_id).await?;

    Ok(ApiResponse::success(note))
}
