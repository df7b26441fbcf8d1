// handlers/protected/notes/note_delete.rs - DELETE /notes/:id handler

use axum::extract::Path;
use axum::Extension;

use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::note_service::NoteService;

/// DELETE /notes/:id - Remove an owned note
///
/// 204 when a row was removed; repeating the call yields 404, never an error.
pub async fn note_delete(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    let service = NoteService::new().await?;
    service.delete_note(id, auth_user.user_id).await?;

    Ok(ApiResponse::<()>::no_content())
}
