// handlers/protected/notes/note_list.rs - GET /notes handler

use axum::extract::Query;
use axum::Extension;
use serde::Deserialize;

use crate::database::models::note::Note;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::note_service::NoteService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

/// GET /notes?search= - List the caller's notes, most recently updated first
///
/// A non-empty search term narrows the listing to notes whose title or
/// content contains it; an empty or whitespace term is treated as "no
/// search".
pub async fn note_list(
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Note>> {
    let service = NoteService::new().await?;

    let notes = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => service.search_notes(term, auth_user.user_id).await?,
        _ => service.list_notes(auth_user.user_id).await?,
    };

    Ok(ApiResponse::success(notes))
}
