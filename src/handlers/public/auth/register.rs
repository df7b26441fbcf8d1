// handlers/public/auth/register.rs - POST /auth/register handler

use axum::Json;

use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::auth_service::{AuthResponse, AuthService, RegisterRequest};

/// POST /auth/register - Create a user account and issue a token
///
/// All four fields are required and the password must be at least 6
/// characters. A duplicate email is a 409; the uniqueness decision is made by
/// the database index, not a lookup.
pub async fn register_post(Json(payload): Json<RegisterRequest>) -> ApiResult<AuthResponse> {
    let service = AuthService::new().await?;
    let response = service.register(payload).await?;

    Ok(ApiResponse::created(response))
}
