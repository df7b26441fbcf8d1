// handlers/public/auth/login.rs - POST /auth/login handler

use axum::Json;

use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::auth_service::{AuthResponse, AuthService, LoginRequest};

/// POST /auth/login - Authenticate and receive a token
///
/// Returns 401 with one fixed message for every credential failure; the
/// response carries no signal about whether the email is registered.
pub async fn login_post(Json(payload): Json<LoginRequest>) -> ApiResult<AuthResponse> {
    let service = AuthService::new().await?;
    let response = service.login(payload).await?;

    Ok(ApiResponse::success(response))
}
