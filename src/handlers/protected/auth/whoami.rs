// handlers/protected/auth/whoami.rs - GET /auth/whoami handler

use axum::Extension;

use crate::database::models::user::User;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::auth_service::AuthService;

/// GET /auth/whoami - Current authenticated user record
pub async fn whoami_get(Extension(auth_user): Extension<AuthUser>) -> ApiResult<User> {
    let service = AuthService::new().await?;
    let user = service.get_user_by_id(auth_user.user_id).await?;

    Ok(ApiResponse::success(user))
}
