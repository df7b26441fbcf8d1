use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{validate_jwt, Claims, JwtError};
use crate::error::ApiError;

/// Authenticated user context extracted from a validated token. Downstream
/// handlers thread `user_id` into every data operation as the owner scope;
/// there is no other source of identity.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub name: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims.user_id()?;
        Ok(Self {
            user_id,
            email: claims.email,
            name: claims.name,
        })
    }
}

/// JWT authentication middleware that validates bearer tokens and injects the
/// user context. Requests with a missing, malformed, expired or tampered
/// token are rejected here, before any business operation runs.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    // One rejection path for every validation failure; the response does not
    // say which check failed.
    let claims =
        validate_jwt(&token).map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    let auth_user = AuthUser::try_from(claims)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;
    request.extensions_mut().insert(auth_user);

    Ok::<_, ApiError>(next.run(request).await)
}

/// Extract a bearer token from the Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
