use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::{self, Claims, JwtError};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::user::User;

pub const MIN_PASSWORD_LENGTH: usize = 6;

// Fields default to empty so absent keys reach the validation path and come
// back as a 400, not a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("all fields are required")]
    MissingFields,

    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("user with this email already exists")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("password hash error: {0}")]
    Hash(argon2::password_hash::Error),

    #[error(transparent)]
    Token(#[from] JwtError),
}

/// Credential and identity operations: user records, password hashing and
/// verification, token issuance. Nothing outside this service reads or writes
/// the users table.
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub async fn new() -> Result<Self, AuthError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Create a user and issue a token. Email uniqueness is the unique
    /// index's job: two concurrent registrations race to the insert and the
    /// loser's unique violation becomes `EmailTaken`. There is deliberately
    /// no existence pre-check.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AuthError> {
        validate_registration(&req)?;

        let password_hash = hash_password(&req.password)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, first_name, last_name) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(&req.email)
        .bind(&password_hash)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => AuthError::EmailTaken,
            _ => AuthError::Sqlx(e),
        })?;

        let token = auth::generate_jwt(&Claims::new(&user))?;
        Ok(AuthResponse { token, user })
    }

    /// Authenticate by email and password. An unknown email and a failed
    /// password check collapse into the same `InvalidCredentials` value so
    /// the response never reveals whether the email exists.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        if req.email.trim().is_empty() || req.password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&req.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AuthError::Sqlx)?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(&req.password, &user.password_hash)?;

        let token = auth::generate_jwt(&Claims::new(&user))?;
        Ok(AuthResponse { token, user })
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AuthError::Sqlx)?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Handlers surface the same rules as 400s, but the component defends them
/// regardless of what the caller checked.
fn validate_registration(req: &RegisterRequest) -> Result<(), AuthError> {
    if req.email.trim().is_empty()
        || req.password.is_empty()
        || req.first_name.trim().is_empty()
        || req.last_name.trim().is_empty()
    {
        return Err(AuthError::MissingFields);
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(AuthError::Hash)
}

fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(stored_hash).map_err(AuthError::Hash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
