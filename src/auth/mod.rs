use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::database::models::user::User;

/// Claims embedded in every issued token. The user id travels as `sub`
/// (stringly, per JWT convention) and is the only claim downstream data
/// operations consume; email and display name ride along for clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: &User) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: format!("{} {}", user.first_name, user.last_name),
            exp,
            iat: now.timestamp(),
        }
    }

    /// The authenticated user identifier carried by this token.
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidSubject(self.sub.clone()))
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token signing secret is not configured")]
    SecretNotConfigured,

    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    #[error("invalid subject claim: {0}")]
    InvalidSubject(String),
}

/// Sign claims with the configured secret (HMAC-SHA-256).
pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::SecretNotConfigured);
    }

    sign_with_secret(claims, secret.as_bytes())
}

/// Verify signature and expiry against the configured secret and return the
/// embedded claims. Any failure is reported as one invalid-token value.
pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::SecretNotConfigured);
    }

    decode_with_secret(token, secret.as_bytes())
}

fn sign_with_secret(claims: &Claims, secret: &[u8]) -> Result<String, JwtError> {
    let encoding_key = EncodingKey::from_secret(secret);

    encode(&Header::default(), claims, &encoding_key).map_err(JwtError::Signing)
}

fn decode_with_secret(token: &str, secret: &[u8]) -> Result<Claims, JwtError> {
    let decoding_key = DecodingKey::from_secret(secret);
    // Validation::default() is HS256 with expiry checking
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(JwtError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn fixed_created_at() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2025, 8, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn test_user() -> User {
        User {
            id: 42,
            email: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            created_at: fixed_created_at(),
        }
    }

    fn claims_expiring_in(hours: i64) -> Claims {
        let user = test_user();
        let now = Utc::now();
        Claims {
            sub: user.id.to_string(),
            email: user.email,
            name: format!("{} {}", user.first_name, user.last_name),
            exp: (now + Duration::hours(hours)).timestamp(),
            iat: now.timestamp(),
        }
    }

    #[test]
    fn test_round_trip_preserves_identity() {
        let claims = claims_expiring_in(1);
        let token = sign_with_secret(&claims, SECRET).unwrap();
        let decoded = decode_with_secret(&token, SECRET).unwrap();

        assert_eq!(decoded.user_id().unwrap(), 42);
        assert_eq!(decoded.email, "a@x.com");
        assert_eq!(decoded.name, "A B");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = claims_expiring_in(-1);
        let token = sign_with_secret(&claims, SECRET).unwrap();

        assert!(matches!(
            decode_with_secret(&token, SECRET),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let claims = claims_expiring_in(1);
        let token = sign_with_secret(&claims, SECRET).unwrap();

        let other = b"ffffffffffffffffffffffffffffffff";
        assert!(matches!(
            decode_with_secret(&token, other),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let claims = claims_expiring_in(1);
        let token = sign_with_secret(&claims, SECRET).unwrap();

        // Flip a character in the payload segment
        let mut chars: Vec<char> = token.chars().collect();
        let mid = token.len() / 2;
        chars[mid] = if chars[mid] == 'a' { 'b' } else { 'a' };
        let tampered: String = chars.into_iter().collect();

        assert!(decode_with_secret(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_non_numeric_subject_is_rejected() {
        let mut claims = claims_expiring_in(1);
        claims.sub = "not-a-number".to_string();

        assert!(matches!(
            claims.user_id(),
            Err(JwtError::InvalidSubject(_))
        ));
    }
}
