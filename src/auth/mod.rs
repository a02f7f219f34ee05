use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

pub mod hash;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Claims carried by the short-lived access token
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Claims carried by the long-lived refresh token. Only the subject; the
/// stored copy on the user row is the revocation handle.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("JWT secret is not configured")]
    MissingSecret,
    #[error("Token generation failed: {0}")]
    TokenGeneration(String),
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Token expired")]
    ExpiredToken,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
}

/// Generate a fresh access/refresh pair for the subject.
///
/// The caller persists the refresh token on the user row; rotation on the
/// refresh endpoint invalidates every previously issued refresh token.
pub fn issue_token_pair(user_id: Uuid, username: &str) -> Result<TokenPair, AuthError> {
    let security = &config::config().security;
    let now = Utc::now();

    let access_claims = AccessClaims {
        sub: user_id,
        username: username.to_string(),
        exp: (now + Duration::minutes(security.access_token_expiry_minutes)).timestamp(),
        iat: now.timestamp(),
    };
    let refresh_claims = RefreshClaims {
        sub: user_id,
        exp: (now + Duration::days(security.refresh_token_expiry_days)).timestamp(),
        iat: now.timestamp(),
    };

    Ok(TokenPair {
        access_token: encode_claims(&access_claims, &security.access_token_secret)?,
        refresh_token: encode_claims(&refresh_claims, &security.refresh_token_secret)?,
    })
}

pub fn verify_access_token(token: &str) -> Result<AccessClaims, AuthError> {
    decode_claims(token, &config::config().security.access_token_secret)
}

pub fn verify_refresh_token(token: &str) -> Result<RefreshClaims, AuthError> {
    decode_claims(token, &config::config().security.refresh_token_secret)
}

fn encode_claims<C: Serialize>(claims: &C, secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

fn decode_claims<C: for<'de> Deserialize<'de>>(token: &str, secret: &str) -> Result<C, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }
    decode::<C>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken(e.to_string()),
        })
}

/// Build the http-only token cookies. `secure` follows the environment
/// switch, so local development works over plain http.
pub fn auth_cookies(
    pair: &TokenPair,
) -> (axum_extra::extract::cookie::Cookie<'static>, axum_extra::extract::cookie::Cookie<'static>) {
    (
        build_cookie(ACCESS_COOKIE, pair.access_token.clone()),
        build_cookie(REFRESH_COOKIE, pair.refresh_token.clone()),
    )
}

/// Empty replacements used by logout
pub fn removal_cookies(
) -> (axum_extra::extract::cookie::Cookie<'static>, axum_extra::extract::cookie::Cookie<'static>) {
    (build_cookie(ACCESS_COOKIE, String::new()), build_cookie(REFRESH_COOKIE, String::new()))
}

fn build_cookie(name: &'static str, value: String) -> axum_extra::extract::cookie::Cookie<'static> {
    axum_extra::extract::cookie::Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(config::config().is_production())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn claims_roundtrip() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let claims = AccessClaims {
            sub: id,
            username: "chai".to_string(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode_claims(&claims, SECRET).unwrap();
        let decoded: AccessClaims = decode_claims(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, id);
        assert_eq!(decoded.username, "chai");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = RefreshClaims {
            sub: Uuid::new_v4(),
            exp: (Utc::now() + Duration::days(1)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        let token = encode_claims(&claims, SECRET).unwrap();
        let result: Result<RefreshClaims, _> = decode_claims(&token, "other-secret");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = AccessClaims {
            sub: Uuid::new_v4(),
            username: "old".to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
            iat: (Utc::now() - Duration::hours(3)).timestamp(),
        };
        let token = encode_claims(&claims, SECRET).unwrap();
        let result: Result<AccessClaims, _> = decode_claims(&token, SECRET);
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn empty_secret_is_refused() {
        let claims = RefreshClaims {
            sub: Uuid::new_v4(),
            exp: (Utc::now() + Duration::days(1)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        assert!(matches!(encode_claims(&claims, ""), Err(AuthError::MissingSecret)));
    }
}
