use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::auth::{self, AccessClaims};
use crate::error::ApiError;

/// Authenticated actor extracted from the access token.
///
/// Handlers trust this identity completely; nothing downstream re-checks
/// credentials.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

impl From<AccessClaims> for AuthUser {
    fn from(claims: AccessClaims) -> Self {
        Self { id: claims.sub, username: claims.username }
    }
}

/// JWT authentication middleware. Accepts the token from the access cookie
/// or an `Authorization: Bearer` header, verifies it and injects `AuthUser`
/// into request extensions.
pub async fn jwt_auth_middleware(
    jar: CookieJar,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&jar, &headers)
        .ok_or_else(|| ApiError::unauthorized("Access token is required"))?;

    let claims = auth::verify_access_token(&token)
        .map_err(|_| ApiError::unauthorized("Invalid access token"))?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(auth::ACCESS_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    let auth_header = headers.get("authorization")?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
