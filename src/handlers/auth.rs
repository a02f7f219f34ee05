//! Registration, login, token refresh and session teardown.

use axum::{extract::Multipart, Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiResponse, ApiResult};
use crate::auth::{self, hash};
use crate::database::models::PublicUser;
use crate::database::repos::users::{self, NewUser};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::upload;
use crate::middleware::AuthUser;
use crate::storage;
use crate::validate;

/// POST /api/v1/users/register - Create an account
///
/// Multipart form: `fullname`, `email`, `username`, `password` plus a
/// required `avatar` file and an optional `coverImage` file. Media already
/// uploaded is deleted best-effort when a later step fails.
pub async fn register(multipart: Multipart) -> ApiResult<PublicUser> {
    let form = upload::read_form(multipart).await?;

    let fullname = form.text("fullname");
    let email = form.text("email");
    let username = form.text("username");
    let password = form.text("password");
    validate::require_fields(&[
        ("fullname", fullname),
        ("email", email),
        ("username", username),
        ("password", password),
    ])?;
    let (fullname, email, username, password) =
        (fullname.unwrap(), email.unwrap(), username.unwrap(), password.unwrap());

    let pool = DatabaseManager::pool().await?;

    // Friendly duplicate answer; the unique indexes close the race on insert
    if users::find_by_username_or_email(&pool, Some(username), Some(email)).await?.is_some() {
        return Err(ApiError::conflict("User with email or username already exists"));
    }

    let avatar_file =
        form.file("avatar").ok_or_else(|| ApiError::bad_request("Avatar file is missing"))?;
    let avatar = storage::store().upload(avatar_file.path()).await?;

    let cover = match form.file("coverImage") {
        Some(file) => match storage::store().upload(file.path()).await {
            Ok(asset) => Some(asset),
            Err(e) => {
                storage::delete_best_effort(&avatar.public_id).await;
                return Err(e.into());
            }
        },
        None => None,
    };

    let password_hash = hash::hash_password(password)?;
    let inserted = users::insert(
        &pool,
        NewUser {
            username: &username.to_lowercase(),
            email,
            password_hash: &password_hash,
            full_name: fullname,
            avatar_url: &avatar.url,
            avatar_public_id: &avatar.public_id,
            cover_image_url: cover.as_ref().map(|c| c.url.as_str()),
            cover_image_public_id: cover.as_ref().map(|c| c.public_id.as_str()),
        },
    )
    .await;

    match inserted {
        Ok(user) => {
            tracing::info!("Registered user {}", user.username);
            Ok(ApiResponse::created(PublicUser::from(user), "User registered successfully"))
        }
        Err(e) => {
            // The account was not created, so the uploads are orphans
            storage::delete_best_effort(&avatar.public_id).await;
            if let Some(c) = &cover {
                storage::delete_best_effort(&c.public_id).await;
            }
            Err(e.into())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/v1/users/login - Authenticate and receive the token pair
pub async fn login(
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<Value>), ApiError> {
    let has_identity = payload.email.as_deref().map_or(false, |s| !s.trim().is_empty())
        || payload.username.as_deref().map_or(false, |s| !s.trim().is_empty());
    let password = payload.password.as_deref().unwrap_or("");
    if !has_identity || password.is_empty() {
        return Err(ApiError::bad_request("All fields are required"));
    }

    let pool = DatabaseManager::pool().await?;
    let user = users::find_by_username_or_email(
        &pool,
        payload.username.as_deref(),
        payload.email.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !hash::verify_password(password, &user.password_hash)? {
        return Err(ApiError::unauthorized("Invalid email, username or password"));
    }

    let pair = auth::issue_token_pair(user.id, &user.username)?;
    users::set_refresh_token(&pool, user.id, Some(&pair.refresh_token)).await?;

    let (access, refresh) = auth::auth_cookies(&pair);
    let jar = jar.add(access).add(refresh);

    let body = json!({ "user": PublicUser::from(user) });
    Ok((jar, ApiResponse::ok(body, "User logged in successfully")))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

/// POST /api/v1/users/refresh-token - Rotate the token pair
///
/// The refresh token may arrive as a cookie or in the body. The pair is
/// regenerated for the subject of the verified token, and only if the
/// presented token matches the one stored on that user.
pub async fn refresh_token(
    jar: CookieJar,
    payload: Option<Json<RefreshRequest>>,
) -> Result<(CookieJar, ApiResponse<Value>), ApiError> {
    let incoming = jar
        .get(auth::REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| payload.and_then(|Json(p)| p.refresh_token))
        .ok_or_else(|| ApiError::bad_request("Refresh token is required"))?;

    let claims = auth::verify_refresh_token(&incoming)
        .map_err(|_| ApiError::unauthorized("Invalid refresh token"))?;

    let pool = DatabaseManager::pool().await?;
    let user = users::find_by_id(&pool, claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid refresh token"))?;

    // Rotation: a stored token that no longer matches has been superseded
    if user.refresh_token.as_deref() != Some(incoming.as_str()) {
        return Err(ApiError::unauthorized("Refresh token is expired or already used"));
    }

    let pair = auth::issue_token_pair(user.id, &user.username)?;
    users::set_refresh_token(&pool, user.id, Some(&pair.refresh_token)).await?;

    let (access, refresh) = auth::auth_cookies(&pair);
    let jar = jar.add(access).add(refresh);

    Ok((jar, ApiResponse::ok(json!(pair), "Access token refreshed successfully")))
}

/// POST /api/v1/users/logout - Clear the stored refresh token and cookies
pub async fn logout(
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse<Value>), ApiError> {
    let pool = DatabaseManager::pool().await?;
    users::set_refresh_token(&pool, user.id, None).await?;

    let (access, refresh) = auth::removal_cookies();
    let jar = jar.add(access).add(refresh);

    Ok((jar, ApiResponse::ok(json!({}), "User logged out successfully")))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "oldPassword")]
    pub old_password: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

/// PUT /api/v1/users/change-password
pub async fn change_password(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Value> {
    validate::require_fields(&[
        ("oldPassword", payload.old_password.as_deref()),
        ("newPassword", payload.new_password.as_deref()),
    ])?;

    let pool = DatabaseManager::pool().await?;
    let account = users::find_by_id(&pool, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !hash::verify_password(payload.old_password.as_deref().unwrap(), &account.password_hash)? {
        return Err(ApiError::unauthorized("Invalid old password"));
    }

    let new_hash = hash::hash_password(payload.new_password.as_deref().unwrap())?;
    users::update_password(&pool, user.id, &new_hash).await?;

    Ok(ApiResponse::ok(json!({}), "Password changed successfully"))
}
