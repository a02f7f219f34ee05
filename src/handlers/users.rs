//! Account and channel endpoints for the authenticated user.

use axum::{
    extract::{Multipart, Path},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{ChannelProfile, PublicUser, VideoSummary};
use crate::database::repos::users;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::upload;
use crate::middleware::AuthUser;
use crate::storage;
use crate::validate;

/// GET /api/v1/users/current-user
pub async fn current_user(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let account = users::find_by_id(&pool, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(ApiResponse::ok(
        json!({ "user": PublicUser::from(account) }),
        "User retrieved successfully",
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
}

/// PATCH /api/v1/users/update-account
pub async fn update_account(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateAccountRequest>,
) -> ApiResult<PublicUser> {
    validate::require_fields(&[
        ("fullname", payload.fullname.as_deref()),
        ("email", payload.email.as_deref()),
    ])?;

    let pool = DatabaseManager::pool().await?;
    let updated = users::update_account(
        &pool,
        user.id,
        payload.fullname.as_deref().unwrap(),
        payload.email.as_deref().unwrap(),
    )
    .await?;

    Ok(ApiResponse::ok(PublicUser::from(updated), "Account details updated successfully"))
}

/// PATCH /api/v1/users/avatar - Replace the avatar image
pub async fn update_avatar(
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<Value> {
    let form = upload::read_form(multipart).await?;
    let file =
        form.file("avatar").ok_or_else(|| ApiError::bad_request("Avatar file is missing"))?;

    let asset = storage::store().upload(file.path()).await?;

    let pool = DatabaseManager::pool().await?;
    let previous = users::find_by_id(&pool, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    let updated = users::update_avatar(&pool, user.id, &asset.url, &asset.public_id).await?;

    // The replaced asset is now unreferenced
    storage::delete_best_effort(&previous.avatar_public_id).await;

    Ok(ApiResponse::ok(json!({ "avatar": updated.avatar_url }), "Avatar updated successfully"))
}

/// PATCH /api/v1/users/cover-image - Replace the cover image
pub async fn update_cover_image(
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<Value> {
    let form = upload::read_form(multipart).await?;
    let file = form
        .file("coverImage")
        .ok_or_else(|| ApiError::bad_request("Cover image file is missing"))?;

    let asset = storage::store().upload(file.path()).await?;

    let pool = DatabaseManager::pool().await?;
    let previous = users::find_by_id(&pool, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    let updated = users::update_cover_image(&pool, user.id, &asset.url, &asset.public_id).await?;

    if let Some(old_id) = previous.cover_image_public_id.as_deref() {
        storage::delete_best_effort(old_id).await;
    }

    Ok(ApiResponse::ok(
        json!({ "coverImage": updated.cover_image_url }),
        "Cover image updated successfully",
    ))
}

/// GET /api/v1/users/c/:username - Channel profile with subscription stats
pub async fn channel_profile(
    Extension(user): Extension<AuthUser>,
    Path(username): Path<String>,
) -> ApiResult<ChannelProfile> {
    if username.trim().is_empty() {
        return Err(ApiError::bad_request("Username is required"));
    }

    let pool = DatabaseManager::pool().await?;
    let profile = users::channel_profile(&pool, &username, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Channel not found"))?;

    Ok(ApiResponse::ok(profile, "User channel profile retrieved successfully"))
}

/// GET /api/v1/users/history - Watch history hydrated to video summaries
pub async fn watch_history(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<VideoSummary>> {
    let pool = DatabaseManager::pool().await?;
    let history = users::watch_history(&pool, user.id).await?;
    Ok(ApiResponse::ok(history, "User watch history retrieved successfully"))
}
