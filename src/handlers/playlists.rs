//! Playlist CRUD and membership management.

use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{Playlist, PlaylistDetail, PlaylistSummary};
use crate::database::repos::{playlists, videos};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::validate;

#[derive(Debug, Deserialize)]
pub struct PlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// POST /api/v1/playlists
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PlaylistRequest>,
) -> ApiResult<Playlist> {
    validate::require_fields(&[
        ("name", payload.name.as_deref()),
        ("description", payload.description.as_deref()),
    ])?;

    let pool = DatabaseManager::pool().await?;
    let playlist = playlists::insert(
        &pool,
        payload.name.as_deref().unwrap(),
        payload.description.as_deref().unwrap(),
        user.id,
    )
    .await?;

    Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

/// GET /api/v1/playlists/user/:userId - A user's playlists with totals
pub async fn by_user(Path(user_id): Path<String>) -> ApiResult<Vec<PlaylistSummary>> {
    let user_id = validate::parse_id(&user_id, "User")?;

    let pool = DatabaseManager::pool().await?;
    let lists = playlists::by_user(&pool, user_id).await?;
    Ok(ApiResponse::ok(lists, "User playlists fetched successfully"))
}

/// GET /api/v1/playlists/:playlistId - Detail with published members
pub async fn get_by_id(Path(playlist_id): Path<String>) -> ApiResult<PlaylistDetail> {
    let playlist_id = validate::parse_id(&playlist_id, "Playlist")?;

    let pool = DatabaseManager::pool().await?;
    let detail = playlists::detail(&pool, playlist_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Playlist not found"))?;

    Ok(ApiResponse::ok(detail, "Playlist fetched successfully"))
}

/// PATCH /api/v1/playlists/add/:videoId/:playlistId - Owner-only set-add
pub async fn add_video(
    Extension(user): Extension<AuthUser>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> ApiResult<PlaylistDetail> {
    let video_id = validate::parse_id(&video_id, "Video")?;
    let playlist_id = validate::parse_id(&playlist_id, "Playlist")?;

    let pool = DatabaseManager::pool().await?;
    let playlist = playlists::find_by_id(&pool, playlist_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Playlist not found"))?;
    if !videos::exists(&pool, video_id).await? {
        return Err(ApiError::not_found("Video not found"));
    }
    validate::ensure_owner(user.id, playlist.owner_id, "add video to their playlist")?;

    playlists::add_video(&pool, playlist_id, video_id).await?;

    let detail = playlists::detail(&pool, playlist_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Playlist not found"))?;
    Ok(ApiResponse::ok(detail, "Added video to playlist successfully"))
}

/// PATCH /api/v1/playlists/remove/:videoId/:playlistId - Owner-only removal
pub async fn remove_video(
    Extension(user): Extension<AuthUser>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> ApiResult<PlaylistDetail> {
    let video_id = validate::parse_id(&video_id, "Video")?;
    let playlist_id = validate::parse_id(&playlist_id, "Playlist")?;

    let pool = DatabaseManager::pool().await?;
    let playlist = playlists::find_by_id(&pool, playlist_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Playlist not found"))?;
    if !videos::exists(&pool, video_id).await? {
        return Err(ApiError::not_found("Video not found"));
    }
    validate::ensure_owner(user.id, playlist.owner_id, "remove video from their playlist")?;

    playlists::remove_video(&pool, playlist_id, video_id).await?;

    let detail = playlists::detail(&pool, playlist_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Playlist not found"))?;
    Ok(ApiResponse::ok(detail, "Removed video from playlist successfully"))
}

/// PATCH /api/v1/playlists/:playlistId - Owner-only rename
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(playlist_id): Path<String>,
    Json(payload): Json<PlaylistRequest>,
) -> ApiResult<Playlist> {
    let playlist_id = validate::parse_id(&playlist_id, "Playlist")?;
    validate::require_fields(&[
        ("name", payload.name.as_deref()),
        ("description", payload.description.as_deref()),
    ])?;

    let pool = DatabaseManager::pool().await?;
    let playlist = playlists::find_by_id(&pool, playlist_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Playlist not found"))?;
    validate::ensure_owner(user.id, playlist.owner_id, "edit the playlist")?;

    let updated = playlists::update(
        &pool,
        playlist_id,
        payload.name.as_deref().unwrap(),
        payload.description.as_deref().unwrap(),
    )
    .await?;

    Ok(ApiResponse::ok(updated, "Playlist updated successfully"))
}

/// DELETE /api/v1/playlists/:playlistId - Owner-only delete
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(playlist_id): Path<String>,
) -> ApiResult<Value> {
    let playlist_id = validate::parse_id(&playlist_id, "Playlist")?;

    let pool = DatabaseManager::pool().await?;
    let playlist = playlists::find_by_id(&pool, playlist_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Playlist not found"))?;
    validate::ensure_owner(user.id, playlist.owner_id, "delete the playlist")?;

    playlists::delete(&pool, playlist_id).await?;
    Ok(ApiResponse::ok(json!({}), "Playlist deleted successfully"))
}
