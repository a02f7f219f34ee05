//! Video listing, publishing and owner mutations.

use axum::{
    extract::{Multipart, Path, Query},
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{Video, VideoDetail, VideoSummary};
use crate::database::repos::videos::{self, ListVideosParams, NewVideo};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::upload;
use crate::middleware::AuthUser;
use crate::query::{Page, PageParams};
use crate::storage;
use crate::validate;

#[derive(Debug, Deserialize)]
pub struct ListVideosQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub query: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortType")]
    pub sort_type: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// GET /api/v1/videos - Paged listing of published videos
pub async fn list(Query(params): Query<ListVideosQuery>) -> ApiResult<Page<VideoSummary>> {
    let owner = match params.user_id.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(validate::parse_id(raw, "User")?),
        None => None,
    };

    let list_params = ListVideosParams {
        page: PageParams::from_query(params.page, params.limit),
        search: params.query.filter(|q| !q.trim().is_empty()),
        sort_by: params.sort_by,
        sort_type: params.sort_type,
        owner,
    };

    let pool = DatabaseManager::pool().await?;
    let page = videos::list(&pool, &list_params).await?;
    Ok(ApiResponse::ok(page, "Videos fetched successfully"))
}

/// POST /api/v1/videos - Upload and register a new video
///
/// Multipart form: `title`, `description` plus `videoFile` and `thumbnail`
/// files. The stored video starts unpublished; duration comes from the
/// media store's probe.
pub async fn publish(
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<Video> {
    let form = upload::read_form(multipart).await?;

    let title = form.text("title");
    let description = form.text("description");
    validate::require_fields(&[("title", title), ("description", description)])?;

    let video_file =
        form.file("videoFile").ok_or_else(|| ApiError::bad_request("Video file is required"))?;
    let thumbnail_file =
        form.file("thumbnail").ok_or_else(|| ApiError::bad_request("Thumbnail is required"))?;

    let video_asset = storage::store().upload(video_file.path()).await?;
    let thumbnail_asset = match storage::store().upload(thumbnail_file.path()).await {
        Ok(asset) => asset,
        Err(e) => {
            storage::delete_best_effort(&video_asset.public_id).await;
            return Err(e.into());
        }
    };

    let pool = DatabaseManager::pool().await?;
    let inserted = videos::insert(
        &pool,
        NewVideo {
            title: title.unwrap(),
            description: description.unwrap(),
            video_url: &video_asset.url,
            video_public_id: &video_asset.public_id,
            thumbnail_url: &thumbnail_asset.url,
            thumbnail_public_id: &thumbnail_asset.public_id,
            duration: video_asset.duration.unwrap_or(0.0),
            owner: user.id,
        },
    )
    .await;

    match inserted {
        Ok(video) => Ok(ApiResponse::created(video, "Video uploaded successfully")),
        Err(e) => {
            storage::delete_best_effort(&video_asset.public_id).await;
            storage::delete_best_effort(&thumbnail_asset.public_id).await;
            Err(e.into())
        }
    }
}

/// GET /api/v1/videos/:videoId - Video detail with like and subscription
/// computations. The view count bump and watch-history set-add run after
/// the read and never fail it.
pub async fn get_by_id(
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<String>,
) -> ApiResult<VideoDetail> {
    let video_id = validate::parse_id(&video_id, "Video")?;

    let pool = DatabaseManager::pool().await?;
    let detail = videos::detail(&pool, video_id, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Video not found"))?;

    let viewer = user.id;
    let side_pool = pool.clone();
    tokio::spawn(async move {
        if let Err(e) = videos::increment_views(&side_pool, video_id).await {
            tracing::warn!("Failed to increment views for {}: {}", video_id, e);
        }
        if let Err(e) =
            crate::database::repos::users::add_watch_entry(&side_pool, viewer, video_id).await
        {
            tracing::warn!("Failed to record watch history for {}: {}", viewer, e);
        }
    });

    Ok(ApiResponse::ok(detail, "Video details fetched successfully"))
}

/// PATCH /api/v1/videos/:videoId - Owner-only edit of title, description
/// and optionally the thumbnail
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Video> {
    let video_id = validate::parse_id(&video_id, "Video")?;
    let form = upload::read_form(multipart).await?;

    let title = form.text("title");
    let description = form.text("description");
    validate::require_fields(&[("title", title), ("description", description)])?;

    let pool = DatabaseManager::pool().await?;
    let video = videos::find_by_id(&pool, video_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Video not found"))?;
    validate::ensure_owner(user.id, video.owner_id, "edit this video")?;

    let thumbnail = match form.file("thumbnail") {
        Some(file) => Some(storage::store().upload(file.path()).await?),
        None => None,
    };

    let updated = videos::update(
        &pool,
        video_id,
        title.unwrap(),
        description.unwrap(),
        thumbnail.as_ref().map(|t| (t.url.as_str(), t.public_id.as_str())),
    )
    .await?;

    if thumbnail.is_some() {
        storage::delete_best_effort(&video.thumbnail_public_id).await;
    }

    Ok(ApiResponse::ok(updated, "Video updated successfully"))
}

/// DELETE /api/v1/videos/:videoId - Owner-only delete
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<String>,
) -> ApiResult<Value> {
    let video_id = validate::parse_id(&video_id, "Video")?;

    let pool = DatabaseManager::pool().await?;
    let video = videos::find_by_id(&pool, video_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Video not found"))?;
    validate::ensure_owner(user.id, video.owner_id, "delete this video")?;

    videos::delete(&pool, video_id).await?;

    // Row is gone; stored media follows best-effort
    storage::delete_best_effort(&video.video_public_id).await;
    storage::delete_best_effort(&video.thumbnail_public_id).await;

    Ok(ApiResponse::ok(json!({}), "Video deleted successfully"))
}

/// PATCH /api/v1/videos/toggle/publish/:videoId - Owner-only publish flip
pub async fn toggle_publish(
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<String>,
) -> ApiResult<Value> {
    let video_id = validate::parse_id(&video_id, "Video")?;

    let pool = DatabaseManager::pool().await?;
    let video = videos::find_by_id(&pool, video_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Video not found"))?;
    validate::ensure_owner(user.id, video.owner_id, "toggle publish status")?;

    let toggled = videos::toggle_publish(&pool, video_id).await?;
    let message = if toggled.is_published {
        "Video published successfully"
    } else {
        "Video unpublished successfully"
    };

    Ok(ApiResponse::ok(json!({ "isPublished": toggled.is_published }), message))
}
