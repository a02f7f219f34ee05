//! Like toggles over the polymorphic target and the liked-videos read.

use axum::{extract::Path, Extension};
use serde_json::{json, Value};

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{LikeTarget, VideoSummary};
use crate::database::repos::likes;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::validate;

/// POST /api/v1/likes/toggle/v/:videoId
pub async fn toggle_video_like(
    user: Extension<AuthUser>,
    Path(video_id): Path<String>,
) -> ApiResult<Value> {
    toggle(user, &video_id, LikeTarget::Video).await
}

/// POST /api/v1/likes/toggle/c/:commentId
pub async fn toggle_comment_like(
    user: Extension<AuthUser>,
    Path(comment_id): Path<String>,
) -> ApiResult<Value> {
    toggle(user, &comment_id, LikeTarget::Comment).await
}

/// POST /api/v1/likes/toggle/t/:tweetId
pub async fn toggle_tweet_like(
    user: Extension<AuthUser>,
    Path(tweet_id): Path<String>,
) -> ApiResult<Value> {
    toggle(user, &tweet_id, LikeTarget::Tweet).await
}

/// Shared toggle: the target must exist, then the uniqueness constraint
/// decides between insert and delete
async fn toggle(
    Extension(user): Extension<AuthUser>,
    raw_id: &str,
    kind: LikeTarget,
) -> ApiResult<Value> {
    let target = validate::parse_id(raw_id, kind.noun())?;

    let pool = DatabaseManager::pool().await?;
    if !likes::target_exists(&pool, kind, target).await? {
        return Err(ApiError::not_found(format!("{} not found", kind.noun())));
    }

    let is_liked = likes::toggle(&pool, user.id, kind, target).await?;
    let message = if is_liked {
        format!("{} liked successfully", kind.noun())
    } else {
        format!("{} unliked successfully", kind.noun())
    };

    Ok(ApiResponse::ok(json!({ "isLiked": is_liked }), message))
}

/// GET /api/v1/likes/videos - The viewer's liked videos, newest like first
pub async fn liked_videos(
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<VideoSummary>> {
    let pool = DatabaseManager::pool().await?;
    let videos = likes::liked_videos(&pool, user.id).await?;
    Ok(ApiResponse::ok(videos, "Liked videos fetched successfully"))
}
