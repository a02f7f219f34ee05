use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::user::{ChannelSnippet, OwnerSnippet};

/// Full video row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "videoFile")]
    pub video_url: String,
    #[serde(skip_serializing)]
    pub video_public_id: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    #[serde(skip_serializing)]
    pub thumbnail_public_id: String,
    pub duration: f64,
    pub views: i64,
    #[serde(rename = "isPublished")]
    pub is_published: bool,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Listing item carrying the denormalized owner snippet
#[derive(Debug, FromRow, Serialize)]
pub struct VideoSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "videoFile")]
    pub video_url: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub duration: f64,
    pub views: i64,
    #[serde(rename = "isPublished")]
    pub is_published: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub owner: OwnerSnippet,
}

/// Single-video read with like and subscription computations
#[derive(Debug, FromRow, Serialize)]
pub struct VideoDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "videoFile")]
    pub video_url: String,
    pub duration: f64,
    pub views: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "likesCount")]
    pub likes_count: i64,
    #[serde(rename = "isLiked")]
    pub is_liked: bool,
    #[sqlx(flatten)]
    pub owner: ChannelSnippet,
}
