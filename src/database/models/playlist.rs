use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::user::OwnerSnippet;

/// Full playlist row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Playlist {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Listing item with membership totals
#[derive(Debug, FromRow, Serialize)]
pub struct PlaylistSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "totalVideos")]
    pub total_videos: i64,
    #[serde(rename = "totalViews")]
    pub total_views: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Playlist header row for the detail read; videos are fetched separately
#[derive(Debug, FromRow)]
pub struct PlaylistDetailRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_videos: i64,
    pub total_views: i64,
    #[sqlx(flatten)]
    pub owner: OwnerSnippet,
}

/// Member video projection inside a playlist detail
#[derive(Debug, FromRow, Serialize)]
pub struct PlaylistVideo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "videoFile")]
    pub video_url: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub duration: f64,
    pub views: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Assembled playlist detail response
#[derive(Debug, Serialize)]
pub struct PlaylistDetail {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "totalVideos")]
    pub total_videos: i64,
    #[serde(rename = "totalViews")]
    pub total_views: i64,
    pub owner: OwnerSnippet,
    pub videos: Vec<PlaylistVideo>,
}

impl PlaylistDetail {
    pub fn assemble(row: PlaylistDetailRow, videos: Vec<PlaylistVideo>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            total_videos: row.total_videos,
            total_views: row.total_views,
            owner: row.owner,
            videos,
        }
    }
}
