use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub channel_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Subscriber list entry: the subscribing user plus their own subscriber
/// count and whether the channel subscribes back.
#[derive(Debug, FromRow, Serialize)]
pub struct SubscriberEntry {
    pub id: Uuid,
    pub username: String,
    #[serde(rename = "fullname")]
    pub full_name: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
    #[serde(rename = "subscribersCount")]
    pub subscribers_count: i64,
    #[serde(rename = "subscribedToSubscriber")]
    pub subscribed_to_subscriber: bool,
}

/// Flat row for the subscribed-channels read; the latest-video columns are
/// null when the channel has not uploaded yet.
#[derive(Debug, FromRow)]
pub struct SubscribedChannelRow {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: String,
    pub lv_id: Option<Uuid>,
    pub lv_title: Option<String>,
    pub lv_description: Option<String>,
    pub lv_video_url: Option<String>,
    pub lv_thumbnail_url: Option<String>,
    pub lv_duration: Option<f64>,
    pub lv_views: Option<i64>,
    pub lv_created_at: Option<DateTime<Utc>>,
}

/// Most recent upload embedded in a subscribed-channel entry
#[derive(Debug, Serialize)]
pub struct LatestVideo {
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

#[derive(Debug, Serialize)]
pub struct SubscribedChannel {
    pub id: Uuid,
    pub username: String,
    #[serde(rename = "fullname")]
    pub full_name: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
    #[serde(rename = "latestVideo")]
    pub latest_video: Option<LatestVideo>,
}

impl From<SubscribedChannelRow> for SubscribedChannel {
    fn from(row: SubscribedChannelRow) -> Self {
        // All latest-video columns come from one lateral row, so the id and
        // timestamp are present or absent together
        let latest_video = match (row.lv_id, row.lv_created_at) {
            (Some(id), Some(created_at)) => Some(LatestVideo {
                id,
                title: row.lv_title.unwrap_or_default(),
                description: row.lv_description.unwrap_or_default(),
                video_url: row.lv_video_url.unwrap_or_default(),
                thumbnail_url: row.lv_thumbnail_url.unwrap_or_default(),
                duration: row.lv_duration.unwrap_or_default(),
                views: row.lv_views.unwrap_or_default(),
                created_at,
            }),
            _ => None,
        };
        Self {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
            latest_video,
        }
    }
}
