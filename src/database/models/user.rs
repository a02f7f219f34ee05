use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Full user row. Never serialized directly; responses go through
/// `PublicUser` so the password hash and refresh token cannot leak.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub avatar_url: String,
    pub avatar_public_id: String,
    pub cover_image_url: Option<String>,
    pub cover_image_public_id: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire representation of a user account
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(rename = "fullname")]
    pub full_name: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
    #[serde(rename = "coverImage")]
    pub cover_image_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            cover_image_url: user.cover_image_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Owner snippet denormalized onto video reads
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OwnerSnippet {
    pub username: String,
    #[serde(rename = "fullname")]
    pub full_name: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
}

/// Owner snippet enriched with the viewer-relative subscription state,
/// embedded in single-video reads
#[derive(Debug, FromRow, Serialize)]
pub struct ChannelSnippet {
    pub username: String,
    #[serde(rename = "fullname")]
    pub full_name: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
    #[serde(rename = "subscribersCount")]
    pub subscribers_count: i64,
    #[serde(rename = "isSubscribed")]
    pub is_subscribed: bool,
}

/// Channel profile with computed subscription fields
#[derive(Debug, FromRow, Serialize)]
pub struct ChannelProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(rename = "fullname")]
    pub full_name: String,
    #[serde(rename = "avatar")]
    pub avatar_url: String,
    #[serde(rename = "coverImage")]
    pub cover_image_url: Option<String>,
    #[serde(rename = "subscribersCount")]
    pub subscribers_count: i64,
    #[serde(rename = "channelsSubscribedToCount")]
    pub channels_subscribed_to_count: i64,
    #[serde(rename = "isSubscribed")]
    pub is_subscribed: bool,
}
