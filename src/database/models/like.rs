use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tagged like target. One record references exactly one of video, comment
/// or tweet; the tag plus target id make the invariant structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "like_target", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LikeTarget {
    Video,
    Comment,
    Tweet,
}

impl LikeTarget {
    /// Capitalized noun for response messages
    pub fn noun(&self) -> &'static str {
        match self {
            LikeTarget::Video => "Video",
            LikeTarget::Comment => "Comment",
            LikeTarget::Tweet => "Tweet",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_kind: LikeTarget,
    pub target_id: Uuid,
    pub created_at: DateTime<Utc>,
}
