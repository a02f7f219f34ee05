use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{LikeTarget, VideoSummary};
use crate::query::{SelectQuery, SortDirection, SortSpec};

/// Toggle a like and report the resulting state.
///
/// The unique index on (user_id, target_kind, target_id) makes the insert
/// race-free: insert-or-ignore first, and only when nothing was inserted
/// delete the existing row. Two sequential calls always return opposite
/// states.
pub async fn toggle(
    pool: &PgPool,
    user: Uuid,
    kind: LikeTarget,
    target: Uuid,
) -> Result<bool, DatabaseError> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO likes (id, user_id, target_kind, target_id)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, target_kind, target_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user)
    .bind(kind)
    .bind(target)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted == 1 {
        return Ok(true);
    }

    sqlx::query("DELETE FROM likes WHERE user_id = $1 AND target_kind = $2 AND target_id = $3")
        .bind(user)
        .bind(kind)
        .bind(target)
        .execute(pool)
        .await?;
    Ok(false)
}

/// Does the like target exist in its own table
pub async fn target_exists(
    pool: &PgPool,
    kind: LikeTarget,
    target: Uuid,
) -> Result<bool, DatabaseError> {
    let table = match kind {
        LikeTarget::Video => "videos",
        LikeTarget::Comment => "comments",
        LikeTarget::Tweet => "tweets",
    };
    let found: Option<(Uuid,)> =
        sqlx::query_as(&format!("SELECT id FROM {} WHERE id = $1", table))
            .bind(target)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

/// Videos the viewer has liked, newest like first, with owner snippets
pub async fn liked_videos(pool: &PgPool, user: Uuid) -> Result<Vec<VideoSummary>, DatabaseError> {
    let mut q = SelectQuery::from("likes l")?;
    q.join("JOIN videos v ON v.id = l.target_id")
        .join("JOIN users u ON u.id = v.owner_id")
        .columns(&[
            "v.id",
            "v.title",
            "v.description",
            "v.video_url",
            "v.thumbnail_url",
            "v.duration",
            "v.views",
            "v.is_published",
            "v.created_at",
            "u.username",
            "u.full_name",
            "u.avatar_url",
        ])
        .filter("l.target_kind = 'video'");
    let user_p = q.bind(json!(user));
    q.filter(format!("l.user_id = {user_p}::uuid"));
    q.order_by(SortSpec::new("l.created_at", SortDirection::Desc));

    let videos = q.fetch_all::<VideoSummary>(pool).await?;
    Ok(videos)
}
