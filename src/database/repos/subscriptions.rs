use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{SubscribedChannel, SubscribedChannelRow, SubscriberEntry};
use crate::query::SelectQuery;

/// Toggle a subscription and report the resulting state. Same insert-or-
/// ignore shape as the like toggle; the caller rejects self-subscription
/// before we get here and the CHECK constraint backstops it.
pub async fn toggle(
    pool: &PgPool,
    subscriber: Uuid,
    channel: Uuid,
) -> Result<bool, DatabaseError> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO subscriptions (id, subscriber_id, channel_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (subscriber_id, channel_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(subscriber)
    .bind(channel)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted == 1 {
        return Ok(true);
    }

    sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2")
        .bind(subscriber)
        .bind(channel)
        .execute(pool)
        .await?;
    Ok(false)
}

/// Subscribers of a channel. Each entry carries the subscriber's own
/// subscriber count and whether the channel subscribes back.
pub async fn subscribers(
    pool: &PgPool,
    channel: Uuid,
) -> Result<Vec<SubscriberEntry>, DatabaseError> {
    let mut q = SelectQuery::from("subscriptions s")?;
    let channel_p = q.bind(json!(channel));
    q.join("JOIN users u ON u.id = s.subscriber_id")
        .columns(&["u.id", "u.username", "u.full_name", "u.avatar_url"])
        .column(
            "(SELECT COUNT(*) FROM subscriptions s2 WHERE s2.channel_id = u.id) \
             AS subscribers_count",
        )
        .column(format!(
            "EXISTS (SELECT 1 FROM subscriptions s2 \
             WHERE s2.channel_id = u.id AND s2.subscriber_id = {channel_p}::uuid) \
             AS subscribed_to_subscriber"
        ));
    q.filter(format!("s.channel_id = {channel_p}::uuid"));

    let entries = q.fetch_all::<SubscriberEntry>(pool).await?;
    Ok(entries)
}

/// Channels a user subscribes to, each with its most recent upload
pub async fn subscribed_channels(
    pool: &PgPool,
    subscriber: Uuid,
) -> Result<Vec<SubscribedChannel>, DatabaseError> {
    let mut q = SelectQuery::from("subscriptions s")?;
    q.join("JOIN users u ON u.id = s.channel_id")
        .join(
            "LEFT JOIN LATERAL (\
             SELECT v.id AS lv_id, v.title AS lv_title, v.description AS lv_description, \
                    v.video_url AS lv_video_url, v.thumbnail_url AS lv_thumbnail_url, \
                    v.duration AS lv_duration, v.views AS lv_views, v.created_at AS lv_created_at \
             FROM videos v WHERE v.owner_id = u.id \
             ORDER BY v.created_at DESC LIMIT 1) lv ON TRUE",
        )
        .columns(&[
            "u.id",
            "u.username",
            "u.full_name",
            "u.avatar_url",
            "lv.lv_id",
            "lv.lv_title",
            "lv.lv_description",
            "lv.lv_video_url",
            "lv.lv_thumbnail_url",
            "lv.lv_duration",
            "lv.lv_views",
            "lv.lv_created_at",
        ]);
    let sub_p = q.bind(json!(subscriber));
    q.filter(format!("s.subscriber_id = {sub_p}::uuid"));

    let rows = q.fetch_all::<SubscribedChannelRow>(pool).await?;
    Ok(rows.into_iter().map(SubscribedChannel::from).collect())
}
