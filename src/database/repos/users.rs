use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{on_unique_violation, DatabaseError};
use crate::database::models::{ChannelProfile, User, VideoSummary};
use crate::query::{SelectQuery, SortDirection, SortSpec};

pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub avatar_url: &'a str,
    pub avatar_public_id: &'a str,
    pub cover_image_url: Option<&'a str>,
    pub cover_image_public_id: Option<&'a str>,
}

/// Insert a new account. The unique indexes on username and email are the
/// real duplicate guard; the caller's pre-check only improves the message.
pub async fn insert(pool: &PgPool, new: NewUser<'_>) -> Result<User, DatabaseError> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, email, password_hash, full_name,
                           avatar_url, avatar_public_id, cover_image_url, cover_image_public_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.username)
    .bind(new.email)
    .bind(new.password_hash)
    .bind(new.full_name)
    .bind(new.avatar_url)
    .bind(new.avatar_public_id)
    .bind(new.cover_image_url)
    .bind(new.cover_image_public_id)
    .fetch_one(pool)
    .await
    .map_err(|e| on_unique_violation(e, "User with email or username already exists"))
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Look up by either credential. A NULL bind never matches.
pub async fn find_by_username_or_email(
    pool: &PgPool,
    username: Option<&str>,
    email: Option<&str>,
) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE username = $1 OR email = $2",
    )
    .bind(username.map(|u| u.to_lowercase()))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, DatabaseError> {
    let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub async fn set_refresh_token(
    pool: &PgPool,
    id: Uuid,
    token: Option<&str>,
) -> Result<(), DatabaseError> {
    sqlx::query("UPDATE users SET refresh_token = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_password(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
) -> Result<(), DatabaseError> {
    sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_account(
    pool: &PgPool,
    id: Uuid,
    full_name: &str,
    email: &str,
) -> Result<User, DatabaseError> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET full_name = $2, email = $3, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(full_name)
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(|e| on_unique_violation(e, "Email already in use"))
}

pub async fn update_avatar(
    pool: &PgPool,
    id: Uuid,
    url: &str,
    public_id: &str,
) -> Result<User, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET avatar_url = $2, avatar_public_id = $3, updated_at = now()
        WHERE id = $1 RETURNING *
        "#,
    )
    .bind(id)
    .bind(url)
    .bind(public_id)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

pub async fn update_cover_image(
    pool: &PgPool,
    id: Uuid,
    url: &str,
    public_id: &str,
) -> Result<User, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET cover_image_url = $2, cover_image_public_id = $3, updated_at = now()
        WHERE id = $1 RETURNING *
        "#,
    )
    .bind(id)
    .bind(url)
    .bind(public_id)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

/// Channel profile by username, with subscriber counts computed relative to
/// the requesting viewer.
pub async fn channel_profile(
    pool: &PgPool,
    username: &str,
    viewer: Uuid,
) -> Result<Option<ChannelProfile>, DatabaseError> {
    let mut q = SelectQuery::from("users u")?;
    let viewer_p = q.bind(json!(viewer));
    q.columns(&["u.id", "u.username", "u.email", "u.full_name", "u.avatar_url", "u.cover_image_url"])
        .column(
            "(SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id) \
             AS subscribers_count",
        )
        .column(
            "(SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = u.id) \
             AS channels_subscribed_to_count",
        )
        .column(format!(
            "EXISTS (SELECT 1 FROM subscriptions s \
             WHERE s.channel_id = u.id AND s.subscriber_id = {viewer_p}::uuid) AS is_subscribed"
        ));
    q.filter_eq("u.username", json!(username.to_lowercase()));

    let profile = q.fetch_optional::<ChannelProfile>(pool).await?;
    Ok(profile)
}

/// Watch history hydrated to video summaries, in watch order
pub async fn watch_history(pool: &PgPool, user: Uuid) -> Result<Vec<VideoSummary>, DatabaseError> {
    let mut q = SelectQuery::from("watch_history wh")?;
    q.join("JOIN videos v ON v.id = wh.video_id")
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
        ]);
    let user_p = q.bind(json!(user));
    q.filter(format!("wh.user_id = {user_p}::uuid"));
    q.order_by(SortSpec::new("wh.watched_at", SortDirection::Asc));

    let videos = q.fetch_all::<VideoSummary>(pool).await?;
    Ok(videos)
}

/// Idempotent set-add; re-watching never duplicates an entry
pub async fn add_watch_entry(
    pool: &PgPool,
    user: Uuid,
    video: Uuid,
) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO watch_history (user_id, video_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(user)
    .bind(video)
    .execute(pool)
    .await?;
    Ok(())
}
