use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Playlist, PlaylistDetail, PlaylistDetailRow, PlaylistSummary, PlaylistVideo,
};
use crate::query::{SelectQuery, SortDirection, SortSpec};

const TOTAL_VIDEOS: &str = "(SELECT COUNT(*) FROM playlist_videos pv \
     WHERE pv.playlist_id = p.id) AS total_videos";

const TOTAL_VIEWS: &str = "(SELECT COALESCE(SUM(v.views), 0) FROM playlist_videos pv \
     JOIN videos v ON v.id = pv.video_id \
     WHERE pv.playlist_id = p.id) AS total_views";

pub async fn insert(
    pool: &PgPool,
    name: &str,
    description: &str,
    owner: Uuid,
) -> Result<Playlist, DatabaseError> {
    let playlist = sqlx::query_as::<_, Playlist>(
        r#"
        INSERT INTO playlists (id, name, description, owner_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .bind(owner)
    .fetch_one(pool)
    .await?;
    Ok(playlist)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Playlist>, DatabaseError> {
    let playlist = sqlx::query_as::<_, Playlist>("SELECT * FROM playlists WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(playlist)
}

/// A user's playlists with membership totals
pub async fn by_user(pool: &PgPool, owner: Uuid) -> Result<Vec<PlaylistSummary>, DatabaseError> {
    let mut q = SelectQuery::from("playlists p")?;
    q.columns(&["p.id", "p.name", "p.description", "p.updated_at"])
        .column(TOTAL_VIDEOS)
        .column(TOTAL_VIEWS);
    let owner_p = q.bind(json!(owner));
    q.filter(format!("p.owner_id = {owner_p}::uuid"));
    q.order_by(SortSpec::new("p.updated_at", SortDirection::Desc));

    let playlists = q.fetch_all::<PlaylistSummary>(pool).await?;
    Ok(playlists)
}

/// Playlist detail: header with totals and owner snippet, plus the
/// published member videos in the order they were added.
///
/// Totals count every member; the video listing hides unpublished ones.
pub async fn detail(pool: &PgPool, id: Uuid) -> Result<Option<PlaylistDetail>, DatabaseError> {
    let mut q = SelectQuery::from("playlists p")?;
    q.join("JOIN users u ON u.id = p.owner_id")
        .columns(&[
            "p.id",
            "p.name",
            "p.description",
            "p.created_at",
            "p.updated_at",
            "u.username",
            "u.full_name",
            "u.avatar_url",
        ])
        .column(TOTAL_VIDEOS)
        .column(TOTAL_VIEWS);
    let id_p = q.bind(json!(id));
    q.filter(format!("p.id = {id_p}::uuid"));

    let Some(header) = q.fetch_optional::<PlaylistDetailRow>(pool).await? else {
        return Ok(None);
    };

    let mut videos_q = SelectQuery::from("playlist_videos pv")?;
    videos_q
        .join("JOIN videos v ON v.id = pv.video_id")
        .columns(&[
            "v.id",
            "v.title",
            "v.description",
            "v.video_url",
            "v.thumbnail_url",
            "v.duration",
            "v.views",
            "v.created_at",
        ])
        .filter("v.is_published = TRUE");
    let id_p = videos_q.bind(json!(id));
    videos_q.filter(format!("pv.playlist_id = {id_p}::uuid"));
    videos_q.order_by(SortSpec::new("pv.added_at", SortDirection::Asc));

    let videos = videos_q.fetch_all::<PlaylistVideo>(pool).await?;
    Ok(Some(PlaylistDetail::assemble(header, videos)))
}

/// Set-semantics add; re-adding a member is a no-op
pub async fn add_video(pool: &PgPool, playlist: Uuid, video: Uuid) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO playlist_videos (playlist_id, video_id) VALUES ($1, $2) \
         ON CONFLICT DO NOTHING",
    )
    .bind(playlist)
    .bind(video)
    .execute(pool)
    .await?;
    sqlx::query("UPDATE playlists SET updated_at = now() WHERE id = $1")
        .bind(playlist)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn remove_video(pool: &PgPool, playlist: Uuid, video: Uuid) -> Result<(), DatabaseError> {
    sqlx::query("DELETE FROM playlist_videos WHERE playlist_id = $1 AND video_id = $2")
        .bind(playlist)
        .bind(video)
        .execute(pool)
        .await?;
    sqlx::query("UPDATE playlists SET updated_at = now() WHERE id = $1")
        .bind(playlist)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    description: &str,
) -> Result<Playlist, DatabaseError> {
    let playlist = sqlx::query_as::<_, Playlist>(
        "UPDATE playlists SET name = $2, description = $3, updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;
    Ok(playlist)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DatabaseError> {
    sqlx::query("DELETE FROM playlists WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}
