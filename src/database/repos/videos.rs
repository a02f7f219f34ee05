use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Video, VideoDetail, VideoSummary};
use crate::query::{Page, PageParams, SelectQuery, SortDirection, SortField, SortSpec};

/// Sort fields callers may request on the listing endpoint
const SORT_FIELDS: &[SortField] = &[
    SortField { name: "createdAt", column: "v.created_at" },
    SortField { name: "title", column: "v.title" },
    SortField { name: "duration", column: "v.duration" },
    SortField { name: "views", column: "v.views" },
];

#[derive(Debug, Default, Clone)]
pub struct ListVideosParams {
    pub page: PageParams,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub owner: Option<Uuid>,
}

/// Compose the listing query from the validated request parameters.
///
/// Parts are pushed in a fixed order: optional text search, optional owner
/// filter, the mandatory published filter, the owner join and snippet
/// columns, caller sort or newest-first default, then the page window.
pub fn build_list_query(params: &ListVideosParams) -> Result<SelectQuery, DatabaseError> {
    let mut q = SelectQuery::from("videos v")?;

    if let Some(term) = params.search.as_deref() {
        q.filter_search(&["v.title", "v.description"], term);
    }
    if let Some(owner) = params.owner {
        let p = q.bind(json!(owner));
        q.filter(format!("v.owner_id = {p}::uuid"));
    }
    // Unpublished videos never appear in listings
    q.filter("v.is_published = TRUE");

    q.join("JOIN users u ON u.id = v.owner_id").columns(&[
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

    let sort = SortSpec::from_params(
        params.sort_by.as_deref(),
        params.sort_type.as_deref(),
        SORT_FIELDS,
        SortSpec::new("v.created_at", SortDirection::Desc),
    )?;
    q.order_by(sort);
    q.paginate(params.page);

    Ok(q)
}

pub async fn list(
    pool: &PgPool,
    params: &ListVideosParams,
) -> Result<Page<VideoSummary>, DatabaseError> {
    let q = build_list_query(params)?;
    let total = q.count(pool).await?;
    let docs = q.fetch_all::<VideoSummary>(pool).await?;
    Ok(Page::new(docs, total, params.page))
}

/// Single-video read with like count, viewer like state, and the owner's
/// subscriber count and viewer subscription state.
pub async fn detail(
    pool: &PgPool,
    video: Uuid,
    viewer: Uuid,
) -> Result<Option<VideoDetail>, DatabaseError> {
    let mut q = SelectQuery::from("videos v")?;
    let viewer_p = q.bind(json!(viewer));
    q.join("JOIN users u ON u.id = v.owner_id")
        .columns(&[
            "v.id",
            "v.title",
            "v.description",
            "v.video_url",
            "v.duration",
            "v.views",
            "v.created_at",
            "u.username",
            "u.full_name",
            "u.avatar_url",
        ])
        .column(
            "(SELECT COUNT(*) FROM likes l \
             WHERE l.target_kind = 'video' AND l.target_id = v.id) AS likes_count",
        )
        .column(format!(
            "EXISTS (SELECT 1 FROM likes l \
             WHERE l.target_kind = 'video' AND l.target_id = v.id \
             AND l.user_id = {viewer_p}::uuid) AS is_liked"
        ))
        .column(
            "(SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id) \
             AS subscribers_count",
        )
        .column(format!(
            "EXISTS (SELECT 1 FROM subscriptions s \
             WHERE s.channel_id = u.id AND s.subscriber_id = {viewer_p}::uuid) AS is_subscribed"
        ));
    let video_p = q.bind(json!(video));
    q.filter(format!("v.id = {video_p}::uuid"));

    let detail = q.fetch_optional::<VideoDetail>(pool).await?;
    Ok(detail)
}

pub struct NewVideo<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub video_url: &'a str,
    pub video_public_id: &'a str,
    pub thumbnail_url: &'a str,
    pub thumbnail_public_id: &'a str,
    pub duration: f64,
    pub owner: Uuid,
}

pub async fn insert(pool: &PgPool, new: NewVideo<'_>) -> Result<Video, DatabaseError> {
    let video = sqlx::query_as::<_, Video>(
        r#"
        INSERT INTO videos (id, title, description, video_url, video_public_id,
                            thumbnail_url, thumbnail_public_id, duration, is_published, owner_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.title)
    .bind(new.description)
    .bind(new.video_url)
    .bind(new.video_public_id)
    .bind(new.thumbnail_url)
    .bind(new.thumbnail_public_id)
    .bind(new.duration)
    .bind(new.owner)
    .fetch_one(pool)
    .await?;
    Ok(video)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Video>, DatabaseError> {
    let video = sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(video)
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, DatabaseError> {
    let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM videos WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    title: &str,
    description: &str,
    thumbnail: Option<(&str, &str)>,
) -> Result<Video, DatabaseError> {
    let video = match thumbnail {
        Some((url, public_id)) => {
            sqlx::query_as::<_, Video>(
                r#"
                UPDATE videos
                SET title = $2, description = $3, thumbnail_url = $4,
                    thumbnail_public_id = $5, updated_at = now()
                WHERE id = $1 RETURNING *
                "#,
            )
            .bind(id)
            .bind(title)
            .bind(description)
            .bind(url)
            .bind(public_id)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Video>(
                r#"
                UPDATE videos
                SET title = $2, description = $3, updated_at = now()
                WHERE id = $1 RETURNING *
                "#,
            )
            .bind(id)
            .bind(title)
            .bind(description)
            .fetch_one(pool)
            .await?
        }
    };
    Ok(video)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), DatabaseError> {
    sqlx::query("DELETE FROM videos WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}

/// Flip the publish flag and nothing else
pub async fn toggle_publish(pool: &PgPool, id: Uuid) -> Result<Video, DatabaseError> {
    let video = sqlx::query_as::<_, Video>(
        "UPDATE videos SET is_published = NOT is_published, updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(video)
}

pub async fn increment_views(pool: &PgPool, id: Uuid) -> Result<(), DatabaseError> {
    sqlx::query("UPDATE videos SET views = views + 1 WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_params() -> ListVideosParams {
        ListVideosParams { page: PageParams { page: 1, limit: 10 }, ..Default::default() }
    }

    #[test]
    fn default_listing_filters_published_and_sorts_newest_first() {
        let q = build_list_query(&base_params()).unwrap();
        let stmt = q.to_sql();
        assert!(stmt.sql.contains("WHERE v.is_published = TRUE"));
        assert!(stmt.sql.contains("ORDER BY v.created_at DESC"));
        assert!(stmt.sql.ends_with("LIMIT 10"));
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn search_and_owner_filters_are_conditional() {
        let params = ListVideosParams {
            search: Some("rust".to_string()),
            owner: Some(Uuid::nil()),
            ..base_params()
        };
        let stmt = build_list_query(&params).unwrap().to_sql();
        assert!(stmt.sql.contains("(v.title ILIKE $1 OR v.description ILIKE $1)"));
        assert!(stmt.sql.contains("v.owner_id = $2::uuid"));
        assert!(stmt.sql.contains("v.is_published = TRUE"));
        assert_eq!(stmt.params.len(), 2);
    }

    #[test]
    fn caller_sort_applies_only_as_a_pair() {
        let params = ListVideosParams {
            sort_by: Some("views".to_string()),
            sort_type: Some("asc".to_string()),
            ..base_params()
        };
        let stmt = build_list_query(&params).unwrap().to_sql();
        assert!(stmt.sql.contains("ORDER BY v.views ASC"));

        let params =
            ListVideosParams { sort_by: Some("views".to_string()), ..base_params() };
        let stmt = build_list_query(&params).unwrap().to_sql();
        assert!(stmt.sql.contains("ORDER BY v.created_at DESC"));
    }

    #[test]
    fn sorting_by_unlisted_field_is_rejected() {
        let params = ListVideosParams {
            sort_by: Some("owner_id".to_string()),
            sort_type: Some("desc".to_string()),
            ..base_params()
        };
        assert!(build_list_query(&params).is_err());
    }

    #[test]
    fn count_query_reuses_filters_without_window() {
        let params = ListVideosParams { search: Some("cats".to_string()), ..base_params() };
        let stmt = build_list_query(&params).unwrap().to_count_sql();
        assert!(stmt.sql.starts_with("SELECT COUNT(*) AS count"));
        assert!(stmt.sql.contains("ILIKE $1"));
        assert!(!stmt.sql.contains("LIMIT"));
        assert_eq!(stmt.params.len(), 1);
    }
}
