//! Idempotent schema bootstrap, applied at startup.
//!
//! Uniqueness constraints are load-bearing: toggle endpoints, watch-history
//! set-adds and registration all rely on the database rejecting duplicates
//! instead of check-then-act in application code.

pub const BOOTSTRAP: &[&str] = &[
    // Polymorphic like target: exactly one of video/comment/tweet
    r#"
    DO $$ BEGIN
        CREATE TYPE like_target AS ENUM ('video', 'comment', 'tweet');
    EXCEPTION
        WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id                    UUID PRIMARY KEY,
        username              TEXT NOT NULL UNIQUE,
        email                 TEXT NOT NULL UNIQUE,
        password_hash         TEXT NOT NULL,
        full_name             TEXT NOT NULL,
        avatar_url            TEXT NOT NULL,
        avatar_public_id      TEXT NOT NULL,
        cover_image_url       TEXT,
        cover_image_public_id TEXT,
        refresh_token         TEXT,
        created_at            TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at            TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS videos (
        id                  UUID PRIMARY KEY,
        title               TEXT NOT NULL,
        description         TEXT NOT NULL,
        video_url           TEXT NOT NULL,
        video_public_id     TEXT NOT NULL,
        thumbnail_url       TEXT NOT NULL,
        thumbnail_public_id TEXT NOT NULL,
        duration            DOUBLE PRECISION NOT NULL DEFAULT 0,
        views               BIGINT NOT NULL DEFAULT 0,
        is_published        BOOLEAN NOT NULL DEFAULT FALSE,
        owner_id            UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at          TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at          TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id         UUID PRIMARY KEY,
        content    TEXT NOT NULL,
        video_id   UUID NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
        owner_id   UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tweets (
        id         UUID PRIMARY KEY,
        content    TEXT NOT NULL,
        owner_id   UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS playlists (
        id          UUID PRIMARY KEY,
        name        TEXT NOT NULL,
        description TEXT NOT NULL,
        owner_id    UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    // Deduplicated ordered set of playlist members
    r#"
    CREATE TABLE IF NOT EXISTS playlist_videos (
        playlist_id UUID NOT NULL REFERENCES playlists(id) ON DELETE CASCADE,
        video_id    UUID NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
        added_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (playlist_id, video_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS likes (
        id          UUID PRIMARY KEY,
        user_id     UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        target_kind like_target NOT NULL,
        target_id   UUID NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (user_id, target_kind, target_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS subscriptions (
        id            UUID PRIMARY KEY,
        subscriber_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        channel_id    UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (subscriber_id, channel_id),
        CHECK (subscriber_id <> channel_id)
    )
    "#,
    // Append-only deduplicated watch set, ordered by watched_at
    r#"
    CREATE TABLE IF NOT EXISTS watch_history (
        user_id    UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        video_id   UUID NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
        watched_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (user_id, video_id)
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS idx_videos_owner ON videos (owner_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_videos_published_created
       ON videos (created_at DESC) WHERE is_published"#,
    r#"CREATE INDEX IF NOT EXISTS idx_likes_target ON likes (target_kind, target_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_subscriptions_channel ON subscriptions (channel_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_playlists_owner ON playlists (owner_id)"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_is_idempotent() {
        for stmt in BOOTSTRAP {
            let normalized = stmt.trim().to_uppercase();
            assert!(
                normalized.contains("IF NOT EXISTS") || normalized.contains("EXCEPTION"),
                "statement is not rerunnable: {}",
                stmt
            );
        }
    }

    #[test]
    fn toggle_tables_carry_uniqueness_constraints() {
        let likes = BOOTSTRAP.iter().find(|s| s.contains("CREATE TABLE IF NOT EXISTS likes")).unwrap();
        assert!(likes.contains("UNIQUE (user_id, target_kind, target_id)"));

        let subs =
            BOOTSTRAP.iter().find(|s| s.contains("CREATE TABLE IF NOT EXISTS subscriptions")).unwrap();
        assert!(subs.contains("UNIQUE (subscriber_id, channel_id)"));
        assert!(subs.contains("CHECK (subscriber_id <> channel_id)"));
    }
}
