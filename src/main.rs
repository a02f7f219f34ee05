use axum::{extract::DefaultBodyLimit, middleware::from_fn, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use vidtube_api::handlers;
use vidtube_api::middleware::jwt_auth_middleware;

/// Upper bound for multipart bodies; video uploads are large
const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, token secrets, etc.
    let _ = dotenvy::dotenv();

    let config = vidtube_api::config::config();
    tracing_subscriber::fmt::init();
    tracing::info!("Starting VidTube API in {:?} mode", config.environment);

    if let Err(e) = vidtube_api::database::DatabaseManager::migrate().await {
        tracing::error!("Schema bootstrap failed: {}", e);
        std::process::exit(1);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("VIDTUBE_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("VidTube API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .merge(user_routes())
        .merge(video_routes())
        .merge(playlist_routes())
        .merge(like_routes())
        .merge(subscription_routes())
        // Global middleware
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn user_routes() -> Router {
    use axum::routing::{patch, post, put};
    use handlers::{auth, users};

    let public = Router::new()
        .route("/api/v1/users/register", post(auth::register))
        .route("/api/v1/users/login", post(auth::login))
        .route("/api/v1/users/refresh-token", post(auth::refresh_token));

    let protected = Router::new()
        .route("/api/v1/users/logout", post(auth::logout))
        .route("/api/v1/users/change-password", put(auth::change_password))
        .route("/api/v1/users/current-user", get(users::current_user))
        .route("/api/v1/users/update-account", patch(users::update_account))
        .route("/api/v1/users/avatar", patch(users::update_avatar))
        .route("/api/v1/users/cover-image", patch(users::update_cover_image))
        .route("/api/v1/users/c/:username", get(users::channel_profile))
        .route("/api/v1/users/history", get(users::watch_history))
        .route_layer(from_fn(jwt_auth_middleware));

    public.merge(protected)
}

fn video_routes() -> Router {
    use axum::routing::patch;
    use handlers::videos;

    Router::new()
        .route("/api/v1/videos", get(videos::list).post(videos::publish))
        .route(
            "/api/v1/videos/:videoId",
            get(videos::get_by_id).patch(videos::update).delete(videos::delete),
        )
        .route("/api/v1/videos/toggle/publish/:videoId", patch(videos::toggle_publish))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn playlist_routes() -> Router {
    use axum::routing::{patch, post};
    use handlers::playlists;

    Router::new()
        .route("/api/v1/playlists", post(playlists::create))
        .route(
            "/api/v1/playlists/:playlistId",
            get(playlists::get_by_id).patch(playlists::update).delete(playlists::delete),
        )
        .route("/api/v1/playlists/add/:videoId/:playlistId", patch(playlists::add_video))
        .route("/api/v1/playlists/remove/:videoId/:playlistId", patch(playlists::remove_video))
        .route("/api/v1/playlists/user/:userId", get(playlists::by_user))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn like_routes() -> Router {
    use axum::routing::post;
    use handlers::likes;

    Router::new()
        .route("/api/v1/likes/toggle/v/:videoId", post(likes::toggle_video_like))
        .route("/api/v1/likes/toggle/c/:commentId", post(likes::toggle_comment_like))
        .route("/api/v1/likes/toggle/t/:tweetId", post(likes::toggle_tweet_like))
        .route("/api/v1/likes/videos", get(likes::liked_videos))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn subscription_routes() -> Router {
    use handlers::subscriptions;

    Router::new()
        .route(
            "/api/v1/subscriptions/c/:channelId",
            get(subscriptions::channel_subscribers).post(subscriptions::toggle),
        )
        .route("/api/v1/subscriptions/u/:subscriberId", get(subscriptions::subscribed_channels))
        .route_layer(from_fn(jwt_auth_middleware))
}

async fn healthcheck() -> impl axum::response::IntoResponse {
    use axum::http::StatusCode;
    use axum::response::Json;

    let now = chrono::Utc::now();

    match vidtube_api::database::DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "statusCode": 200,
                "data": { "status": "ok", "timestamp": now },
                "message": "health check passed",
                "success": true
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "statusCode": 503,
                "data": Value::Null,
                "message": format!("database unavailable: {}", e),
                "success": false,
                "errors": []
            })),
        ),
    }
}
