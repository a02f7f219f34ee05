mod common;

use anyhow::Result;
use reqwest::StatusCode;

// The protected surface must reject anonymous callers before any handler
// logic runs.

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in [
        "/api/v1/videos",
        "/api/v1/users/current-user",
        "/api/v1/users/history",
        "/api/v1/likes/videos",
    ] {
        let res = client.get(format!("{}{}", server.base_url, path)).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "expected 401 for {}", path);

        let payload = res.json::<serde_json::Value>().await?;
        assert_eq!(payload["success"], false, "bad envelope for {}", path);
        assert_eq!(payload["message"], "Access token is required");
    }

    Ok(())
}

#[tokio::test]
async fn garbage_bearer_token_is_rejected() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/videos", server.base_url))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["message"], "Invalid access token");

    Ok(())
}
