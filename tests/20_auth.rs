mod common;

use anyhow::Result;
use reqwest::StatusCode;

// Error-path coverage for the public auth surface. Every failure must come
// back as the uniform envelope, never a hang or a bare status.

#[tokio::test]
async fn login_with_missing_fields_is_bad_request() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/users/login", server.base_url))
        .json(&serde_json::json!({ "username": "ghost" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["success"], false);
    assert_eq!(payload["statusCode"], 400);
    assert!(payload["data"].is_null());

    Ok(())
}

#[tokio::test]
async fn login_with_unknown_user_is_not_found() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/users/login", server.base_url))
        .json(&serde_json::json!({
            "username": "definitely-not-registered",
            "password": "whatever"
        }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["message"], "User not found");

    Ok(())
}

#[tokio::test]
async fn refresh_without_token_is_bad_request() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/users/refresh-token", server.base_url))
        .json(&serde_json::json!({}))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload = res.json::<serde_json::Value>().await?;
    assert_eq!(payload["message"], "Refresh token is required");

    Ok(())
}

#[tokio::test]
async fn refresh_with_garbage_token_is_unauthorized() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/users/refresh-token", server.base_url))
        .json(&serde_json::json!({ "refreshToken": "not-a-jwt" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
