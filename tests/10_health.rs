mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn healthcheck_reports_envelope() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/healthcheck", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK, "unexpected status: {}", res.status());

    let payload = res.json::<serde_json::Value>().await?;
    assert!(payload["success"].as_bool().unwrap_or(false), "success=false: {}", payload);
    assert_eq!(payload["statusCode"], 200);
    assert_eq!(payload["data"]["status"], "ok");

    Ok(())
}
