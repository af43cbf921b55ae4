mod common;

use anyhow::Result;
use atlas_forum_api::testing::SiteBuilder;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::TestServer::spawn(&SiteBuilder::new()).await?;

    let res = reqwest::get(format!("{}/health", server.base_url)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let server = common::TestServer::spawn(&SiteBuilder::new()).await?;

    let body = reqwest::get(format!("{}/", server.base_url))
        .await?
        .json::<serde_json::Value>()
        .await?;

    assert_eq!(body["data"]["name"], "Atlas Forum API");
    Ok(())
}

#[tokio::test]
async fn malformed_site_header_is_rejected() -> Result<()> {
    let server = common::TestServer::spawn(&SiteBuilder::new()).await?;

    let res = reqwest::Client::new()
        .get(format!("{}/api/public/forums/readable", server.base_url))
        .header("X-Site-Id", "not-a-uuid")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn invalid_token_is_unauthorized() -> Result<()> {
    let server = common::TestServer::spawn(&SiteBuilder::new()).await?;

    let res = server
        .get("/api/public/forums/readable")
        .bearer_auth("garbage")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
