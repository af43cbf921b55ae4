mod common;

use anyhow::Result;
use atlas_forum_api::domain::PermissionType;
use atlas_forum_api::testing::SiteBuilder;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{as_member, TestServer};

#[tokio::test]
async fn admin_manages_permission_sets() -> Result<()> {
    let mut site = SiteBuilder::new();
    let admin = site.member("root", &["Admin"]);
    let server = TestServer::spawn(&site).await?;

    // Create, with a duplicate entry that the later command overrides
    let res = as_member(server.post("/api/admin/permission-sets"), &admin)
        .json(&json!({
            "name": "Members",
            "permissions": [
                { "role_id": "Registered", "permission_type": "Read" },
                { "role_id": "Registered", "permission_type": "Reply", "is_allowed": false },
                { "role_id": "Registered", "permission_type": "Reply" }
            ]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = res.json::<Value>().await?;
    let id = created["data"]["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(created["data"]["name"], "Members");
    assert_eq!(created["data"]["permissions"].as_array().map(Vec::len), Some(2));
    assert_eq!(created["data"]["permissions"][1]["is_allowed"], true);

    // List
    let list = as_member(server.get("/api/admin/permission-sets"), &admin)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(list["data"][0]["id"], id.as_str());

    // Update
    let res = as_member(server.put(&format!("/api/admin/permission-sets/{}", id)), &admin)
        .json(&json!({
            "name": "Members only",
            "permissions": [{ "role_id": "Registered", "permission_type": "Start" }]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let shown = as_member(server.get(&format!("/api/admin/permission-sets/{}", id)), &admin)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(shown["data"]["name"], "Members only");
    assert_eq!(shown["data"]["permissions"][0]["permission_type"], "Start");

    // Delete
    let res = as_member(server.delete(&format!("/api/admin/permission-sets/{}", id)), &admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = as_member(server.get(&format!("/api/admin/permission-sets/{}", id)), &admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn rejects_invalid_names() -> Result<()> {
    let mut site = SiteBuilder::new();
    site.permission_set("Default", &[]);
    let admin = site.member("root", &["Admin"]);
    let server = TestServer::spawn(&site).await?;

    let long = "x".repeat(51);
    for name in ["", "DEFAULT", long.as_str()] {
        let res = as_member(server.post("/api/admin/permission-sets"), &admin)
            .json(&json!({ "name": name }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "name {:?}", name);

        let body = res.json::<Value>().await?;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"]["name"].is_string());
    }
    Ok(())
}

#[tokio::test]
async fn set_in_use_cannot_be_deleted() -> Result<()> {
    let mut site = SiteBuilder::new();
    let set = site.permission_set("Public", &[("All", PermissionType::Read)]);
    site.category("General", Some(set));
    let admin = site.member("root", &["Admin"]);
    let server = TestServer::spawn(&site).await?;

    let res = as_member(server.delete(&format!("/api/admin/permission-sets/{}", set)), &admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn administration_requires_admin_role() -> Result<()> {
    let mut site = SiteBuilder::new();
    let member = site.member("alice", &["Moderator"]);
    let server = TestServer::spawn(&site).await?;

    let res = server.get("/api/admin/permission-sets").send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = as_member(server.get("/api/admin/permission-sets"), &member).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = as_member(server.post("/api/admin/permission-sets"), &member)
        .json(&json!({ "name": "Sneaky" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn cannot_create_over_another_sites_set() -> Result<()> {
    let mut other = SiteBuilder::new();
    let foreign = other.permission_set("Staff", &[("Moderator", PermissionType::Moderate)]);
    let other_admin = other.member("owner", &["Admin"]);
    let mut site = SiteBuilder::new();
    site.include(&other);
    let admin = site.member("root", &["Admin"]);
    let server = TestServer::spawn(&site).await?;

    let res = as_member(server.post("/api/admin/permission-sets"), &admin)
        .json(&json!({ "id": foreign, "name": "Mine now" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(res.json::<Value>().await?["code"], "CONFLICT");

    let shown = as_member(server.get(&format!("/api/admin/permission-sets/{}", foreign)), &other_admin)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(shown["data"]["name"], "Staff");
    Ok(())
}
