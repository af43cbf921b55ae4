mod common;

use anyhow::Result;
use atlas_forum_api::domain::{Member, PermissionType};
use atlas_forum_api::testing::SiteBuilder;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{as_member, TestServer};

async fn authorize(server: &TestServer, path: &str, member: &Member, body: Value) -> Result<StatusCode> {
    let res = as_member(server.post(path), member).json(&body).send().await?;
    Ok(res.status())
}

#[tokio::test]
async fn category_grant_applies_to_forum_without_override() -> Result<()> {
    let mut site = SiteBuilder::new();
    let set = site.permission_set("Readers", &[("A", PermissionType::Read)]);
    let category = site.category("General", Some(set));
    let forum = site.forum(category, "Lobby", None);
    let member = site.member("alice", &["A"]);
    let server = TestServer::spawn(&site).await?;

    let res = as_member(server.get(&format!("/api/public/forums/{}/permissions", forum)), &member)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["can_read"], true);
    assert_eq!(body["data"]["can_start"], false);

    let res = as_member(server.post(&format!("/api/public/forums/{}/authorize", forum)), &member)
        .json(&json!({ "action": "start" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn forum_override_replaces_category_set() -> Result<()> {
    let mut site = SiteBuilder::new();
    let category_set = site.permission_set(
        "Category",
        &[("A", PermissionType::Read), ("A", PermissionType::Moderate)],
    );
    let forum_set = site.permission_set(
        "Staff",
        &[("A", PermissionType::Read), ("B", PermissionType::Moderate)],
    );
    let category = site.category("General", Some(category_set));
    let forum = site.forum(category, "Staff room", Some(forum_set));
    let member = site.member("alice", &["A"]);
    let server = TestServer::spawn(&site).await?;

    let res = as_member(server.post(&format!("/api/public/forums/{}/authorize", forum)), &member)
        .json(&json!({ "action": "moderate" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = as_member(server.post(&format!("/api/public/forums/{}/authorize", forum)), &member)
        .json(&json!({ "action": "read" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["allowed"], true);
    Ok(())
}

#[tokio::test]
async fn forum_without_permission_set_denies_everyone() -> Result<()> {
    let mut site = SiteBuilder::new();
    let category = site.category("Unconfigured", None);
    let forum = site.forum(category, "Void", None);
    let admin = site.member("root", &["Admin", "Moderator"]);
    let server = TestServer::spawn(&site).await?;

    let res = as_member(server.get(&format!("/api/public/forums/{}/permissions", forum)), &admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unknown_and_deleted_forums_are_unauthorized() -> Result<()> {
    let mut site = SiteBuilder::new();
    let set = site.permission_set("Public", &[("All", PermissionType::Read)]);
    let category = site.category("General", Some(set));
    let deleted = site.forum(category, "Archive", None);
    site.delete_forum(deleted);
    let server = TestServer::spawn(&site).await?;

    for forum in [deleted, Uuid::new_v4()] {
        let res = server
            .get(&format!("/api/public/forums/{}/permissions", forum))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

#[tokio::test]
async fn anonymous_caller_only_holds_all() -> Result<()> {
    let mut site = SiteBuilder::new();
    let set = site.permission_set(
        "Public",
        &[("All", PermissionType::Read), ("Registered", PermissionType::Reply)],
    );
    let category = site.category("General", Some(set));
    let forum = site.forum(category, "Lobby", None);
    let server = TestServer::spawn(&site).await?;

    let body = server
        .get(&format!("/api/public/forums/{}/permissions", forum))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["data"]["can_read"], true);
    assert_eq!(body["data"]["can_reply"], false);

    let res = server
        .post(&format!("/api/public/forums/{}/authorize", forum))
        .json(&json!({ "action": "reply" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn suspended_member_can_read_but_not_reply() -> Result<()> {
    let mut site = SiteBuilder::new();
    let set = site.permission_set(
        "Members",
        &[("Registered", PermissionType::Read), ("Registered", PermissionType::Reply)],
    );
    let category = site.category("General", Some(set));
    let forum = site.forum(category, "Lobby", None);
    let member = site.suspended_member("mallory", &[]);
    let server = TestServer::spawn(&site).await?;

    let body = as_member(server.get(&format!("/api/public/forums/{}/permissions", forum)), &member)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["data"]["can_read"], true);
    assert_eq!(body["data"]["can_reply"], false);
    Ok(())
}

#[tokio::test]
async fn owner_edit_and_moderator_bypass() -> Result<()> {
    let mut site = SiteBuilder::new();
    let set = site.permission_set(
        "Members",
        &[
            ("Registered", PermissionType::Read),
            ("Registered", PermissionType::Edit),
            ("Moderator", PermissionType::Moderate),
        ],
    );
    let category = site.category("General", Some(set));
    let forum = site.forum(category, "Lobby", None);
    let author = site.member("alice", &[]);
    let other = site.member("bob", &[]);
    let moderator = site.member("carol", &["Moderator"]);
    let server = TestServer::spawn(&site).await?;
    let path = format!("/api/public/forums/{}/authorize", forum);

    let unlocked = json!({ "action": "edit", "owner_id": author.id });
    let locked = json!({ "action": "edit", "owner_id": author.id, "locked": true });

    assert_eq!(authorize(&server, &path, &author, unlocked.clone()).await?, StatusCode::OK);
    assert_eq!(authorize(&server, &path, &author, locked.clone()).await?, StatusCode::UNAUTHORIZED);
    assert_eq!(authorize(&server, &path, &other, unlocked).await?, StatusCode::UNAUTHORIZED);
    assert_eq!(authorize(&server, &path, &moderator, locked).await?, StatusCode::OK);
    assert_eq!(
        authorize(&server, &path, &moderator, json!({ "action": "delete", "owner_id": author.id })).await?,
        StatusCode::OK
    );
    Ok(())
}

#[tokio::test]
async fn readable_lists_only_forums_the_caller_can_read() -> Result<()> {
    let mut site = SiteBuilder::new();
    let public = site.permission_set("Public", &[("All", PermissionType::Read)]);
    let staff = site.permission_set("Staff", &[("Moderator", PermissionType::Read)]);
    let category = site.category("General", Some(public));
    let lobby = site.forum(category, "Lobby", None);
    let staff_room = site.forum(category, "Staff room", Some(staff));
    let moderator = site.member("carol", &["Moderator"]);
    let server = TestServer::spawn(&site).await?;

    let ids = |body: Value| -> Vec<String> {
        body["data"]
            .as_array()
            .map(|forums| {
                forums
                    .iter()
                    .filter_map(|f| f["id"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };

    let anonymous = server.get("/api/public/forums/readable").send().await?.json::<Value>().await?;
    assert_eq!(ids(anonymous), vec![lobby.to_string()]);

    let staff_view = as_member(server.get("/api/public/forums/readable"), &moderator)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(ids(staff_view), vec![lobby.to_string(), staff_room.to_string()]);
    Ok(())
}

#[tokio::test]
async fn unknown_member_token_is_unauthorized() -> Result<()> {
    let mut site = SiteBuilder::new();
    let set = site.permission_set("Public", &[("All", PermissionType::Read)]);
    let category = site.category("General", Some(set));
    let forum = site.forum(category, "Lobby", None);
    let server = TestServer::spawn(&site).await?;

    // Member exists only outside the repository snapshot
    let ghost = SiteBuilder::new().member("ghost", &[]);

    let res = as_member(server.get(&format!("/api/public/forums/{}/permissions", forum)), &ghost)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
