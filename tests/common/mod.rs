#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::RequestBuilder;
use tokio::task::JoinHandle;
use uuid::Uuid;

use atlas_forum_api::auth::{generate_jwt, Claims};
use atlas_forum_api::domain::Member;
use atlas_forum_api::middleware::SITE_HEADER;
use atlas_forum_api::testing::SiteBuilder;
use atlas_forum_api::{app, AppState};

/// The API served on an ephemeral port over an in-memory copy of one site
pub struct TestServer {
    pub base_url: String,
    pub site_id: Uuid,
    client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(site: &SiteBuilder) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let port = listener.local_addr()?.port();

        let app = app(AppState::new(site.repository()));
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            site_id: site.id,
            client: reqwest::Client::new(),
            handle,
        })
    }

    /// Anonymous request on this site
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header(SITE_HEADER, self.site_id.to_string())
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header(SITE_HEADER, self.site_id.to_string())
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .header(SITE_HEADER, self.site_id.to_string())
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client
            .delete(format!("{}{}", self.base_url, path))
            .header(SITE_HEADER, self.site_id.to_string())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Sign the request as `member`
pub fn as_member(request: RequestBuilder, member: &Member) -> RequestBuilder {
    let token = generate_jwt(&Claims::new(member.site_id, member.id)).expect("token");
    request.bearer_auth(token)
}
