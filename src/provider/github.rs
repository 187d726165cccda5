use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::errors::BadgeError;
use crate::provider::{ProfileProvider, RepoSummary, UserProfile};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("statbadge/", env!("CARGO_PKG_VERSION"));

/// GitHub REST client.
#[derive(Debug, Clone)]
pub struct GithubProvider {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GithubProvider {
    /// # Errors
    /// Returns `Upstream` if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> Result<Self, BadgeError> {
        let client = reqwest::Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string(), token })
    }

    async fn get_json<T: DeserializeOwned>(&self, identity: &str, path: &str) -> Result<T, BadgeError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.get(&url).header(ACCEPT, "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let status = resp.status().as_u16();
        match status {
            404 => Err(BadgeError::NotFound(identity.to_string())),
            403 | 429 => Err(BadgeError::RateLimited),
            s if s >= 400 => Err(BadgeError::UpstreamStatus(s)),
            _ => resp.json::<T>().await.map_err(|e| {
                if e.is_timeout() {
                    BadgeError::Timeout
                } else {
                    BadgeError::Upstream(format!("failed to parse response from {path}: {e}"))
                }
            }),
        }
    }
}

#[async_trait]
impl ProfileProvider for GithubProvider {
    async fn fetch_user(&self, identity: &str) -> Result<UserProfile, BadgeError> {
        let path = format!("/users/{}", urlencoding::encode(identity));
        self.get_json(identity, &path).await
    }

    async fn fetch_repos_page(
        &self,
        identity: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepoSummary>, BadgeError> {
        let path =
            format!("/users/{}/repos?per_page={per_page}&page={page}", urlencoding::encode(identity));
        self.get_json(identity, &path).await
    }
}
