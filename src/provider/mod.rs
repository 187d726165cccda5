//! Upstream profile provider: the remote source of follower, repository and
//! star statistics.
pub mod github;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::BadgeError;

pub use github::GithubProvider;

/// Repositories requested per page when summing stars.
pub const REPOS_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub login: String,
    pub followers: u64,
    pub following: u64,
    pub public_repos: u64,
    pub public_gists: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RepoSummary {
    pub stargazers_count: u64,
}

/// Failures surface as `NotFound`, `RateLimited`, `Timeout`, `UpstreamStatus`
/// or `Upstream`.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn fetch_user(&self, identity: &str) -> Result<UserProfile, BadgeError>;

    async fn fetch_repos_page(
        &self,
        identity: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepoSummary>, BadgeError>;

    /// Stargazers summed over every repository, paging until an empty or
    /// short page.
    async fn total_stars(&self, identity: &str) -> Result<u64, BadgeError> {
        let mut page = 1;
        let mut total: u64 = 0;
        loop {
            let repos = self.fetch_repos_page(identity, page, REPOS_PER_PAGE).await?;
            if repos.is_empty() {
                break;
            }
            total = total.saturating_add(repos.iter().map(|r| r.stargazers_count).sum::<u64>());
            if repos.len() < REPOS_PER_PAGE as usize {
                break;
            }
            page += 1;
        }
        Ok(total)
    }
}
