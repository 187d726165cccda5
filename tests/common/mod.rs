#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use statbadge::App;
use statbadge::config::ServiceConfig;
use statbadge::errors::BadgeError;
use statbadge::provider::{ProfileProvider, RepoSummary, UserProfile};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-process provider with canned users; anyone else is not found.
#[derive(Default)]
pub struct FakeProvider {
    pub users: HashMap<String, (UserProfile, Vec<u64>)>,
    pub fail_with: Option<fn() -> BadgeError>,
    pub calls: AtomicUsize,
}

impl FakeProvider {
    pub fn with_user(mut self, login: &str, followers: u64, stars: Vec<u64>) -> Self {
        let profile = UserProfile {
            login: login.to_string(),
            followers,
            following: 7,
            public_repos: stars.len() as u64,
            public_gists: 2,
            created_at: Utc.with_ymd_and_hms(2011, 1, 25, 18, 44, 36).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap(),
        };
        self.users.insert(login.to_string(), (profile, stars));
        self
    }

    pub fn failing(fail: fn() -> BadgeError) -> Self {
        Self { fail_with: Some(fail), ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, identity: &str) -> Result<&(UserProfile, Vec<u64>), BadgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(fail) = self.fail_with {
            return Err(fail());
        }
        self.users.get(identity).ok_or_else(|| BadgeError::NotFound(identity.to_string()))
    }
}

#[async_trait]
impl ProfileProvider for FakeProvider {
    async fn fetch_user(&self, identity: &str) -> Result<UserProfile, BadgeError> {
        Ok(self.lookup(identity)?.0.clone())
    }

    async fn fetch_repos_page(&self, identity: &str, page: u32, per_page: u32) -> Result<Vec<RepoSummary>, BadgeError> {
        let (_, stars) = self.lookup(identity)?;
        let start = ((page.max(1) - 1) * per_page) as usize;
        Ok(stars
            .iter()
            .skip(start)
            .take(per_page as usize)
            .map(|&stargazers_count| RepoSummary { stargazers_count })
            .collect())
    }
}

pub fn ephemeral_config() -> ServiceConfig {
    ServiceConfig { ephemeral: true, ..ServiceConfig::default() }
}

pub fn app_with(provider: Arc<FakeProvider>) -> App {
    App::build(&ephemeral_config(), provider).unwrap()
}

pub fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
}
