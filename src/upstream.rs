//! Authenticated HTTP accessor for the GitLab REST API.
//!
//! One `reqwest::Client` shared across all requests; every call attaches the
//! caller's access token as a bearer credential. No retry, no backoff, no
//! circuit breaking: a single failing call aborts the whole aggregation.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::errors::AppError;
use crate::models::gitlab::{CommitSummary, Event, Group, Project, UserProfile};

/// Page sizes are fixed so the composed payload is bounded and deterministic:
/// the latest 40 events, at most 10 groups, at most 20 projects per group.
const EVENTS_PER_PAGE: u32 = 40;
const GROUPS_PER_PAGE: u32 = 10;
const PROJECTS_PER_PAGE: u32 = 20;

pub struct UpstreamClient {
    client: reqwest::Client,
    api_url: Url,
}

impl UpstreamClient {
    pub fn new(gitlab_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;

        let api_url = Url::parse(&format!("{}/api/v4/", gitlab_url.trim_end_matches('/')))
            .map_err(|e| anyhow::anyhow!("invalid GitLab base URL: {}", e))?;

        Ok(Self { client, api_url })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
    ) -> Result<T, AppError> {
        let url = self
            .api_url
            .join(path)
            .map_err(|e| AppError::Upstream(format!("invalid API path {}: {}", path, e)))?;

        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("GET {} failed: {}", path, e)))?;

        if !resp.status().is_success() {
            return Err(AppError::Upstream(format!(
                "GET {} returned {}",
                path,
                resp.status()
            )));
        }

        resp.json::<T>()
            .await
            .map_err(|e| AppError::Upstream(format!("GET {} body decode failed: {}", path, e)))
    }

    pub async fn current_user(&self, token: &str) -> Result<UserProfile, AppError> {
        self.get_json(token, "user").await
    }

    /// Latest activity for the authenticated user, newest first.
    pub async fn events(&self, token: &str) -> Result<Vec<Event>, AppError> {
        self.get_json(token, &format!("events?per_page={}", EVENTS_PER_PAGE))
            .await
    }

    pub async fn groups(&self, token: &str) -> Result<Vec<Group>, AppError> {
        self.get_json(token, &format!("groups?per_page={}", GROUPS_PER_PAGE))
            .await
    }

    pub async fn group_projects(
        &self,
        token: &str,
        group_id: u64,
    ) -> Result<Vec<Project>, AppError> {
        self.get_json(
            token,
            &format!("groups/{}/projects?per_page={}", group_id, PROJECTS_PER_PAGE),
        )
        .await
    }

    /// The single most recent commit of a project's default branch, or
    /// `None` for a project with no commits. GitLab answers 404 for a
    /// project whose repository is empty; that is not an error here.
    pub async fn latest_commit(
        &self,
        token: &str,
        project_id: u64,
    ) -> Result<Option<CommitSummary>, AppError> {
        let path = format!("projects/{}/repository/commits?per_page=1", project_id);
        let url = self
            .api_url
            .join(&path)
            .map_err(|e| AppError::Upstream(format!("invalid API path {}: {}", path, e)))?;

        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("GET {} failed: {}", path, e)))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(AppError::Upstream(format!(
                "GET {} returned {}",
                path,
                resp.status()
            )));
        }

        let commits: Vec<CommitSummary> = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("GET {} body decode failed: {}", path, e)))?;

        Ok(commits.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_is_rooted_at_v4() {
        let client = UpstreamClient::new("https://gitlab.example.com").unwrap();
        assert_eq!(client.api_url.as_str(), "https://gitlab.example.com/api/v4/");
    }

    #[test]
    fn trailing_slash_on_base_url_is_tolerated() {
        let client = UpstreamClient::new("https://gitlab.example.com/").unwrap();
        assert_eq!(client.api_url.as_str(), "https://gitlab.example.com/api/v4/");
    }
}
