use crate::config::GithubConfig;
use crate::domain::{CommitState, StatusSink};
use crate::utils::error::{BridgeError, Result};
use async_trait::async_trait;
use reqwest::Client;

const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("hookbridge/", env!("CARGO_PKG_VERSION"));

/// Minimal GitHub REST client scoped to one repository.
pub struct GithubClient {
    http: Client,
    api_base: String,
    repo: String,
    token: String,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            repo: config.repo.clone(),
            token: config.access_token.clone(),
        })
    }

    /// POST to a repository-scoped endpoint. GitHub answers 200 or 201 on
    /// success depending on the endpoint; anything else is an error.
    pub async fn post(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let url = format!("{}/repos/{}/{}", self.api_base, self.repo, endpoint);
        tracing::debug!("Invoking GitHub API: POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status.as_u16() != 200 && status.as_u16() != 201 {
            return Err(BridgeError::ApiStatusError {
                service: "github",
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl StatusSink for GithubClient {
    async fn set_commit_status(
        &self,
        commit: &str,
        context: &str,
        state: CommitState,
        description: &str,
        target_url: &str,
    ) -> Result<()> {
        let body = serde_json::json!({
            "state": state.as_str(),
            "target_url": target_url,
            "description": description,
            "context": context,
        });
        self.post(&format!("statuses/{}", commit), &body).await?;
        Ok(())
    }
}
