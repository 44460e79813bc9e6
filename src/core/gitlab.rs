use crate::config::GitlabConfig;
use crate::domain::CommitRef;
use crate::utils::error::{BridgeError, Result};
use reqwest::Client;
use serde::Deserialize;

const USER_AGENT: &str = concat!("hookbridge/", env!("CARGO_PKG_VERSION"));

/// Pipeline list entry, as returned by `GET projects/:id/pipelines`.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSummary {
    pub id: u64,
}

/// Job entry from `GET projects/:id/pipelines/:pipeline_id/jobs`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSummary {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub commit: CommitRef,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// GitLab v4 API client scoped to one project.
pub struct GitlabClient {
    http: Client,
    config: GitlabConfig,
}

impl GitlabClient {
    pub fn new(config: GitlabConfig) -> Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GitlabConfig {
        &self.config
    }

    async fn get(&self, endpoint: &str, args: &[(&str, &str)]) -> Result<serde_json::Value> {
        let url = format!(
            "{}/projects/{}/{}",
            self.config.api_base(),
            self.config.encoded_project_path(),
            endpoint
        );
        tracing::debug!("Invoking GitLab API: GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(args)
            .header("PRIVATE-TOKEN", &self.config.access_token)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status.as_u16() != 200 {
            return Err(BridgeError::ApiStatusError {
                service: "gitlab",
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// The five most recently updated pipelines, newest first.
    pub async fn recent_pipelines(&self) -> Result<Vec<PipelineSummary>> {
        let value = self
            .get(
                "pipelines",
                &[
                    ("pagination", "keyset"),
                    ("order_by", "updated_at"),
                    ("sort", "desc"),
                    ("per_page", "5"),
                ],
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn pipeline_jobs(&self, pipeline_id: u64) -> Result<Vec<JobSummary>> {
        let value = self
            .get(
                &format!("pipelines/{}/jobs", pipeline_id),
                &[("per_page", "100")],
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}
