use crate::config::BridgeConfig;
use crate::core::git::GitMirror;
use crate::core::github::GithubClient;
use crate::core::gitlab::GitlabClient;
use crate::core::status::publish_job_status;
use crate::domain::{MirrorJob, StatusJob};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const JOB_CHANNEL_CAPACITY: usize = 32;

/// Background task owning every local mirror. Jobs are processed strictly
/// one at a time, so concurrent webhooks never run git against the same
/// working directory simultaneously.
///
/// Startup clones are fail-fast: a repository that cannot be initialized
/// aborts the whole service. After startup a failed sync only logs, so a
/// transient push failure cannot wedge the worker.
pub async fn run_mirror_worker(
    config: Arc<BridgeConfig>,
    mut rx: mpsc::Receiver<MirrorJob>,
) -> Result<()> {
    let mut mirrors = HashMap::new();
    // 初始化順序固定，方便比對日誌
    let mut names: Vec<&String> = config.repos.keys().collect();
    names.sort();
    for name in names {
        let mirror = GitMirror::for_repo(name, &config.repos[name]);
        mirror.init().await?;
        mirrors.insert(name.clone(), mirror);
    }
    tracing::info!("✅ All mirrors initialized");

    while let Some(job) = rx.recv().await {
        tracing::info!("Mirror worker: syncing '{}'", job.repo_name);
        match mirrors.get(&job.repo_name) {
            Some(mirror) => {
                if let Err(e) = mirror.sync().await {
                    tracing::error!("❌ Sync of '{}' failed: {}", job.repo_name, e);
                    tracing::error!("💡 {}", e.recovery_suggestion());
                }
            }
            None => tracing::warn!("Mirror job for unconfigured repo '{}'", job.repo_name),
        }
    }

    tracing::info!("Mirror worker shutting down");
    Ok(())
}

/// Background task reflecting GitLab pipeline results onto GitHub commit
/// statuses, one event at a time.
pub struct StatusWorker {
    config: Arc<BridgeConfig>,
    sinks: HashMap<String, GithubClient>,
    gitlabs: HashMap<String, GitlabClient>,
}

impl StatusWorker {
    pub fn new(config: Arc<BridgeConfig>) -> Result<Self> {
        let mut sinks = HashMap::new();
        let mut gitlabs = HashMap::new();
        for (name, repo) in &config.repos {
            sinks.insert(name.clone(), GithubClient::new(&repo.github)?);
            gitlabs.insert(name.clone(), GitlabClient::new(repo.gitlab.clone())?);
        }
        Ok(Self {
            config,
            sinks,
            gitlabs,
        })
    }

    /// Re-publish the statuses of recent pipelines so GitHub catches up on
    /// anything that finished while the bridge was down.
    pub async fn backfill(&self) -> Result<()> {
        let mut names: Vec<&String> = self.config.repos.keys().collect();
        names.sort();
        for name in names {
            tracing::info!("Backfilling commit statuses for '{}'", name);
            let gitlab = &self.gitlabs[name];
            let sink = &self.sinks[name];

            for pipeline in gitlab.recent_pipelines().await? {
                for job in gitlab.pipeline_jobs(pipeline.id).await? {
                    let target_url = job
                        .web_url
                        .clone()
                        .unwrap_or_else(|| gitlab.config().job_web_url(job.id));
                    publish_job_status(
                        sink,
                        gitlab.config(),
                        &job.commit.id,
                        &job.name,
                        &job.status,
                        &target_url,
                    )
                    .await?;
                }
            }
        }
        tracing::info!("✅ Commit statuses backfilled");
        Ok(())
    }

    /// Backfill, then consume status jobs until every sender is dropped.
    pub async fn run(self, mut rx: mpsc::Receiver<StatusJob>) -> Result<()> {
        self.backfill().await?;

        while let Some(job) = rx.recv().await {
            tracing::info!("Status worker: processing pipeline event for '{}'", job.repo_name);
            if let Err(e) = self.handle_event(&job).await {
                tracing::error!("❌ Status update for '{}' failed: {}", job.repo_name, e);
                tracing::error!("💡 {}", e.recovery_suggestion());
            }
        }

        tracing::info!("Status worker shutting down");
        Ok(())
    }

    async fn handle_event(&self, job: &StatusJob) -> Result<()> {
        let Some(gitlab) = self.gitlabs.get(&job.repo_name) else {
            tracing::warn!("Status job for unconfigured repo '{}'", job.repo_name);
            return Ok(());
        };
        let sink = &self.sinks[&job.repo_name];

        let commit = &job.event.commit.id;
        for build in &job.event.builds {
            let target_url = gitlab.config().job_web_url(build.id);
            publish_job_status(
                sink,
                gitlab.config(),
                commit,
                &build.name,
                &build.status,
                &target_url,
            )
            .await?;
        }
        Ok(())
    }
}
