use crate::config::GitlabConfig;
use crate::domain::{CommitState, StatusSink};
use crate::utils::error::Result;

/// Publish one GitLab job result as a GitHub commit status.
///
/// The status context is namespaced under `gitlab/` so bridge-produced
/// statuses never collide with checks created directly on GitHub. Job
/// statuses with no GitHub equivalent are skipped with a warning.
pub async fn publish_job_status<S: StatusSink>(
    sink: &S,
    gitlab: &GitlabConfig,
    commit: &str,
    job_name: &str,
    gitlab_status: &str,
    target_url: &str,
) -> Result<()> {
    let Some(state) = CommitState::from_gitlab(gitlab_status) else {
        tracing::warn!(
            "Unknown GitLab job status '{}' for job '{}', not updating",
            gitlab_status,
            job_name
        );
        return Ok(());
    };

    let description = gitlab
        .job_descriptions
        .get(job_name)
        .cloned()
        .unwrap_or_else(|| format!("Gitlab {}", job_name));

    sink.set_commit_status(
        commit,
        &format!("gitlab/{}", job_name),
        state,
        &description,
        target_url,
    )
    .await
}
