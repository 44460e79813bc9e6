pub mod git;
pub mod github;
pub mod gitlab;
pub mod status;
pub mod workers;

pub use crate::domain::{CommitState, MirrorJob, PipelineEvent, StatusJob, StatusSink};
pub use crate::utils::error::Result;
pub use git::GitMirror;
pub use github::GithubClient;
pub use gitlab::GitlabClient;
pub use workers::{run_mirror_worker, StatusWorker, JOB_CHANNEL_CAPACITY};
