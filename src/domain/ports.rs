use crate::domain::model::CommitState;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where published commit statuses go. The production implementation is
/// the GitHub REST client; tests substitute a recording fake.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn set_commit_status(
        &self,
        commit: &str,
        context: &str,
        state: CommitState,
        description: &str,
        target_url: &str,
    ) -> Result<()>;
}
