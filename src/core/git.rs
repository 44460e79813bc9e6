use crate::config::RepoConfig;
use crate::utils::error::{BridgeError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Drives the local bare mirror of one repository through git
/// subprocesses. All operations are sequential; the mirror worker is the
/// only caller, so no locking is needed around the working directory.
pub struct GitMirror {
    name: String,
    path: PathBuf,
    clone_url: String,
    push_url: String,
}

impl GitMirror {
    pub fn new(name: &str, path: impl Into<PathBuf>, clone_url: String, push_url: String) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
            clone_url,
            push_url,
        }
    }

    pub fn for_repo(name: &str, repo: &RepoConfig) -> Self {
        Self::new(
            name,
            repo.path.clone(),
            repo.github_url(),
            repo.gitlab_push_url(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clone the upstream as a bare mirror and run one initial sync. A
    /// mirror directory left over from a previous run is reused as-is, so
    /// restarting the service does not re-clone.
    pub async fn init(&self) -> Result<()> {
        if self.path.exists() {
            tracing::info!("Mirror for '{}' already exists, skipping clone", self.name);
        } else {
            tracing::info!("Initializing local mirror for '{}'", self.name);
            let path = self.path.to_string_lossy();
            run_git(
                "clone",
                &[
                    "clone",
                    "--bare",
                    "--mirror",
                    self.clone_url.as_str(),
                    path.as_ref(),
                ],
                None,
            )
            .await?;

            // Fetch every ref on future updates
            self.git(
                "config",
                &["config", "--add", "remote.origin.fetch", "+refs/*:refs/*"],
            )
            .await?;
            // Pull request heads become branches on the GitLab side
            self.git(
                "config",
                &[
                    "config",
                    "--add",
                    "remote.origin.fetch",
                    "+refs/pull/*:refs/heads/pull/*",
                ],
            )
            .await?;
        }

        self.sync().await
    }

    /// Fetch all refs from the upstream and force-push the whole mirror to
    /// the GitLab remote.
    pub async fn sync(&self) -> Result<()> {
        tracing::info!("Syncing mirror '{}'", self.name);
        self.git("remote update", &["remote", "update", "-p"]).await?;

        // Ref listing goes to the inherited stdout for operator visibility
        self.git("show-ref", &["show-ref"]).await?;

        // push_url carries the access token; the label keeps it out of
        // error messages and logs
        self.git("push --mirror", &["push", "--mirror", self.push_url.as_str()])
            .await?;
        tracing::info!("Mirror '{}' synced", self.name);
        Ok(())
    }

    async fn git(&self, label: &str, args: &[&str]) -> Result<()> {
        run_git(label, args, Some(&self.path)).await
    }
}

async fn run_git(label: &str, args: &[&str], cwd: Option<&Path>) -> Result<()> {
    let mut cmd = Command::new("git");
    cmd.args(args).stdout(Stdio::inherit()).stderr(Stdio::inherit());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let status = cmd.status().await?;
    if !status.success() {
        return Err(BridgeError::GitCommandError {
            command: label.to_string(),
            code: status.code(),
        });
    }
    Ok(())
}
