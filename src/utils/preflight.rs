//! Startup checks for the external tools the service spawns.
//!
//! The container image is expected to provision git; this verifies the
//! expectation before any webhook can trigger a subprocess.

use crate::utils::error::{BridgeError, Result};
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct CheckItem {
    pub name: String,
    pub passed: bool,
    pub message: String,
}

/// Run every preflight check, failing on the first unmet requirement.
pub async fn run_preflight_checks() -> Result<Vec<CheckItem>> {
    let mut checks = Vec::new();

    checks.push(check_binary("git", &["--version"]).await);

    if let Some(failed) = checks.iter().find(|c| !c.passed) {
        return Err(BridgeError::PreflightError {
            message: format!("{}: {}", failed.name, failed.message),
        });
    }

    Ok(checks)
}

async fn check_binary(name: &str, args: &[&str]) -> CheckItem {
    match Command::new(name).args(args).output().await {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            CheckItem {
                name: name.to_string(),
                passed: true,
                message: version,
            }
        }
        Ok(output) => CheckItem {
            name: name.to_string(),
            passed: false,
            message: format!("exited with {:?}", output.status.code()),
        },
        Err(e) => CheckItem {
            name: name.to_string(),
            passed: false,
            message: format!("not invocable: {}", e),
        },
    }
}
