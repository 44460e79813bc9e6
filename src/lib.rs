pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use config::{BridgeConfig, CliConfig, RepoConfig};
pub use core::{GitMirror, GithubClient, GitlabClient, StatusWorker};
pub use server::{build_router, AppState};
pub use utils::error::{BridgeError, Result};
