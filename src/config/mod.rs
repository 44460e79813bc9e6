pub mod yaml_config;

pub use yaml_config::{BridgeConfig, GithubConfig, GitlabConfig, RepoConfig};

use crate::utils::validation::{validate_path, validate_port, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "hookbridge")]
#[command(about = "GitHub to GitLab mirror bridge")]
pub struct CliConfig {
    /// Path to the YAML configuration file
    pub config_path: String,

    #[arg(long, default_value = "3000")]
    pub port: u16,

    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON (for container log collectors)")]
    pub log_json: bool,

    #[arg(long, help = "Skip startup checks for required external tools")]
    pub skip_preflight: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validate_path("config_path", &self.config_path)?;
        validate_port("port", self.port)?;
        Ok(())
    }
}
