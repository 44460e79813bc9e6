use clap::Parser;
use hookbridge::core::workers::{run_mirror_worker, JOB_CHANNEL_CAPACITY};
use hookbridge::utils::error::{BridgeError, ErrorSeverity, Result};
use hookbridge::utils::{logger, preflight, validation::Validate};
use hookbridge::{AppState, BridgeConfig, CliConfig, StatusWorker};
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting hookbridge");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ hookbridge failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

/// Linear, fail-fast startup: config, preflight, workers, then the serve
/// loop. Any failure before the serve loop aborts the whole process.
async fn run(cli: CliConfig) -> Result<()> {
    cli.validate()?;

    let config = BridgeConfig::from_yaml_file(&cli.config_path)?;
    config.validate()?;
    tracing::info!("Loaded configuration with {} repositories", config.repos.len());

    if cli.skip_preflight {
        tracing::warn!("Skipping preflight checks");
    } else {
        for check in preflight::run_preflight_checks().await? {
            tracing::info!("✅ Preflight: {} ({})", check.name, check.message);
        }
    }

    let config = Arc::new(config);
    let (mirror_tx, mirror_rx) = mpsc::channel(JOB_CHANNEL_CAPACITY);
    let (status_tx, status_rx) = mpsc::channel(JOB_CHANNEL_CAPACITY);

    let status_worker = StatusWorker::new(config.clone())?;
    let mut mirror_task = tokio::spawn(run_mirror_worker(config.clone(), mirror_rx));
    let mut status_task = tokio::spawn(status_worker.run(status_rx));

    let state = AppState {
        config,
        mirror_tx,
        status_tx,
    };

    // Workers only return early on a startup failure; surface that instead
    // of serving with half the bridge missing.
    tokio::select! {
        res = hookbridge::server::serve(state, &cli.bind, cli.port) => res,
        res = &mut mirror_task => flatten_worker("mirror worker", res),
        res = &mut status_task => flatten_worker("status worker", res),
    }
}

fn flatten_worker(
    name: &str,
    joined: std::result::Result<Result<()>, tokio::task::JoinError>,
) -> Result<()> {
    match joined {
        Ok(Ok(())) => Err(BridgeError::WorkerTerminatedError {
            message: format!("{} exited unexpectedly", name),
        }),
        Ok(Err(e)) => Err(e),
        Err(join_err) => Err(BridgeError::WorkerTerminatedError {
            message: format!("{} panicked: {}", name, join_err),
        }),
    }
}
