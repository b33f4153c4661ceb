//! Node entry point: establish the project's ledger and replay it.

use std::process::ExitCode;

use anyhow::Context;
use ows_ledger::actions::default_registry;
use ows_ledger::{LedgerService, NodeConfig, Project};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = NodeConfig::from_env();
    tracing::info!(home = %config.home_dir.display(), "home dir");

    let registry = default_registry().context("building action registry")?;
    let project = Project::open(&config, registry).context("resolving genesis set")?;
    if let Some(path) = project.ledger_path() {
        tracing::info!(path = %path.display(), "ledger location");
    }

    let service = LedgerService::start(project, config.validate_assets)
        .await
        .context("establishing ledger")?;

    let resources = service.resources().await;
    tracing::info!(
        head = %service.head().await,
        length = service.len().await,
        tasks = resources.task_count(),
        users = resources.user_count(),
        "node ready"
    );
    Ok(())
}
