//! Carbonwatch entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use carbonwatch::adapters::{CommandInstrument, ProcessTestExecutor, SourceUpdater};
use carbonwatch::adapters::webhook::{self, AppState};
use carbonwatch::domain::models::LoggingConfig;
use carbonwatch::domain::ports::NullWorkflow;
use carbonwatch::services::{CommitEmissionsJob, EmissionsLog, EmissionsProbe, JobQueue};
use carbonwatch::ConfigLoader;

#[derive(Debug, Parser)]
#[command(name = "carbonwatch", about = "Commit emissions measurement service")]
struct Cli {
    /// Path to a configuration file (defaults to carbonwatch.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    match config.format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_tracing(&config.logging);

    let instrument = Arc::new(CommandInstrument::from_config(&config.measurement));
    let executor = Arc::new(ProcessTestExecutor::from_config(&config.measurement));
    let probe = Arc::new(EmissionsProbe::new(instrument, executor));
    let log = Arc::new(EmissionsLog::new(config.emissions_log.path.clone()));
    let job = Arc::new(CommitEmissionsJob::new(probe, log, Arc::new(NullWorkflow)));
    let queue = JobQueue::start(job, config.queue.workers, config.queue.capacity);
    let updater = Arc::new(SourceUpdater::new(config.repo.folder.clone()));

    let state = AppState {
        queue,
        updater,
        repo_folder: config.repo.folder.clone(),
        pull_on_push: config.repo.pull_on_push,
    };
    let router = webhook::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        addr = %addr,
        repo = %config.repo.folder.display(),
        log = %config.emissions_log.path.display(),
        "carbonwatch listening"
    );

    axum::serve(listener, router).await?;
    Ok(())
}
