use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xdg_trash::interfaces::cli::{self, Cli};
use xdg_trash::{AppConfig, EmptyTrashService, SystemClock, SystemInfoService, TrashFsRepository};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    cli.apply(&mut config);

    // stdout carries the report, logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(
        data_home = ?config.trash.data_home,
        scan_volumes = config.trash.scan_volumes,
        "Configuration loaded"
    );

    let service = EmptyTrashService::from_config(
        Arc::new(TrashFsRepository::new()),
        Arc::new(SystemInfoService::new()),
        Arc::new(SystemClock),
        &config.trash,
    );

    let mut out = std::io::stdout().lock();
    let mut err = std::io::stderr();
    let code = cli::empty_trash(&service, &cli, &mut out, &mut err).await;

    ExitCode::from(code)
}
