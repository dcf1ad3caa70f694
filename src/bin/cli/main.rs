use anyhow::{Context, Result};
use clap::Parser;
use snapshot_retention::{
    adapters::inbound::cli::{Cli, Command, ReportPrinter},
    app::AppBuilder,
    ports::services::RetentionService,
};
use std::io::{self, Write};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(cli: &Cli) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .with(cli.log_filter())
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli);

    // Everything is validated before the first provider call
    let volume = cli.volume_id()?;
    let region = cli.region()?;
    let config = cli.to_app_config()?;
    let policy = cli.policy();

    let shutdown = CancellationToken::new();
    let services = AppBuilder::new()
        .with_config(config)
        .with_cancellation(shutdown.clone())
        .build()
        .context("Failed to build application")?;

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, letting in-flight deletes finish");
                shutdown.cancel();
            }
        }
    });

    info!(volume = %volume, region = %region, command = ?cli.command(), "Starting snapshot management");

    let printer = ReportPrinter::new(cli.quiet, cli.verbose, cli.format);
    let service = &services.retention_service;
    let mut out = io::stdout();
    let mut succeeded = true;

    printer.print_settings(&mut out, &volume, &region, &policy)?;

    if matches!(cli.command(), Command::Snapshot | Command::Backup) {
        match service
            .take_snapshot(&volume, cli.description.as_deref(), policy.dry_run)
            .await
        {
            Ok(creation) => printer.print_creation(&mut out, &creation)?,
            Err(e) if cli.command() == Command::Backup => {
                warn!(error = %e, "Snapshot could not be initiated, continuing with cleanup");
                succeeded = false;
            }
            Err(e) => return Err(e.into()),
        }
    }

    match cli.command() {
        Command::Cleanup | Command::Backup => {
            let report = service
                .cleanup(&volume, &policy)
                .await
                .context("Cleanup failed")?;
            printer.print_cleanup(&mut out, &report)?;
            succeeded &= report.is_complete();
        }
        Command::Plan => {
            let plan = service.preview(&volume, &policy).await?;
            printer.print_plan(&mut out, &plan)?;
        }
        Command::Snapshot => {}
    }

    out.flush()?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}
