//! `ppscc-worker` -- recomputes quarterly emission deviations.
//!
//! Reads the fixture files, recalculates every vessel's deviation from its
//! minimum baseline for one year and prints the stored deviations as JSON on
//! stdout. Configuration is documented on
//! [`WorkerConfig::from_env`](ppscc_worker::config::WorkerConfig::from_env).

use std::process::ExitCode;

use ppscc_worker::config::WorkerConfig;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ppscc_worker=info,ppscc_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match WorkerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        data_dir = %config.data_dir.display(),
        year = config.year,
        metric = %config.metric,
        "Starting ppscc-worker",
    );

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received SIGINT (Ctrl-C), stopping after current vessel");
                signal_cancel.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "Failed to install Ctrl-C handler"),
        }
    });

    let report = match ppscc_worker::run(&config, &cancel).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Recalculation failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report.deviations) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize deviations");
            return ExitCode::FAILURE;
        }
    }

    if report.summary.cancelled {
        ExitCode::from(130)
    } else {
        ExitCode::SUCCESS
    }
}
