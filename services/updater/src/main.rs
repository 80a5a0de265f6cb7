//! refit
//!
//! Keeps running containers on their latest images.
//!
//! ## Architecture
//!
//! - **Sanity check**: Stops own containers left over from a previous self-update
//! - **Scheduler**: Runs an update pass on an interval
//! - **Updater**: Finds stale containers and replaces them in dependency order
//! - **Runtime**: Abstracts container operations (mock in dev)

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use refit_updater::config::Config;
use refit_updater::runtime::MockClient;
use refit_updater::scheduler::{Scheduler, SchedulerConfig};
use refit_updater::{check_for_multiple_instances, Client, Updater};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    config.validate()?;

    info!(
        names = ?config.names,
        interval_secs = config.interval,
        run_once = config.run_once,
        monitor_only = config.monitor_only,
        rolling_restart = config.rolling_restart,
        cleanup = config.cleanup,
        "Starting refit"
    );

    // Create the runtime (mock for now)
    let client: Arc<dyn Client> = Arc::new(MockClient::new());
    let params = config.update_params();

    check_for_multiple_instances(client.as_ref(), &params).await?;

    let updater = Updater::new(Arc::clone(&client), params);

    if config.run_once {
        let report = updater.update().await?;
        info!(
            scanned = report.scanned,
            updated = report.updated.len(),
            failed = report.failed.len(),
            "Single run finished"
        );
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = Scheduler::new(
        updater,
        SchedulerConfig {
            interval: config.interval(),
        },
    );
    let mut scheduler_handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    let shutdown_requested = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            true
        }
        result = &mut scheduler_handle => {
            if let Err(e) = result {
                error!(error = %e, "Update loop panicked");
            }
            false
        }
    };

    if shutdown_requested {
        // A run in progress finishes before the loop sees the signal.
        let _ = shutdown_tx.send(true);
        if let Err(e) = scheduler_handle.await {
            error!(error = %e, "Update loop panicked");
        }
    }

    info!("refit shutdown complete");
    Ok(())
}
