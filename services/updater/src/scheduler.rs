//! Periodic update loop.
//!
//! Runs are awaited one after another, so two runs never overlap against
//! the same containers.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use crate::actions::Updater;

/// Scheduler configuration.
pub struct SchedulerConfig {
    /// Interval between update runs.
    pub interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
        }
    }
}

/// Runs the updater on an interval until shutdown.
pub struct Scheduler {
    updater: Updater,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(updater: Updater, config: SchedulerConfig) -> Self {
        Self { updater, config }
    }

    /// Run update passes until shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.config.interval.as_secs(),
            "Starting update loop"
        );

        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.updater.update().await {
                        error!(error = %e, "Update run failed");
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Update loop shutting down");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::UpdateParams;
    use crate::runtime::{Call, MockClient};

    #[test]
    fn test_scheduler_config_default() {
        let config = SchedulerConfig::default();
        assert_eq!(config.interval, Duration::from_secs(300));
    }

    fn scheduler(client: Arc<MockClient>, interval: Duration) -> Scheduler {
        Scheduler::new(
            Updater::new(client, UpdateParams::default()),
            SchedulerConfig { interval },
        )
    }

    fn list_calls(client: &MockClient) -> usize {
        client.calls().iter().filter(|c| **c == Call::List).count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_every_interval_until_shutdown() {
        let client = Arc::new(MockClient::new());
        let scheduler = scheduler(client.clone(), Duration::from_secs(10));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

        // Paused clock: the sleep auto-advances past the ticks at 0s, 10s and 20s.
        tokio::time::sleep(Duration::from_secs(25)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(list_calls(&client), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_run_does_not_stop_loop() {
        let client = Arc::new(MockClient::failing());
        let scheduler = scheduler(client.clone(), Duration::from_secs(5));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

        tokio::time::sleep(Duration::from_secs(12)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        // Ticks at 0s, 5s and 10s, each failing at listing.
        assert_eq!(list_calls(&client), 3);
    }
}
