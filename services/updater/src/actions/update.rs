//! Top-level update run.

use std::sync::Arc;

use refit_id::ImageId;
use tracing::{debug, info, instrument};

use super::links::propagate_links;
use super::restart::Restarter;
use super::staleness::resolve_staleness;
use crate::config::UpdateParams;
use crate::error::UpdateError;
use crate::lifecycle::{LifecycleHooks, NoopHooks};
use crate::runtime::Client;
use crate::sorter::{DependencySorter, LinkSorter};

/// Summary of one update run.
///
/// Per-container failures show up here and in the logs; they do not make
/// the run itself fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Containers matched by the filter.
    pub scanned: usize,
    /// Containers found running an outdated image.
    pub stale: Vec<String>,
    /// Containers demoted to not stale because their state was uncertain.
    pub skipped: Vec<String>,
    /// Containers linking to a restarting container.
    pub linked: Vec<String>,
    /// Containers replaced successfully.
    pub updated: Vec<String>,
    /// Stale containers that could not be replaced.
    pub failed: Vec<String>,
    /// Superseded images that were removed.
    pub removed_images: Vec<ImageId>,
}

/// Drives update runs against a runtime.
pub struct Updater {
    client: Arc<dyn Client>,
    hooks: Arc<dyn LifecycleHooks>,
    sorter: Box<dyn DependencySorter>,
    params: UpdateParams,
}

impl Updater {
    /// Create an updater with no-op hooks and link-based ordering.
    pub fn new(client: Arc<dyn Client>, params: UpdateParams) -> Self {
        Self {
            client,
            hooks: Arc::new(NoopHooks),
            sorter: Box::new(LinkSorter),
            params,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn LifecycleHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_sorter(mut self, sorter: Box<dyn DependencySorter>) -> Self {
        self.sorter = sorter;
        self
    }

    /// Perform one update run.
    ///
    /// Fails only if containers cannot be listed or cannot be ordered. In
    /// both cases nothing has been stopped or started.
    #[instrument(skip(self), fields(rolling = self.params.rolling_restart, monitor_only = self.params.monitor_only))]
    pub async fn update(&self) -> Result<UpdateReport, UpdateError> {
        debug!("Checking containers for updated images");
        let params = &self.params;

        if params.hooks.pre_checks {
            self.hooks.pre_checks().await;
        }

        let mut containers = self
            .client
            .list_containers(&params.filter)
            .await
            .map_err(|e| UpdateError::List(e.to_string()))?;

        let mut report = UpdateReport {
            scanned: containers.len(),
            ..UpdateReport::default()
        };

        report.skipped = resolve_staleness(self.client.as_ref(), &mut containers, params).await;

        let mut containers = self.sorter.sort(containers)?;

        propagate_links(&mut containers, params);

        report.stale = containers
            .iter()
            .filter(|c| c.is_stale())
            .map(|c| c.name().to_string())
            .collect();
        report.linked = containers
            .iter()
            .filter(|c| c.is_linked())
            .map(|c| c.name().to_string())
            .collect();

        if params.monitor_only {
            for name in &report.stale {
                info!(container = %name, "Found new image (monitor only)");
            }
            if params.hooks.post_checks {
                self.hooks.post_checks().await;
            }
            return Ok(report);
        }

        let restarter = Restarter::new(self.client.as_ref(), self.hooks.as_ref(), params);
        let outcome = if params.rolling_restart {
            restarter.rolling(&containers).await
        } else {
            restarter.batch(&containers).await
        };

        report.updated = outcome.updated;
        report.failed = outcome.failed;
        report.removed_images = outcome.removed_images;

        if params.hooks.post_checks {
            self.hooks.post_checks().await;
        }

        info!(
            scanned = report.scanned,
            updated = report.updated.len(),
            failed = report.failed.len(),
            "Update run complete"
        );

        Ok(report)
    }
}
