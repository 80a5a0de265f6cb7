//! Restart strategies.
//!
//! Both strategies walk the dependency-sorted containers:
//!
//! - **Batch**: stop every stale container in reverse order, then start
//!   them all in sorted order. All stale containers are down at once.
//! - **Rolling**: in reverse order, stop and immediately start each stale
//!   container. Only one container is down at a time.
//!
//! The updater's own container is never stopped. It is renamed out of the
//! way and its replacement is started under the original name.

use std::collections::BTreeSet;

use refit_id::{ContainerId, ImageId};
use tracing::{debug, error, info};

use super::cleanup::remove_images;
use crate::config::UpdateParams;
use crate::container::Container;
use crate::lifecycle::LifecycleHooks;
use crate::runtime::Client;
use crate::util::rand_name;

/// What happened during a restart sweep.
#[derive(Debug, Default)]
pub(crate) struct RestartOutcome {
    pub updated: Vec<String>,
    pub failed: Vec<String>,
    pub removed_images: Vec<ImageId>,
}

/// Result of the stop step for one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopOutcome {
    Stopped,
    /// Own container; replaced without stopping.
    KeptRunning,
    /// Pre-update hook failed; container left untouched.
    Skipped,
    /// Stop reported an error; the start is still attempted.
    Failed,
}

impl StopOutcome {
    fn may_restart(self) -> bool {
        !matches!(self, StopOutcome::Skipped)
    }
}

pub(crate) struct Restarter<'a> {
    client: &'a dyn Client,
    hooks: &'a dyn LifecycleHooks,
    params: &'a UpdateParams,
}

impl<'a> Restarter<'a> {
    pub(crate) fn new(
        client: &'a dyn Client,
        hooks: &'a dyn LifecycleHooks,
        params: &'a UpdateParams,
    ) -> Self {
        Self {
            client,
            hooks,
            params,
        }
    }

    /// Stop all stale containers, then start them all.
    pub(crate) async fn batch(&self, containers: &[Container]) -> RestartOutcome {
        let mut stops: Vec<Option<StopOutcome>> = vec![None; containers.len()];
        for (i, container) in containers.iter().enumerate().rev() {
            if container.is_stale() {
                stops[i] = Some(self.stop_stale(container).await);
            }
        }

        let mut outcome = RestartOutcome::default();
        let mut cleanup = BTreeSet::new();
        for (container, stop) in containers.iter().zip(stops) {
            if let Some(stop) = stop {
                self.finish(container, stop, &mut outcome, &mut cleanup)
                    .await;
            }
        }

        self.cleanup(&mut outcome, &cleanup).await;
        outcome
    }

    /// Stop and start each stale container in turn.
    pub(crate) async fn rolling(&self, containers: &[Container]) -> RestartOutcome {
        let mut outcome = RestartOutcome::default();
        let mut cleanup = BTreeSet::new();

        for container in containers.iter().rev().filter(|c| c.is_stale()) {
            let stop = self.stop_stale(container).await;
            self.finish(container, stop, &mut outcome, &mut cleanup)
                .await;
        }

        self.cleanup(&mut outcome, &cleanup).await;
        outcome
    }

    async fn finish(
        &self,
        container: &Container,
        stop: StopOutcome,
        outcome: &mut RestartOutcome,
        cleanup: &mut BTreeSet<ImageId>,
    ) {
        if !stop.may_restart() {
            outcome.failed.push(container.name().to_string());
            return;
        }

        if self.params.no_restart {
            debug!(container = %container.name(), "Restart disabled, leaving container stopped");
            return;
        }

        match self.restart_stale(container).await {
            Some(_) => {
                cleanup.insert(container.image_id().clone());
                outcome.updated.push(container.name().to_string());
            }
            None => outcome.failed.push(container.name().to_string()),
        }
    }

    async fn stop_stale(&self, container: &Container) -> StopOutcome {
        if container.is_self() {
            debug!(container = %container.name(), "Own container is replaced without stopping");
            return StopOutcome::KeptRunning;
        }

        if self.params.hooks.pre_update {
            if let Err(e) = self.hooks.pre_update(container).await {
                error!(container = %container.name(), error = %e, "Pre-update hook failed");
                info!(container = %container.name(), "Skipping container as the pre-update hook failed");
                return StopOutcome::Skipped;
            }
        }

        match self
            .client
            .stop_container(container, self.params.timeout)
            .await
        {
            Ok(()) => {
                info!(
                    container = %container.name(),
                    id = %container.id().short(),
                    "Stopped container"
                );
                StopOutcome::Stopped
            }
            Err(e) => {
                error!(container = %container.name(), error = %e, "Failed to stop container");
                StopOutcome::Failed
            }
        }
    }

    async fn restart_stale(&self, container: &Container) -> Option<ContainerId> {
        // The old own container keeps running until the new one takes over,
        // so it has to give up its name first.
        if container.is_self() {
            let temp_name = rand_name();
            if let Err(e) = self.client.rename_container(container, &temp_name).await {
                error!(container = %container.name(), error = %e, "Failed to rename own container");
                return None;
            }
            info!(container = %container.name(), temp_name = %temp_name, "Renamed own container");
        }

        match self.client.start_container(container).await {
            Ok(new_id) => {
                info!(
                    container = %container.name(),
                    new_id = %new_id.short(),
                    image = container.image_info().map(|i| i.name.as_str()).unwrap_or_default(),
                    "Started container"
                );
                if self.params.hooks.post_update {
                    self.hooks.post_update(&new_id).await;
                }
                Some(new_id)
            }
            Err(e) => {
                error!(container = %container.name(), error = %e, "Failed to start container");
                None
            }
        }
    }

    async fn cleanup(&self, outcome: &mut RestartOutcome, image_ids: &BTreeSet<ImageId>) {
        if self.params.cleanup {
            outcome.removed_images = remove_images(self.client, image_ids).await;
        }
    }
}
