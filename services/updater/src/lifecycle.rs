//! Lifecycle hook interface.
//!
//! Hooks run at fixed checkpoints of an update run. What a hook actually
//! executes is up to the implementation; the updater only observes whether
//! the pre-update hook succeeded.

use anyhow::Result;
use async_trait::async_trait;
use refit_id::ContainerId;
use tracing::debug;

use crate::container::Container;

/// Lifecycle hook interface.
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    /// Runs once before containers are listed.
    async fn pre_checks(&self);

    /// Runs once at the end of a run.
    async fn post_checks(&self);

    /// Runs before a stale container is stopped. An error keeps the
    /// container running untouched.
    async fn pre_update(&self, container: &Container) -> Result<()>;

    /// Runs after the replacement container has started.
    async fn post_update(&self, new_id: &ContainerId);
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

#[async_trait]
impl LifecycleHooks for NoopHooks {
    async fn pre_checks(&self) {
        debug!("No pre-check hook configured");
    }

    async fn post_checks(&self) {
        debug!("No post-check hook configured");
    }

    async fn pre_update(&self, _container: &Container) -> Result<()> {
        Ok(())
    }

    async fn post_update(&self, _new_id: &ContainerId) {}
}
