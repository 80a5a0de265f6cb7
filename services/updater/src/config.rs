//! Configuration for the updater.

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

use crate::filter::{build_filter, Filter};

/// Which lifecycle hooks are enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookToggles {
    pub pre_checks: bool,
    pub post_checks: bool,
    pub pre_update: bool,
    pub post_update: bool,
}

impl HookToggles {
    pub fn all() -> Self {
        Self {
            pre_checks: true,
            post_checks: true,
            pre_update: true,
            post_update: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// Options for a single update run.
#[derive(Debug, Clone)]
pub struct UpdateParams {
    /// Which containers the run looks at.
    pub filter: Filter,

    /// How long a stop may take before the runtime kills the container.
    pub timeout: Duration,

    /// Only report stale containers, never touch them.
    pub monitor_only: bool,

    /// Stop stale containers but leave starting them to someone else.
    pub no_restart: bool,

    /// Replace containers one at a time instead of stop-all then start-all.
    pub rolling_restart: bool,

    /// Remove superseded images after the run.
    pub cleanup: bool,

    pub hooks: HookToggles,
}

impl Default for UpdateParams {
    fn default() -> Self {
        Self {
            filter: Filter::all(),
            timeout: Duration::from_secs(10),
            monitor_only: false,
            no_restart: false,
            rolling_restart: false,
            cleanup: false,
            hooks: HookToggles::none(),
        }
    }
}

impl UpdateParams {
    /// Whether the container is going to be restarted in this run.
    pub fn will_restart(&self, container: &crate::container::Container) -> bool {
        container.is_stale() && !self.no_restart
    }
}

/// Updater configuration, from flags or `REFIT_*` environment variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "refit")]
#[command(author, version, about = "Keep running containers on their latest images", long_about = None)]
pub struct Config {
    /// Only watch these containers (default: all).
    #[arg(env = "REFIT_CONTAINERS", value_delimiter = ',')]
    pub names: Vec<String>,

    /// Seconds between update runs.
    #[arg(long, env = "REFIT_INTERVAL", default_value_t = 300)]
    pub interval: u64,

    /// Run once and exit.
    #[arg(long, env = "REFIT_RUN_ONCE")]
    pub run_once: bool,

    /// Report stale containers without updating them.
    #[arg(long, env = "REFIT_MONITOR_ONLY")]
    pub monitor_only: bool,

    /// Do not start containers after stopping them.
    #[arg(long, env = "REFIT_NO_RESTART")]
    pub no_restart: bool,

    /// Restart containers one at a time.
    #[arg(long, env = "REFIT_ROLLING_RESTART")]
    pub rolling_restart: bool,

    /// Remove old images after updating.
    #[arg(long, env = "REFIT_CLEANUP")]
    pub cleanup: bool,

    /// Run lifecycle hooks.
    #[arg(long, env = "REFIT_LIFECYCLE_HOOKS")]
    pub enable_lifecycle_hooks: bool,

    /// Only watch containers labelled `io.refit.enable=true`.
    #[arg(long, env = "REFIT_LABEL_ENABLE")]
    pub label_enable: bool,

    /// Seconds to wait for a container to stop.
    #[arg(long, env = "REFIT_STOP_TIMEOUT", default_value_t = 10)]
    pub stop_timeout: u64,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "REFIT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.interval == 0 {
            bail!("interval must be at least one second");
        }
        if self.stop_timeout == 0 {
            bail!("stop timeout must be at least one second");
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn update_params(&self) -> UpdateParams {
        UpdateParams {
            filter: build_filter(&self.names, self.label_enable),
            timeout: Duration::from_secs(self.stop_timeout),
            monitor_only: self.monitor_only,
            no_restart: self.no_restart,
            rolling_restart: self.rolling_restart,
            cleanup: self.cleanup,
            hooks: if self.enable_lifecycle_hooks {
                HookToggles::all()
            } else {
                HookToggles::none()
            },
        }
    }
}
