//! refit Updater Library
//!
//! The updater watches running containers and replaces the ones whose image
//! has been superseded. Replacement respects container links: a container
//! is only restarted after the containers it links to, and stopped before
//! them.
//!
//! ## Architecture
//!
//! ```text
//! Scheduler
//! └── Updater::update           (one run)
//!     ├── staleness             (ask the runtime which images are outdated)
//!     ├── DependencySorter      (order by links)
//!     ├── links                 (flag dependents of restarting containers)
//!     ├── restart               (batch or rolling, incl. self-replacement)
//!     └── cleanup               (remove superseded images)
//! ```
//!
//! ## Modules
//!
//! - `actions`: Update runs and the startup sanity check
//! - `runtime`: Container runtime interface and mock
//! - `lifecycle`: Hook interface invoked at run checkpoints

pub mod actions;
pub mod config;
pub mod container;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod runtime;
pub mod scheduler;
pub mod sorter;
pub mod util;

// Re-export commonly used types
pub use actions::{check_for_multiple_instances, UpdateReport, Updater};
pub use config::{HookToggles, UpdateParams};
pub use container::{Container, ImageInfo};
pub use error::UpdateError;
pub use filter::Filter;
pub use lifecycle::{LifecycleHooks, NoopHooks};
pub use runtime::{Client, MockClient};
