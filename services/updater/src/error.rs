//! Error types for update runs.

use refit_sort::SortError;
use thiserror::Error;

/// Errors that abort an entire update run.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Containers could not be listed.
    #[error("failed to list containers: {0}")]
    List(String),

    /// The link graph has a cycle.
    #[error("cannot order containers: {0}")]
    Cycle(#[from] SortError),
}

/// Reasons a single container is demoted to not stale.
///
/// These are logged and never abort a run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StalenessError {
    /// The runtime could not tell whether the image is outdated.
    #[error("staleness check failed: {0}")]
    Query(String),

    /// The container is stale but cannot be recreated safely.
    #[error("no available image info")]
    NoImageInfo,
}

impl UpdateError {
    /// Returns true if the run failed because of a dependency cycle.
    pub fn is_cycle(&self) -> bool {
        matches!(self, UpdateError::Cycle(_))
    }
}
