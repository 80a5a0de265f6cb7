//! Update run actions.
//!
//! A run goes through these stages, in order:
//!
//! ```text
//! list -> staleness -> sort -> links -> restart (batch | rolling) -> cleanup
//! ```
//!
//! Only a listing failure or a dependency cycle aborts a run. Every other
//! failure is confined to the container it happened on.

mod check;
mod cleanup;
mod links;
mod restart;
mod staleness;
mod update;

pub use check::check_for_multiple_instances;
pub use update::{UpdateReport, Updater};
