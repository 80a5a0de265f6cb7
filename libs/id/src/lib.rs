//! # refit-id
//!
//! Typed references for objects owned by the container runtime.
//!
//! ## Design Principles
//!
//! - IDs are assigned by the runtime; refit never mints them
//! - All IDs have a canonical string representation with strict parsing
//! - IDs are typed so a container id cannot be passed where an image id is expected
//!
//! ## ID Format
//!
//! IDs are opaque strings. Image ids are usually content digests:
//!
//! - `4f1c0b8e9a7d...` (container)
//! - `sha256:9b2e6d1c...` (image)
//!
//! The `short()` form strips the digest algorithm and keeps the first
//! 12 characters, which is what operators see in runtime tooling.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use macros::SHORT_LEN;
pub use types::*;
