//! Error types for ID parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating IDs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The ID string is empty.
    #[error("ID cannot be empty")]
    Empty,

    /// The ID contains whitespace or a control character.
    #[error("invalid character {found:?} at position {position}")]
    InvalidCharacter { found: char, position: usize },

    /// The ID has a digest algorithm but no digest.
    #[error("digest missing after algorithm '{algorithm}'")]
    MissingDigest { algorithm: String },
}
