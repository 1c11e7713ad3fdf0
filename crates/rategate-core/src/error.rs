//! Error types for the repository boundary.

use thiserror::Error;

/// Errors surfaced by `BaselineRepository` implementations.
///
/// Selection and derivation themselves never fail through this type:
/// no-match and ambiguity are ordinary `SelectionResult` states, and
/// derivation inputs are validated at `DerivationContext` construction.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no baseline bucket for footprint {footprint}")]
    FootprintNotFound { footprint: String },

    #[error("malformed baseline record {filename}: {reason}")]
    MalformedRecord { filename: String, reason: String },

    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
