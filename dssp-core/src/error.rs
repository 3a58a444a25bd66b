//! Structured error types for secondary structure assignment.

use thiserror::Error;

/// Unified error type for all dssp operations.
#[derive(Debug, Error)]
pub enum DsspError {
    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A connectivity record names a residue that is not part of the
    /// retained residue set.
    #[error("missing residue: {0}")]
    MissingResidue(String),

    /// Lookup of a residue that was not assigned.
    #[error("not found: {0}")]
    NotFound(String),

    /// Disulfide information requested for, or attached to, a residue that
    /// is not a cysteine.
    #[error("not a cysteine: {0}")]
    NotCysteine(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, DsspError>;
