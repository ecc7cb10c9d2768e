//! Unified error types for the cactus-core crate.
//!
//! All public-facing errors are collected here so callers can match on a
//! single enum.

use thiserror::Error;

/// Top-level error type for the cactus-core crate.
#[derive(Error, Debug)]
pub enum CactusError {
    /// A structural assertion failed: orientation mismatch, end without a
    /// block, non-involutive reverse companion, and similar. Fatal — the
    /// object graph should be considered corrupt past this point.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A split point or coordinate fell outside the entity it was applied
    /// to (`splitEdge` with no containing edge, `block_split` with
    /// `splitPoint` outside `0..length`).
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// A required parent cap, end, or event was not found. Fatal for the
    /// containing operation; the caller may retry after repopulating the
    /// parent flower.
    #[error("missing entity: {0}")]
    MissingEntity(String),

    /// The matcher could not produce a perfect matching, or cyclic repair
    /// failed to converge to a single cycle per stub pair. Surfaced to
    /// callers as reference-building failure.
    #[error("reference building failed: {0}")]
    MatchingInfeasible(String),

    /// A tagged byte stream was truncated or carried an unrecognized tag.
    #[error("serialization corruption: {0}")]
    SerializationCorruption(String),

    /// I/O error from a `StringStore` implementation (file not found,
    /// permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error, used by the round-trip test helpers.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CactusError>;
