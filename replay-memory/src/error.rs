//! Errors in the library.
use thiserror::Error;

/// Errors raised by replay memories and their circular buffers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplayError {
    /// A buffer was requested with capacity zero.
    #[error("Capacity must be positive")]
    ZeroCapacity,

    /// A batch larger than the number of stored transitions was requested.
    #[error("Requested batch of {requested} but only {available} transitions are stored")]
    Capacity {
        /// Requested batch size.
        requested: usize,

        /// Number of stored transitions.
        available: usize,
    },

    /// Sampling was requested from an empty memory.
    #[error("Cannot sample from an empty memory")]
    EmptyBuffer,

    /// An argument was not recognized or is out of its valid range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Priorities were updated without a matching, still valid sample.
    #[error("No valid sampled indices: call sample() again before update()")]
    StaleIndices,

    /// The number of errors does not match the last sampled batch.
    #[error("Expected {expected} values, got {actual}")]
    LengthMismatch {
        /// Size of the last sampled batch.
        expected: usize,

        /// Number of values given.
        actual: usize,
    },

    /// A logical index outside the stored elements.
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,

        /// Number of stored elements.
        len: usize,
    },
}
