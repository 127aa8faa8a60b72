//! Error types for thread splitting.

use thiserror::Error;

/// Errors returned by [`split_x_thread`](crate::split_x_thread).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// Nothing survived normalization (empty or whitespace-only input).
    #[error("Thread splitting produced no valid tweets")]
    NoTweets,

    /// The source needs more tweets than the configured maximum.
    #[error("Thread too long: {actual} tweets (max {max})")]
    ThreadTooLong { actual: usize, max: usize },

    /// A limit in [`SplitterConfig`](crate::SplitterConfig) is unusable.
    #[error("Invalid splitter configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for splitter operations.
pub type SplitResult<T> = Result<T, SplitError>;
