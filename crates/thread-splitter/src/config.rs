//! Limits applied when splitting a thread.

use serde::{Deserialize, Serialize};

use crate::error::{SplitError, SplitResult};

/// Default maximum weighted length of a single tweet.
pub const DEFAULT_MAX_TWEET_LENGTH: usize = 280;

/// Default maximum number of tweets in a thread.
pub const DEFAULT_MAX_THREAD_LENGTH: usize = 25;

/// Environment variable overriding [`SplitterConfig::max_tweet_length`].
pub const ENV_MAX_TWEET_LENGTH: &str = "THREAD_MAX_TWEET_LENGTH";

/// Environment variable overriding [`SplitterConfig::max_thread_length`].
pub const ENV_MAX_THREAD_LENGTH: &str = "THREAD_MAX_THREAD_LENGTH";

/// Splitter limits. Passed explicitly to every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SplitterConfig {
    /// Maximum weighted length of one tweet.
    pub max_tweet_length: usize,
    /// Maximum number of tweets in the thread.
    pub max_thread_length: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            max_tweet_length: DEFAULT_MAX_TWEET_LENGTH,
            max_thread_length: DEFAULT_MAX_THREAD_LENGTH,
        }
    }
}

impl SplitterConfig {
    /// Create a config with explicit limits.
    #[must_use]
    pub fn new(max_tweet_length: usize, max_thread_length: usize) -> Self {
        Self {
            max_tweet_length,
            max_thread_length,
        }
    }

    /// Set the per-tweet limit.
    #[must_use]
    pub fn with_max_tweet_length(mut self, max: usize) -> Self {
        self.max_tweet_length = max;
        self
    }

    /// Set the thread length limit.
    #[must_use]
    pub fn with_max_thread_length(mut self, max: usize) -> Self {
        self.max_thread_length = max;
        self
    }

    /// Load limits from the environment.
    ///
    /// # Optional Environment Variables
    /// - `THREAD_MAX_TWEET_LENGTH`: per-tweet weighted limit (default: 280)
    /// - `THREAD_MAX_THREAD_LENGTH`: maximum tweets per thread (default: 25)
    ///
    /// Missing or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let max_tweet_length = std::env::var(ENV_MAX_TWEET_LENGTH)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_TWEET_LENGTH);

        let max_thread_length = std::env::var(ENV_MAX_THREAD_LENGTH)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_THREAD_LENGTH);

        Self {
            max_tweet_length,
            max_thread_length,
        }
    }

    /// Reject limits no thread could satisfy.
    pub fn validate(&self) -> SplitResult<()> {
        if self.max_tweet_length == 0 {
            return Err(SplitError::InvalidConfig(
                "max_tweet_length must be greater than zero".to_string(),
            ));
        }
        if self.max_thread_length == 0 {
            return Err(SplitError::InvalidConfig(
                "max_thread_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
