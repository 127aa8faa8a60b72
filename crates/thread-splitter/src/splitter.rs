//! Thread splitting entry points.

use serde::Serialize;

use crate::blocks::{split_blocks, BlockKind, BlockMode};
use crate::chunk::chunk_block;
use crate::config::SplitterConfig;
use crate::error::{SplitError, SplitResult};
use crate::truncate::truncate_with_ellipsis;
use crate::weighted::weighted_length;

/// A split thread together with how it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadStats {
    /// Tweets in reading order.
    pub tweets: Vec<String>,
    /// Weighted length of each tweet.
    pub weighted_lengths: Vec<usize>,
    /// Kind of block each tweet was cut from.
    pub kinds: Vec<BlockKind>,
    /// Block mode chosen for the input.
    pub mode: BlockMode,
}

/// Split `content` into an ordered thread of tweets.
///
/// Every tweet is non-empty and within `config.max_tweet_length` weighted
/// characters. Fails rather than dropping content when the thread would
/// exceed `config.max_thread_length`.
pub fn split_x_thread(content: &str, config: &SplitterConfig) -> SplitResult<Vec<String>> {
    split_x_thread_with_stats(content, config).map(|stats| stats.tweets)
}

/// Same as [`split_x_thread`] but also reports lengths and the block mode.
pub fn split_x_thread_with_stats(
    content: &str,
    config: &SplitterConfig,
) -> SplitResult<ThreadStats> {
    config.validate()?;
    let max_len = config.max_tweet_length;

    let (mode, blocks) = split_blocks(content);
    let (tweets, kinds): (Vec<String>, Vec<BlockKind>) = blocks
        .iter()
        .flat_map(|block| {
            chunk_block(&block.text, max_len)
                .into_iter()
                .map(move |tweet| (tweet, block.kind))
        })
        .unzip();

    if tweets.is_empty() {
        return Err(SplitError::NoTweets);
    }
    if tweets.len() > config.max_thread_length {
        tracing::debug!(
            tweets = tweets.len(),
            max = config.max_thread_length,
            "Thread exceeds maximum length"
        );
        return Err(SplitError::ThreadTooLong {
            actual: tweets.len(),
            max: config.max_thread_length,
        });
    }

    // Last line of defense: nothing over the limit leaves this function.
    let tweets: Vec<String> = tweets
        .iter()
        .map(|tweet| truncate_with_ellipsis(tweet, max_len))
        .collect();
    let weighted_lengths = tweets.iter().map(|t| weighted_length(t)).collect();

    tracing::debug!(tweets = tweets.len(), ?mode, "Split thread");
    Ok(ThreadStats {
        tweets,
        weighted_lengths,
        kinds,
        mode,
    })
}
