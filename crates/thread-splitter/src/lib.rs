//! X/Twitter thread splitter.
//!
//! Turns long-form prose into an ordered thread of tweets. The splitter:
//!
//! - counts length the way the platform does (see [`weighted`] and [`urls`])
//! - keeps list items and paragraphs together where it can (see [`blocks`])
//! - falls back to sentence and then word packing (see [`chunk`])
//! - truncates single oversized words on grapheme boundaries (see [`truncate`])
//! - refuses to silently drop content when the thread is too long
//!
//! # Usage
//!
//! ```
//! use thread_splitter::{split_x_thread, SplitterConfig};
//!
//! let tweets = split_x_thread("- Alpha\n- Beta\n- Gamma", &SplitterConfig::default()).unwrap();
//! assert_eq!(tweets, vec!["Alpha", "Beta", "Gamma"]);
//! ```
//!
//! All functions are pure and synchronous; limits are passed explicitly.

pub mod blocks;
pub mod chunk;
pub mod config;
pub mod error;
pub mod splitter;
mod tld;
pub mod truncate;
pub mod urls;
pub mod weighted;

pub use blocks::{BlockKind, BlockMode, ListStyle};
pub use config::SplitterConfig;
pub use error::{SplitError, SplitResult};
pub use splitter::{split_x_thread, split_x_thread_with_stats, ThreadStats};
pub use truncate::truncate_with_ellipsis;
pub use urls::url_spans;
pub use weighted::{fits, weighted_length};
