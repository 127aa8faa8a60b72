//! Greedy packing of blocks into tweets.

use std::sync::LazyLock;

use regex::Regex;

use crate::truncate::truncate_with_ellipsis;
use crate::weighted::fits;

/// Sentence terminator: a punctuation run followed by whitespace or the end.
///
/// Abbreviations ("Mr.", "e.g. ") and decimals followed by a space are not
/// special-cased and will end a sentence.
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid sentence regex"));

/// Split text into sentences, keeping the punctuation with each sentence.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(text) {
        push_trimmed(&mut sentences, &text[start..m.end()]);
        start = m.end();
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}

/// Turn one normalized block into tweets.
///
/// Whole block if it fits, else sentence packing, else word packing.
#[must_use]
pub fn chunk_block(block: &str, max_len: usize) -> Vec<String> {
    if fits(block, max_len) {
        return vec![block.to_string()];
    }

    let sentences = split_sentences(block);
    if sentences.len() <= 1 {
        return chunk_by_words(block, max_len);
    }

    let mut packer = Packer::new(max_len);
    for sentence in sentences {
        if fits(&sentence, max_len) {
            packer.push(sentence);
        } else {
            packer.flush();
            packer.extend_flushed(chunk_by_words(&sentence, max_len));
        }
    }
    packer.finish()
}

/// Greedily pack space-separated words into tweets.
///
/// A word that cannot fit on its own is truncated with an ellipsis.
#[must_use]
pub fn chunk_by_words(text: &str, max_len: usize) -> Vec<String> {
    let mut packer = Packer::new(max_len);
    for word in text.split(' ').filter(|w| !w.is_empty()) {
        if fits(word, max_len) {
            packer.push(word.to_string());
        } else {
            tracing::debug!(max_len, "Truncating word longer than a tweet");
            packer.push(truncate_with_ellipsis(word, max_len));
        }
    }
    packer.finish()
}

/// Running buffer shared by sentence and word packing.
struct Packer {
    max_len: usize,
    buffer: String,
    tweets: Vec<String>,
}

impl Packer {
    fn new(max_len: usize) -> Self {
        Self {
            max_len,
            buffer: String::new(),
            tweets: Vec::new(),
        }
    }

    /// Append a piece that fits on its own, flushing first if needed.
    fn push(&mut self, piece: String) {
        if self.buffer.is_empty() {
            self.buffer = piece;
            return;
        }

        let candidate = format!("{} {piece}", self.buffer);
        if fits(&candidate, self.max_len) {
            self.buffer = candidate;
        } else {
            self.flush();
            self.buffer = piece;
        }
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.tweets.push(std::mem::take(&mut self.buffer));
        }
    }

    fn extend_flushed(&mut self, tweets: Vec<String>) {
        self.tweets.extend(tweets);
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.tweets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences_keeps_punctuation() {
        assert_eq!(
            split_sentences("One. Two?! Three"),
            vec!["One.", "Two?!", "Three"]
        );
    }

    #[test]
    fn test_split_sentences_ignores_inner_dots() {
        assert_eq!(split_sentences("Visit x.com today."), vec!["Visit x.com today."]);
        assert_eq!(split_sentences("Pi is 3.14 roughly"), vec!["Pi is 3.14 roughly"]);
    }

    #[test]
    fn test_split_sentences_over_splits_abbreviations() {
        assert_eq!(
            split_sentences("Mr. Smith went home."),
            vec!["Mr.", "Smith went home."]
        );
    }

    #[test]
    fn test_fitting_block_is_one_tweet() {
        assert_eq!(chunk_block("Hello there. General.", 280), vec!["Hello there. General."]);
    }

    #[test]
    fn test_packs_sentences_greedily() {
        // Each sentence is 9 chars; two joined are 19.
        let block = "Aaaa bbb. Cccc ddd. Eeee fff.";
        assert_eq!(
            chunk_block(block, 20),
            vec!["Aaaa bbb. Cccc ddd.", "Eeee fff."]
        );
    }

    #[test]
    fn test_single_sentence_falls_back_to_words() {
        let block = "alpha beta gamma delta";
        assert_eq!(chunk_block(block, 11), vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn test_overlong_sentence_is_word_chunked_in_place() {
        let block = "Short. alpha beta gamma delta epsilon. End.";
        let tweets = chunk_block(block, 16);
        assert_eq!(
            tweets,
            vec!["Short.", "alpha beta gamma", "delta epsilon.", "End."]
        );
    }

    #[test]
    fn test_overlong_word_is_truncated() {
        let word = "x".repeat(30);
        let tweets = chunk_by_words(&format!("tiny {word} end"), 10);
        assert_eq!(tweets, vec!["tiny", "xxxxxxx...", "end"]);
    }
}
