//! Structural block detection.
//!
//! The whole input is classified once: either it is a list (numbered or
//! bulleted) and every list item becomes a block, or it is prose and every
//! paragraph becomes a block. Blocks are the boundaries the splitter tries
//! hardest to keep.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Matching lines required before the input is treated as a list.
///
/// A single "1." or "-" line is far more often prose than a list.
pub const MIN_LIST_LINES: usize = 2;

static NUMBERED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\s*[./]\s+").expect("valid numbered prefix regex"));

/// A leading `1.`/`1/` prefix, or a `1/ ` marker anywhere in the line
/// ("🧵 1/ Hook").
static NUMBERED_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d+\s*[./]\s+|\d+\s*/\s+").expect("valid numbered marker regex")
});

static BULLET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*•]\s+").expect("valid bullet prefix regex"));

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n+").expect("valid paragraph break regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Kind of list prefix that drives list mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    /// `1.` / `1/` prefixes.
    Numbered,
    /// `-` / `*` / `•` prefixes.
    Bulleted,
}

impl ListStyle {
    fn prefix(self) -> &'static Regex {
        match self {
            Self::Numbered => &NUMBERED_MARKER,
            Self::Bulleted => &BULLET_PREFIX,
        }
    }
}

/// How the whole input is divided into blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "mode", content = "style")]
pub enum BlockMode {
    List(ListStyle),
    Paragraph,
}

/// What a block was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    ListItem,
    Paragraph,
}

/// A whitespace-normalized unit of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

/// Whether `line` starts with a numbered list prefix such as `1.` or `2/`,
/// or carries a `2/ ` marker after some lead-in.
#[must_use]
pub fn is_numbered_line(line: &str) -> bool {
    NUMBERED_MARKER.is_match(line)
}

/// Whether `line` starts with a bullet prefix (`-`, `*` or `•`).
#[must_use]
pub fn is_bulleted_line(line: &str) -> bool {
    BULLET_PREFIX.is_match(line)
}

/// Convert CRLF and lone CR line endings to LF.
#[must_use]
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Classify the input. Numbered lists win over bulleted ones.
#[must_use]
pub fn detect_mode(text: &str) -> BlockMode {
    let numbered = text.lines().filter(|l| is_numbered_line(l)).count();
    if numbered >= MIN_LIST_LINES {
        return BlockMode::List(ListStyle::Numbered);
    }

    let bulleted = text.lines().filter(|l| is_bulleted_line(l)).count();
    if bulleted >= MIN_LIST_LINES {
        return BlockMode::List(ListStyle::Bulleted);
    }

    BlockMode::Paragraph
}

/// Split the input into normalized, non-empty blocks, in reading order.
#[must_use]
pub fn split_blocks(text: &str) -> (BlockMode, Vec<Block>) {
    let normalized = normalize_line_endings(text);
    let trimmed = normalized.trim();
    let mode = detect_mode(trimmed);

    let raw = match mode {
        BlockMode::List(style) => list_blocks(trimmed, style),
        BlockMode::Paragraph => PARAGRAPH_BREAK
            .split(trimmed)
            .map(|p| (BlockKind::Paragraph, p.to_string()))
            .collect(),
    };

    let blocks: Vec<Block> = raw
        .into_iter()
        .filter_map(|(kind, text)| {
            let text = strip_list_prefix(&collapse_whitespace(&text));
            (!text.is_empty()).then_some(Block { kind, text })
        })
        .collect();

    tracing::debug!(?mode, blocks = blocks.len(), "Detected thread blocks");
    (mode, blocks)
}

/// Each prefixed line opens a new block; other lines (blank ones included)
/// continue the current one. Text before the first item is its own block.
///
/// Only the marker itself is cut, so a lead-in such as an emoji survives.
fn list_blocks(text: &str, style: ListStyle) -> Vec<(BlockKind, String)> {
    let prefix = style.prefix();
    let mut blocks = Vec::new();
    let mut kind = BlockKind::Paragraph;
    let mut lines: Vec<String> = Vec::new();

    for line in text.lines() {
        if let Some(m) = prefix.find(line) {
            if !lines.is_empty() {
                blocks.push((kind, lines.join("\n")));
            }
            kind = BlockKind::ListItem;
            lines = vec![format!("{}{}", &line[..m.start()], &line[m.end()..])];
        } else {
            lines.push(line.to_string());
        }
    }
    if !lines.is_empty() {
        blocks.push((kind, lines.join("\n")));
    }

    blocks
}

/// Collapse whitespace runs (newlines included) to single spaces and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Remove one leading numbered or bullet prefix. Mid-line markers are left
/// alone, so prose like "open 24/ 7" keeps its digits.
#[must_use]
pub fn strip_list_prefix(text: &str) -> String {
    let text = NUMBERED_PREFIX.replace(text, "");
    BULLET_PREFIX.replace(&text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(|b| b.text.as_str()).collect()
    }

    #[test]
    fn test_line_predicates() {
        assert!(is_numbered_line("1/ First"));
        assert!(is_numbered_line("  12. Twelfth"));
        assert!(is_numbered_line("3 / spaced"));
        assert!(is_numbered_line("🧵 1/ Hook"));
        assert!(!is_numbered_line("Open 24/7"));
        assert!(!is_numbered_line("1.5 million users"));
        assert!(!is_numbered_line("(1) parenthetical"));

        assert!(is_bulleted_line("- dash"));
        assert!(is_bulleted_line("* star"));
        assert!(is_bulleted_line("• dot"));
        assert!(!is_bulleted_line("-no space"));
    }

    #[test]
    fn test_single_numbered_line_stays_paragraph() {
        assert_eq!(detect_mode("1. Only one\nand more prose"), BlockMode::Paragraph);
    }

    #[test]
    fn test_numbered_beats_bulleted() {
        let text = "- a\n- b\n1. one\n2. two";
        assert_eq!(detect_mode(text), BlockMode::List(ListStyle::Numbered));
    }

    #[test]
    fn test_bulleted_mode() {
        let (mode, blocks) = split_blocks("- Alpha\n- Beta\n- Gamma");
        assert_eq!(mode, BlockMode::List(ListStyle::Bulleted));
        assert_eq!(texts(&blocks), vec!["Alpha", "Beta", "Gamma"]);
        assert!(blocks.iter().all(|b| b.kind == BlockKind::ListItem));
    }

    #[test]
    fn test_list_keeps_continuation_and_blank_lines_in_item() {
        let text = "Intro line\n1/ First\ncontinues here\n\nstill first\n2/ Second";
        let (_, blocks) = split_blocks(text);
        assert_eq!(
            texts(&blocks),
            vec!["Intro line", "First continues here still first", "Second"]
        );
        assert_eq!(blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(blocks[1].kind, BlockKind::ListItem);
    }

    #[test]
    fn test_mid_line_markers_open_items() {
        let (mode, blocks) = split_blocks("🧵 1/ Why remote works\n2/ Async by default");
        assert_eq!(mode, BlockMode::List(ListStyle::Numbered));
        assert_eq!(texts(&blocks), vec!["🧵 Why remote works", "Async by default"]);
    }

    #[test]
    fn test_single_mid_line_marker_stays_prose() {
        let (mode, blocks) = split_blocks("We answer 24/ 7.\n\nEven on holidays.");
        assert_eq!(mode, BlockMode::Paragraph);
        assert_eq!(texts(&blocks), vec!["We answer 24/ 7.", "Even on holidays."]);
    }

    #[test]
    fn test_paragraph_mode_splits_on_blank_lines() {
        let text = "First para\nwrapped line.\n\n  \n\nSecond   para.";
        let (mode, blocks) = split_blocks(text);
        assert_eq!(mode, BlockMode::Paragraph);
        assert_eq!(texts(&blocks), vec!["First para wrapped line.", "Second para."]);
    }

    #[test]
    fn test_crlf_input() {
        let (_, blocks) = split_blocks("1. one\r\n2. two\r\n");
        assert_eq!(texts(&blocks), vec!["one", "two"]);
    }

    #[test]
    fn test_blank_input_has_no_blocks() {
        let (_, blocks) = split_blocks(" \n\n \t ");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_strip_list_prefix_is_defensive() {
        assert_eq!(strip_list_prefix("1. text"), "text");
        assert_eq!(strip_list_prefix("- text"), "text");
        assert_eq!(strip_list_prefix("plain text"), "plain text");
    }
}
