//! Normalization applied to user text before it is embedded in a prompt.

use std::sync::LazyLock;

use regex::Regex;

/// Invisible characters commonly used to split up trigger phrases.
pub const ZERO_WIDTH_CHARS: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline regex"));

/// Remove zero-width characters.
#[must_use]
pub fn strip_zero_width(text: &str) -> String {
    text.chars().filter(|c| !ZERO_WIDTH_CHARS.contains(c)).collect()
}

/// Strip zero-width characters, cap blank-line runs at one, and trim.
///
/// Total and idempotent.
#[must_use]
pub fn sanitize_user_input(text: &str) -> String {
    let stripped = strip_zero_width(text);
    EXCESS_NEWLINES
        .replace_all(&stripped, "\n\n")
        .trim()
        .to_string()
}
