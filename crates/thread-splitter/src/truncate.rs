//! Grapheme-safe truncation.

use unicode_segmentation::UnicodeSegmentation;

use crate::weighted::fits;

/// Suffix appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Shorten `text` to fit within `max_len` weighted characters, ending in `...`.
///
/// Text that already fits is returned unchanged, so this is safe to apply
/// twice. Cuts only on extended grapheme cluster boundaries, so emoji
/// sequences and combining marks are never split. When `max_len` leaves no
/// room for anything but the ellipsis, the ellipsis itself is clamped.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if fits(text, max_len) {
        return text.to_string();
    }
    if max_len <= ELLIPSIS.len() {
        return ".".repeat(max_len);
    }

    let graphemes: Vec<&str> = text.graphemes(true).collect();

    // Invariant: a prefix of `low` graphemes plus the ellipsis fits.
    let mut low = 0;
    let mut high = graphemes.len();
    while low < high {
        let mid = high - (high - low) / 2;
        if fits(&with_ellipsis(&graphemes[..mid]), max_len) {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    with_ellipsis(&graphemes[..low])
}

fn with_ellipsis(graphemes: &[&str]) -> String {
    let mut out = graphemes.concat().trim_end().to_string();
    out.push_str(ELLIPSIS);
    out
}
