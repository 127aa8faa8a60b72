//! Weighted character counting as performed by X/Twitter.
//!
//! Mirrors the platform's v3 counting configuration:
//!
//! - text is NFC-normalized before counting
//! - code points in the light ranges weigh 1, everything else weighs 2
//! - an emoji sequence (ZWJ families, flags, keycaps, skin tones) weighs 2 in total
//! - every link (see [`crate::urls`]) weighs a flat 23 no matter its length

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::urls::url_spans;

/// All weights are expressed in hundredths, as in the platform config.
const SCALE: usize = 100;

/// Weight of any code point outside [`LIGHT_RANGES`].
const DEFAULT_WEIGHT: usize = 200;

/// Weight of a URL, in display characters.
pub const URL_WEIGHT: usize = 23;

/// Inclusive code point ranges with their (scaled) weight.
const LIGHT_RANGES: [(u32, u32, usize); 4] = [
    (0x0000, 0x10FF, 100),
    (0x2000, 0x200D, 100),
    (0x2010, 0x201F, 100),
    (0x2032, 0x2037, 100),
];

/// Weighted length of `text`, in display characters.
#[must_use]
pub fn weighted_length(text: &str) -> usize {
    let normalized: String = text.nfc().collect();
    let mut scaled = 0;
    let mut cursor = 0;

    for span in url_spans(&normalized) {
        scaled += plain_weight(&normalized[cursor..span.start]);
        scaled += URL_WEIGHT * SCALE;
        cursor = span.end;
    }
    scaled += plain_weight(&normalized[cursor..]);

    scaled / SCALE
}

/// Whether `text` is within `max` weighted characters.
#[must_use]
pub fn fits(text: &str, max: usize) -> bool {
    weighted_length(text) <= max
}

/// Scaled weight of text that contains no URL.
fn plain_weight(text: &str) -> usize {
    text.graphemes(true)
        .map(|g| {
            if is_emoji_sequence(g) {
                DEFAULT_WEIGHT
            } else {
                g.chars().map(char_weight).sum()
            }
        })
        .sum()
}

fn char_weight(c: char) -> usize {
    let cp = u32::from(c);
    LIGHT_RANGES
        .iter()
        .find(|(start, end, _)| (*start..=*end).contains(&cp))
        .map_or(DEFAULT_WEIGHT, |(_, _, weight)| *weight)
}

fn is_emoji_sequence(grapheme: &str) -> bool {
    grapheme.chars().nth(1).is_some() && grapheme.chars().any(is_emoji_component)
}

fn is_emoji_component(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1F000..=0x1FAFF   // pictographs, flags, skin tones
            | 0x2600..=0x27BF // misc symbols, dingbats
            | 0x200D          // zero width joiner
            | 0xFE0F          // emoji presentation selector
            | 0x20E3 // combining keycap
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_counts_one_per_char() {
        assert_eq!(weighted_length("hello world"), 11);
        assert_eq!(weighted_length(""), 0);
    }

    #[test]
    fn test_cjk_counts_double() {
        assert_eq!(weighted_length("漢"), 2);
        assert_eq!(weighted_length("漢 字"), 5);
        assert_eq!(weighted_length("こんにちは"), 10);
    }

    #[test]
    fn test_light_punctuation_ranges() {
        // En dash and curly quotes sit in the light ranges.
        assert_eq!(weighted_length("\u{2013}\u{201C}\u{201D}"), 3);
        // Horizontal ellipsis does not.
        assert_eq!(weighted_length("\u{2026}"), 2);
    }

    #[test]
    fn test_nfc_normalization_before_counting() {
        // "e" + combining acute composes to a single light code point.
        assert_eq!(weighted_length("e\u{301}"), 1);
    }

    #[test]
    fn test_emoji_sequences_count_once() {
        assert_eq!(weighted_length("😀"), 2);
        // Family: man ZWJ woman ZWJ girl.
        assert_eq!(weighted_length("👨\u{200D}👩\u{200D}👧"), 2);
        // Thumbs up with skin tone modifier.
        assert_eq!(weighted_length("👍🏽"), 2);
    }

    #[test]
    fn test_urls_count_flat() {
        assert_eq!(weighted_length("https://x.com/a"), URL_WEIGHT);
        let long = format!("https://example.com/{}", "a".repeat(200));
        assert_eq!(weighted_length(&long), URL_WEIGHT);
        assert_eq!(weighted_length("see example.com now"), 4 + URL_WEIGHT + 4);
    }

    #[test]
    fn test_url_trailing_punctuation_excluded() {
        assert_eq!(weighted_length("Read https://x.com/a."), 5 + URL_WEIGHT + 1);
    }

    #[test]
    fn test_link_rules_decide_weight() {
        assert_eq!(weighted_length("example.ch/pricing"), URL_WEIGHT);
        assert_eq!(weighted_length("startup.ventures"), URL_WEIGHT);
        assert_eq!(weighted_length("install.sh"), 10);
        assert_eq!(weighted_length("https://localhost"), 17);
        assert_eq!(weighted_length("mail me@example.com"), 19);
    }

    #[test]
    fn test_fits_boundary() {
        let text = "a".repeat(280);
        assert!(fits(&text, 280));
        assert!(!fits(&format!("{text}a"), 280));
    }
}
