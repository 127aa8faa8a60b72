//! Link detection following the platform's URL extraction rules.
//!
//! A link is an optional `http://` or `https://` scheme, a domain ending in a
//! known top-level domain, then an optional port, path and query. Links
//! without a scheme are stricter:
//!
//! - they must not directly follow `-`, `_`, `.` or `/`
//! - the domain may only use ASCII and Latin letters
//! - a single label on a country-code TLD (`install.sh`) needs a path, except
//!   on `.co` and `.tv`
//!
//! The scan is one left-to-right pass. Matched text is consumed even when it
//! is not reported as a link.

use std::ops::Range;

use crate::tld::{is_country_tld, is_generic_tld, is_punycode_tld, SPECIAL_SHORT_TLDS};

/// Longest `t.co` slug still treated as a link.
pub const MAX_TCO_SLUG_LENGTH: usize = 40;

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Byte ranges of links in `text`, in order and non-overlapping.
#[must_use]
pub fn url_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(c) = text[pos..].chars().next() {
        if may_precede_link(text[..pos].chars().next_back()) {
            if let Some(candidate) = Candidate::at(text, pos) {
                if let Some(span) = candidate.link(text) {
                    spans.push(span);
                }
                pos = candidate.end;
                continue;
            }
        }
        pos += c.len_utf8();
    }

    spans
}

/// A syntactic match, before the scheme-less restrictions are applied.
struct Candidate {
    start: usize,
    host_start: usize,
    domain: Domain,
    path: Option<Range<usize>>,
    end: usize,
}

struct Domain {
    end: usize,
    /// Labels including the TLD.
    labels: usize,
    tld: String,
}

impl Candidate {
    fn at(text: &str, start: usize) -> Option<Self> {
        let scheme_len = SCHEMES
            .iter()
            .find(|scheme| starts_with_ignore_case(&text[start..], scheme))
            .map_or(0, |scheme| scheme.len());
        let host_start = start + scheme_len;

        let domain = match_domain(text, host_start, scheme_len == 0)?;
        let after_port = match_port(text, domain.end);
        let path = match_path(text, after_port);
        let end = match_query(text, path.as_ref().map_or(after_port, |p| p.end));

        Some(Self {
            start,
            host_start,
            domain,
            path,
            end,
        })
    }

    fn has_scheme(&self) -> bool {
        self.host_start > self.start
    }

    /// The reported span, or `None` when the match is not a link.
    fn link(&self, text: &str) -> Option<Range<usize>> {
        if self.has_scheme() {
            return self.tco_link(text);
        }

        if matches!(
            text[..self.start].chars().next_back(),
            Some('-' | '_' | '.' | '/')
        ) {
            return None;
        }

        match &self.path {
            Some(_) => Some(self.start..self.end),
            None if self.is_invalid_short_domain() => None,
            None => Some(self.start..self.domain.end),
        }
    }

    fn is_invalid_short_domain(&self) -> bool {
        self.domain.labels == 2
            && is_country_tld(&self.domain.tld)
            && !SPECIAL_SHORT_TLDS.contains(&self.domain.tld.as_str())
    }

    /// `t.co` links end at the slug, and overlong slugs are not links.
    fn tco_link(&self, text: &str) -> Option<Range<usize>> {
        let host = &text[self.host_start..self.domain.end];
        let Some(path) = self.path.as_ref().filter(|_| host.eq_ignore_ascii_case("t.co")) else {
            return Some(self.start..self.end);
        };

        let slug_start = path.start + 1;
        let slug_len = text[slug_start..]
            .bytes()
            .take_while(u8::is_ascii_alphanumeric)
            .count();
        match slug_len {
            0 => Some(self.start..self.end),
            n if n > MAX_TCO_SLUG_LENGTH => None,
            n => Some(self.start..slug_start + n),
        }
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Longest run of labels from `from` that ends in a known TLD.
fn match_domain(text: &str, from: usize, ascii_only: bool) -> Option<Domain> {
    let run_len = text[from..]
        .char_indices()
        .find(|&(_, c)| !matches!(c, '.' | '-' | '_') && !is_domain_char(c, ascii_only))
        .map_or(text.len() - from, |(i, _)| i);

    let mut offset = from;
    let labels: Vec<(usize, &str)> = text[from..from + run_len]
        .split('.')
        .map(|label| {
            let start = offset;
            offset += label.len() + 1;
            (start, label)
        })
        .collect();

    for count in (2..=labels.len()).rev() {
        let names = &labels[..count - 1];
        let names_valid = names
            .iter()
            .enumerate()
            .all(|(i, (_, label))| is_valid_label(label, i + 1 < names.len()));
        if !names_valid {
            continue;
        }

        let (tld_start, last) = labels[count - 1];
        if let Some(tld_len) = tld_prefix_len(text, tld_start, last) {
            return Some(Domain {
                end: tld_start + tld_len,
                labels: count,
                tld: last[..tld_len].to_lowercase(),
            });
        }
    }

    None
}

/// Subdomains may contain `_`; the label right before the TLD may not.
fn is_valid_label(label: &str, is_subdomain: bool) -> bool {
    let edge_ok = |c: Option<char>| c.is_some_and(|c| !matches!(c, '-' | '_'));
    edge_ok(label.chars().next())
        && edge_ok(label.chars().next_back())
        && (is_subdomain || !label.contains('_'))
}

/// Length of the longest TLD at the start of `label` that is not followed
/// by an ASCII letter or digit, `@`, `+` or `-`.
fn tld_prefix_len(text: &str, label_start: usize, label: &str) -> Option<usize> {
    if is_punycode_tld(&label.to_ascii_lowercase()) {
        return Some(label.len());
    }

    label
        .char_indices()
        .rev()
        .map(|(i, c)| i + c.len_utf8())
        .find(|&len| {
            let candidate = label[..len].to_lowercase();
            (is_generic_tld(&candidate) || is_country_tld(&candidate))
                && !matches!(
                    text[label_start + len..].chars().next(),
                    Some(c) if c.is_ascii_alphanumeric() || matches!(c, '@' | '+' | '-')
                )
        })
}

fn match_port(text: &str, at: usize) -> usize {
    let Some(rest) = text[at..].strip_prefix(':') else {
        return at;
    };
    match rest.bytes().take_while(u8::is_ascii_digit).count() {
        0 => at,
        digits => at + 1 + digits,
    }
}

/// Path starting with `/`, trimmed back to its last allowed ending character.
fn match_path(text: &str, at: usize) -> Option<Range<usize>> {
    if !text[at..].starts_with('/') {
        return None;
    }

    let mut pos = at + 1;
    let mut end = pos;
    while let Some(c) = text[pos..].chars().next() {
        if c == '(' {
            let Some(len) = balanced_parens_len(&text[pos..]) else {
                break;
            };
            pos += len;
            end = pos;
        } else if is_path_char(c) {
            pos += c.len_utf8();
            if is_path_ending(c) {
                end = pos;
            }
        } else {
            break;
        }
    }

    Some(at..end)
}

/// Length of a non-empty `(...)` group at the start of `rest`, one nested
/// group allowed.
fn balanced_parens_len(rest: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut prev = None;
    for (i, c) in rest.char_indices() {
        match c {
            '(' => {
                depth += 1;
                if depth > 2 {
                    return None;
                }
            }
            ')' => {
                if prev == Some('(') {
                    return None;
                }
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            c if is_path_char(c) => {}
            _ => return None,
        }
        prev = Some(c);
    }
    None
}

/// Query starting with `?`, trimmed back to its last allowed ending character.
/// A query with no ending character is not part of the link.
fn match_query(text: &str, at: usize) -> usize {
    let Some(rest) = text[at..].strip_prefix('?') else {
        return at;
    };

    let mut end = at;
    for (i, c) in rest.char_indices() {
        if !is_query_char(c) {
            break;
        }
        if is_query_ending(c) {
            end = at + 1 + i + c.len_utf8();
        }
    }
    end
}

fn may_precede_link(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => !(c.is_ascii_alphanumeric()
            || matches!(c, '@' | '＠' | '$' | '#' | '＃')
            || is_invalid_char(c)),
    }
}

fn is_domain_char(c: char, ascii_only: bool) -> bool {
    if ascii_only {
        c.is_ascii_alphanumeric() || is_latin_accent(c)
    } else {
        !(c.is_whitespace()
            || c.is_ascii_punctuation()
            || c.is_control()
            || is_invalid_char(c)
            || is_directional(c))
    }
}

fn is_path_char(c: char) -> bool {
    is_path_letter(c) || "!*';:=+,.$/%#[]-_~&|@\u{2013}".contains(c)
}

fn is_path_ending(c: char) -> bool {
    is_path_letter(c) || "=_#/+-".contains(c)
}

fn is_path_letter(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{0400}'..='\u{04FF}').contains(&c) || is_latin_accent(c)
}

fn is_query_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!?*'@();:&=+$/%#[]-_.,~|".contains(c)
}

fn is_query_ending(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_&=#/".contains(c)
}

fn is_latin_accent(c: char) -> bool {
    matches!(
        c,
        '\u{00C0}'..='\u{00D6}'
            | '\u{00D8}'..='\u{00F6}'
            | '\u{00F8}'..='\u{024F}'
            | '\u{0253}'
            | '\u{0254}'
            | '\u{0256}'
            | '\u{0257}'
            | '\u{0259}'
            | '\u{025B}'
            | '\u{0263}'
            | '\u{0268}'
            | '\u{026F}'
            | '\u{0272}'
            | '\u{0289}'
            | '\u{028B}'
            | '\u{02BB}'
            | '\u{0300}'..='\u{036F}'
            | '\u{1E00}'..='\u{1EFF}'
    )
}

fn is_invalid_char(c: char) -> bool {
    matches!(c, '\u{FFFE}' | '\u{FEFF}' | '\u{FFFF}')
}

fn is_directional(c: char) -> bool {
    matches!(
        c,
        '\u{061C}' | '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}'
    )
}
