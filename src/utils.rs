//! Small text utilities shared across the pipeline: whitespace normalization,
//! HTML entity decoding, and word-set similarity.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::REGEXPS;

/// Collapse runs of whitespace to a single space and trim the ends. This is
/// the normalization `innerText()` applies per the DOM adapter contract (§4.1).
pub fn normalize_whitespace(text: &str) -> String {
    REGEXPS.whitespace.replace_all(text.trim(), " ").into_owned()
}

/// Named entities covering the set that realistically appears in `<meta>`
/// content and JSON-LD strings. Numeric references (`&#39;`, `&#x27;`) are
/// handled separately below.
static NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{00A0}'),
    ("mdash", '\u{2014}'),
    ("ndash", '\u{2013}'),
    ("hellip", '\u{2026}'),
    ("rsquo", '\u{2019}'),
    ("lsquo", '\u{2018}'),
    ("rdquo", '\u{201D}'),
    ("ldquo", '\u{201C}'),
    ("copy", '\u{00A9}'),
    ("reg", '\u{00AE}'),
    ("trade", '\u{2122}'),
];

static ENTITY_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"&(#x?[0-9A-Fa-f]+|[A-Za-z]+);").unwrap());

/// Decode HTML character references (`&amp;`, `&#39;`, `&#x27;`, ...) found in
/// metadata values. Unknown named entities are left untouched rather than
/// dropped, matching the source library's conservative behavior.
pub fn decode_html_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    ENTITY_REF
        .replace_all(input, |caps: &regex::Captures| {
            let body = &caps[1];
            if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                if let Ok(code) = u32::from_str_radix(hex, 16) {
                    if let Some(ch) = char::from_u32(code) {
                        return ch.to_string();
                    }
                }
            } else if let Some(dec) = body.strip_prefix('#') {
                if let Ok(code) = dec.parse::<u32>() {
                    if let Some(ch) = char::from_u32(code) {
                        return ch.to_string();
                    }
                }
            } else if let Some((_, ch)) = NAMED_ENTITIES.iter().find(|(name, _)| name.eq_ignore_ascii_case(body)) {
                return ch.to_string();
            }
            caps[0].to_string()
        })
        .into_owned()
}

/// Normalize text for word-set comparisons: lowercase, collapse whitespace, trim.
pub fn normalize_for_word_set(text: &str) -> String {
    normalize_whitespace(text).to_lowercase()
}

/// Jaccard similarity (`|A ∩ B| / |A ∪ B|`) over whitespace-delimited word sets.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let set_a: HashSet<&str> = normalize_for_word_set(a).split_whitespace().collect::<Vec<_>>().into_iter().collect();
    let set_b: HashSet<&str> = normalize_for_word_set(b).split_whitespace().collect::<Vec<_>>().into_iter().collect();

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs_of_whitespace() {
        assert_eq!(normalize_whitespace("  Hello   world  \n\t"), "Hello world");
    }

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(decode_html_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_html_entities("It&#39;s"), "It's");
        assert_eq!(decode_html_entities("It&#x27;s"), "It's");
    }

    #[test]
    fn leaves_unknown_entities_alone() {
        assert_eq!(decode_html_entities("&notarealentity;"), "&notarealentity;");
    }

    #[test]
    fn jaccard_identical_sets_is_one() {
        assert_eq!(jaccard_similarity("hello world", "world hello"), 1.0);
    }

    #[test]
    fn jaccard_disjoint_sets_is_zero() {
        assert_eq!(jaccard_similarity("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn jaccard_partial_overlap() {
        let sim = jaccard_similarity("big news today", "big news yesterday");
        assert!(sim > 0.3 && sim < 0.7);
    }
}
