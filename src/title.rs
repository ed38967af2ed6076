//! Title resolver (§4.12): Mozilla-compatible title cleaning against the
//! metadata-derived title and the page's `<title>`/`<h1>`.

use crate::constants::{MIN_WORD_COUNT_FOR_TITLE, REGEXPS};
use crate::dom::{self, Node};
use crate::utils::jaccard_similarity;

/// Resolve the final title, starting from `metadata_title` (falling back to
/// `<title>` if absent) and applying separator-splitting and the `<h1>`
/// Jaccard override.
pub fn resolve_title(document: &Node, metadata_title: Option<&str>) -> String {
    let raw_title = metadata_title
        .map(str::to_string)
        .or_else(|| dom::select_one(document, "title").map(|n| dom::inner_text(&n, true)))
        .unwrap_or_default();

    let cleaned = clean_title(&raw_title);

    let h1s = dom::select(document, "h1");
    if h1s.len() == 1 {
        let h1_text = dom::inner_text(&h1s[0], true);
        if !h1_text.is_empty() && jaccard_similarity(&h1_text, &raw_title) >= 0.75 {
            return h1_text;
        }
    }

    cleaned
}

fn clean_title(title: &str) -> String {
    let normalized = crate::utils::normalize_whitespace(title);
    if !REGEXPS.title_separator.is_match(&normalized) {
        return normalized;
    }

    let parts: Vec<&str> = REGEXPS.title_separator.split(&normalized).collect();
    if parts.len() < 2 {
        return normalized;
    }

    let first = parts[0].trim();
    let first_word_count = first.split_whitespace().count();

    if first_word_count < MIN_WORD_COUNT_FOR_TITLE {
        parts
            .iter()
            .map(|p| p.trim())
            .max_by_key(|p| p.split_whitespace().count())
            .unwrap_or(first)
            .to_string()
    } else {
        first.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    #[test]
    fn splits_on_separator_preferring_first_segment() {
        let title = clean_title("Article Title About Something Long | My Site Name");
        assert_eq!(title, "Article Title About Something Long");
    }

    #[test]
    fn prefers_longer_half_when_first_segment_too_short() {
        let title = clean_title("Home | A Much Longer Descriptive Article Title Here");
        assert_eq!(title, "A Much Longer Descriptive Article Title Here");
    }

    #[test]
    fn h1_override_on_high_jaccard_similarity() {
        let doc = parse_document(
            "<html><head><title>Breaking News Today | Example Site</title></head><body><h1>Breaking News Today</h1></body></html>",
        );
        let title = resolve_title(&doc, Some("Breaking News Today | Example Site"));
        assert_eq!(title, "Breaking News Today");
    }
}
