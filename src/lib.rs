//! Core extraction pipeline for pulling readable article content out of an
//! HTML document.
//!
//! ```no_run
//! use readability_core::{Readability, ReadabilityOptions};
//!
//! let html = "<html><body><article><p>...</p></article></body></html>";
//! let mut readability = Readability::new(html, None, ReadabilityOptions::default());
//! let result = readability.parse().expect("extraction failed");
//! println!("{}", result.title);
//! ```

mod article_cleaner;
mod candidate;
mod cleaner;
mod constants;
mod data_table;
mod div_to_p;
mod dom;
mod error;
mod metadata;
mod node_store;
mod options;
mod orchestrator;
mod preparer;
mod scoring;
mod serialize;
mod sibling_merge;
mod title;
mod traversal;
mod urls;
mod utils;
mod visibility;

pub use error::{Error, Result};
pub use options::{ReadabilityOptions, ReadabilityOptionsBuilder};

/// Output of a successful [`Readability::parse`] call (§3 `Result`).
#[derive(Debug, Clone)]
pub struct ExtractResult {
    pub title: String,
    pub byline: Option<String>,
    pub dir: Option<String>,
    pub lang: Option<String>,
    pub content: String,
    pub text_content: String,
    pub excerpt: Option<String>,
    pub length: usize,
    pub site_name: Option<String>,
    pub published_time: Option<String>,
}

impl From<orchestrator::ExtractionOutput> for ExtractResult {
    fn from(out: orchestrator::ExtractionOutput) -> Self {
        Self {
            title: out.title,
            byline: out.byline,
            dir: out.dir,
            lang: out.lang,
            content: out.content,
            text_content: out.text_content,
            excerpt: out.excerpt,
            length: out.length,
            site_name: out.site_name,
            published_time: out.published_time,
        }
    }
}

/// Single-use extraction handle over one HTML document.
///
/// Construct with [`Readability::new`], then call [`Readability::parse`]
/// exactly once; a second call returns [`Error::AlreadyParsed`] regardless of
/// the first call's outcome (§3, §5 invariants).
pub struct Readability {
    html: String,
    base_url: Option<String>,
    options: ReadabilityOptions,
    parsed: bool,
}

impl Readability {
    pub fn new(html: impl Into<String>, base_url: Option<String>, options: ReadabilityOptions) -> Self {
        Self { html: html.into(), base_url, options, parsed: false }
    }

    /// Run the extraction pipeline once. See the error taxonomy in
    /// [`Error`] for failure modes.
    pub fn parse(&mut self) -> Result<ExtractResult> {
        if self.parsed {
            return Err(Error::AlreadyParsed);
        }
        self.parsed = true;

        if self.html.trim().is_empty() {
            return Err(Error::InvalidHtml);
        }

        let document = dom::parse_document(&self.html);
        tracing::debug!(len = self.html.len(), "starting extraction");

        let base_url = self.base_url.as_deref().and_then(|raw| match url::Url::parse(raw) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(base_url = raw, error = %err, "ignoring unparseable base URL");
                None
            }
        });

        orchestrator::extract(&self.html, &document, &self.options, base_url.as_ref()).map(ExtractResult::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prose(sentences: usize) -> String {
        "This is a sentence with enough words to count toward the content length threshold. ".repeat(sentences)
    }

    #[test]
    fn extracts_simple_article() {
        let html = format!(
            "<html><head><title>My Article</title></head><body><article><p>{}</p></article></body></html>",
            prose(10)
        );
        let mut readability = Readability::new(html, None, ReadabilityOptions::default());
        let result = readability.parse().unwrap();
        assert_eq!(result.title, "My Article");
        assert!(result.length > 0);
    }

    #[test]
    fn second_parse_call_fails() {
        let html = format!("<html><body><article><p>{}</p></article></body></html>", prose(10));
        let mut readability = Readability::new(html, None, ReadabilityOptions::default());
        assert!(readability.parse().is_ok());
        assert!(matches!(readability.parse(), Err(Error::AlreadyParsed)));
    }

    #[test]
    fn empty_input_is_invalid() {
        let mut readability = Readability::new("   ", None, ReadabilityOptions::default());
        assert!(matches!(readability.parse(), Err(Error::InvalidHtml)));
    }

    #[test]
    fn unlikely_candidate_div_is_excluded_from_content() {
        let html = format!(
            "<html><body><div class=\"comment\">C</div><article><p>{}</p></article></body></html>",
            prose(10)
        );
        let mut readability = Readability::new(html, None, ReadabilityOptions::default());
        let result = readability.parse().unwrap();
        assert!(!result.content.contains('C') || result.content.contains(&prose(1)));
        assert!(!result.text_content.contains("C</div>"));
    }

    #[test]
    fn fallback_progression_eventually_accepts_short_content() {
        let html = "<html><head><title>Short Title</title></head><body><div class=\"comment\">short text here</div></body></html>";
        let mut readability = Readability::new(html, None, ReadabilityOptions::default());
        let result = readability.parse().unwrap();
        assert_eq!(result.title, "Short Title");
    }

    #[test]
    fn base_url_resolves_relative_links_in_content() {
        let html = format!(
            "<html><body><article><p>{}<a href=\"/next\">more</a></p></article></body></html>",
            prose(10)
        );
        let mut readability =
            Readability::new(html, Some("https://example.com/articles/page.html".to_string()), ReadabilityOptions::default());
        let result = readability.parse().unwrap();
        assert!(result.content.contains("href=\"https://example.com/next\""));
    }

    #[test]
    fn unparseable_base_url_is_ignored_without_failing_extraction() {
        let html = format!("<html><body><article><p>{}</p></article></body></html>", prose(10));
        let mut readability = Readability::new(html, Some("not a url".to_string()), ReadabilityOptions::default());
        assert!(readability.parse().is_ok());
    }
}
