//! Error types returned by the extraction pipeline.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `parse()` was called more than once on the same [`crate::Readability`] instance.
    #[error("this Readability instance has already been parsed")]
    AlreadyParsed,

    /// Every fallback attempt produced zero characters of text content.
    #[error("no content could be extracted from the document")]
    NoContent,

    /// The best attempt's text content fell short of `charThreshold` and the
    /// caller asked for a strict distinction rather than permissive acceptance.
    #[error("extracted content ({actual} chars) is below the configured threshold ({threshold} chars)")]
    ContentTooShort { actual: usize, threshold: usize },

    /// The underlying HTML parser failed outright.
    #[error("HTML parsing failed: {cause}")]
    ParsingFailed { cause: String },

    /// The input could not be treated as HTML at all (e.g. empty input).
    #[error("input is not valid HTML")]
    InvalidHtml,

    /// Reserved for callers that require a specific selector to resolve;
    /// never produced by the core extraction loop itself.
    #[error("element not found for selector: {selector}")]
    ElementNotFound { selector: String },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
