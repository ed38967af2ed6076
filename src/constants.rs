//! Compile-once constants, regexes and tag tables shared across the pipeline.
//!
//! Every pattern here is precompiled exactly once (`once_cell::sync::Lazy`) and
//! never built from user input, so sharing it across parses run from different
//! threads is free.

use once_cell::sync::Lazy;
use regex::Regex;

bitflags::bitflags! {
    /// Which heuristics are currently active. The orchestrator relaxes these,
    /// one at a time, across at most four attempts (§4.14).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParseFlags: u32 {
        const STRIP_UNLIKELYS      = 0b001;
        const WEIGHT_CLASSES       = 0b010;
        const CLEAN_CONDITIONALLY  = 0b100;
    }
}

impl Default for ParseFlags {
    fn default() -> Self {
        ParseFlags::STRIP_UNLIKELYS | ParseFlags::WEIGHT_CLASSES | ParseFlags::CLEAN_CONDITIONALLY
    }
}

/// Elements scanned as scoring-leaf candidates in addition to `<p>`.
pub static DEFAULT_TAGS_TO_SCORE: &[&str] = &["SECTION", "H2", "H3", "H4", "H5", "H6", "P", "TD", "PRE", "DIV"];

/// Phrasing (inline) content, per the glossary. Plus text nodes.
pub static PHRASING_ELEMS: &[&str] = &[
    "ABBR", "AUDIO", "B", "BDO", "BR", "BUTTON", "CITE", "CODE", "DATA", "DATALIST", "DFN", "EM", "EMBED", "I", "IMG",
    "INPUT", "KBD", "LABEL", "MARK", "MATH", "METER", "NOSCRIPT", "OBJECT", "OUTPUT", "PROGRESS", "Q", "RUBY", "SAMP",
    "SCRIPT", "SELECT", "SMALL", "SPAN", "STRONG", "SUB", "SUP", "TEXTAREA", "TIME", "VAR", "WBR",
];

/// "Block child indicator set": a DIV with none of these as a child is
/// converted to a `<p>` (§4.10).
pub static DIV_TO_P_BLOCK_ELEMS: &[&str] = &["BLOCKQUOTE", "DL", "DIV", "IMG", "OL", "P", "PRE", "TABLE", "UL"];

/// Tags left untouched during sibling merging; anything else gets rewritten to `DIV`.
pub static SIBLING_MERGE_EXCEPTIONS: &[&str] = &["DIV", "ARTICLE", "SECTION", "P", "OL", "UL"];

/// Attributes preserved verbatim on the final serialized article (§4.11 step 9).
pub static ALLOWED_ATTRIBUTES: &[&str] = &["href", "src", "srcset", "alt", "title", "role", "datetime", "colspan", "rowspan"];

/// Presentational attributes stripped unconditionally from article content.
pub static PRESENTATIONAL_ATTRIBUTES: &[&str] = &[
    "align", "background", "bgcolor", "border", "cellpadding", "cellspacing", "frame", "hspace", "rules", "valign",
    "vspace",
];

/// Tags that additionally lose `width`/`height` during attribute scrubbing.
pub static WIDTH_HEIGHT_STRIP_TAGS: &[&str] = &["TABLE", "TH", "TD", "HR", "PRE"];

/// ARIA roles that mark an element as an unlikely candidate outright.
pub static UNLIKELY_ROLES: &[&str] = &["menu", "menubar", "complementary", "navigation", "alert", "alertdialog", "dialog"];

/// `@type` values from schema.org recognized as "this JSON-LD node is an article".
pub static JSON_LD_ARTICLE_TYPES: &[&str] = &[
    "Article", "AdvertiserContentArticle", "NewsArticle", "AnalysisNewsArticle", "AskPublicNewsArticle",
    "BackgroundNewsArticle", "OpinionNewsArticle", "ReportageNewsArticle", "ReviewNewsArticle", "Report",
    "SatiricalArticle", "ScholarlyArticle", "MedicalScholarlyArticle", "SocialMediaPosting", "BlogPosting",
    "LiveBlogPosting", "DiscussionForumPosting", "TechArticle", "APIReference",
];

/// §4.8: minimum number of top candidates required before alternative-ancestor
/// analysis may replace the top candidate with a shared ancestor.
pub const MINIMUM_TOPCANDIDATES: usize = 3;

/// §4.8: a parent is preferred over the current top candidate once its score
/// reaches this fraction of the candidate's score.
pub const MIN_SCORE_RATIO_FOR_ALTERNATIVE: f64 = 0.75;

/// §4.12: below this many words after separator-splitting, prefer the longer half.
pub const MIN_WORD_COUNT_FOR_TITLE: usize = 3;

/// §4.6: ancestor propagation stops after this many levels up.
pub const SCORE_ANCESTOR_MAX_DEPTH: usize = 5;

pub static REGEXPS: Lazy<RegexPatterns> = Lazy::new(RegexPatterns::new);

pub struct RegexPatterns {
    pub unlikely_candidates: Regex,
    pub ok_maybe_its_a_candidate: Regex,
    pub positive: Regex,
    pub negative: Regex,
    pub byline: Regex,
    pub normalize: Regex,
    pub videos: Regex,
    pub hash_url: Regex,
    pub commas: Regex,
    pub json_ld_article_types: Regex,
    pub ad_words: Regex,
    pub loading_words: Regex,
    pub title_separator: Regex,
    pub display_none: Regex,
    pub visibility_hidden: Regex,
    pub base64_placeholder: Regex,
    pub sentence_end: Regex,
    pub whitespace: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            unlikely_candidates: Regex::new(
                r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote"
            ).unwrap(),
            ok_maybe_its_a_candidate: Regex::new(
                r"(?i)and|article|body|column|content|main|mathjax|shadow"
            ).unwrap(),
            positive: Regex::new(
                r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story"
            ).unwrap(),
            negative: Regex::new(
                r"(?i)-ad-|hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|foot|footer|footnote|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|tool|widget"
            ).unwrap(),
            byline: Regex::new(
                r"(?i)byline|author|dateline|writtenby|p-author"
            ).unwrap(),
            normalize: Regex::new(r"\s{2,}").unwrap(),
            videos: Regex::new(
                r"(?i)//(www\.)?((dailymotion|youtube|youtube-nocookie|player\.vimeo|v\.qq|bilibili|live\.bilibili)\.com|(archive|upload\.wikimedia)\.org|player\.twitch\.tv)"
            ).unwrap(),
            hash_url: Regex::new(r"^#.+").unwrap(),
            commas: Regex::new(
                "[\u{002C}\u{060C}\u{FE50}\u{FE10}\u{FE11}\u{2E41}\u{2E34}\u{2E32}\u{FF0C}]"
            ).unwrap(),
            json_ld_article_types: Regex::new(
                r"^(Article|AdvertiserContentArticle|NewsArticle|AnalysisNewsArticle|AskPublicNewsArticle|BackgroundNewsArticle|OpinionNewsArticle|ReportageNewsArticle|ReviewNewsArticle|Report|SatiricalArticle|ScholarlyArticle|MedicalScholarlyArticle|SocialMediaPosting|BlogPosting|LiveBlogPosting|DiscussionForumPosting|TechArticle|APIReference)$"
            ).unwrap(),
            ad_words: Regex::new(
                r"(?iu)^(ad(vertising|vertisement)?|pub(licité)?|werb(ung)?|广告|Реклама|Anuncio)$"
            ).unwrap(),
            loading_words: Regex::new(
                r"(?iu)^((loading|正在加载|Загрузка|chargement|cargando)(…|\.\.\.)?)$"
            ).unwrap(),
            title_separator: Regex::new(r" [\|\-\x{2013}\x{2014}/>\x{00BB}] ").unwrap(),
            display_none: Regex::new(r"(?i)display\s*:\s*none").unwrap(),
            visibility_hidden: Regex::new(r"(?i)visibility\s*:\s*hidden").unwrap(),
            base64_placeholder: Regex::new(
                r"(?i)^data:\s*image/\w+\s*;\s*base64\s*,"
            ).unwrap(),
            sentence_end: Regex::new(r"\.( |$)").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_pattern_covers_glossary_tokens() {
        for token in [
            "hidden", "banner", "combx", "comment", "com-", "contact", "foot", "footer", "footnote", "gdpr",
            "masthead", "media", "meta", "outbrain", "promo", "related", "scroll", "share", "shoutbox", "sidebar",
            "skyscraper", "sponsor", "shopping", "tags", "tool", "widget",
        ] {
            assert!(REGEXPS.negative.is_match(token), "missing negative token: {token}");
        }
    }

    #[test]
    fn positive_pattern_covers_glossary_tokens() {
        for token in [
            "article", "body", "content", "entry", "hentry", "h-entry", "main", "page", "pagination", "post", "text",
            "blog", "story",
        ] {
            assert!(REGEXPS.positive.is_match(token), "missing positive token: {token}");
        }
    }

    #[test]
    fn json_ld_article_types_match_known_types() {
        assert!(REGEXPS.json_ld_article_types.is_match("NewsArticle"));
        assert!(REGEXPS.json_ld_article_types.is_match("BlogPosting"));
        assert!(!REGEXPS.json_ld_article_types.is_match("Product"));
    }
}
