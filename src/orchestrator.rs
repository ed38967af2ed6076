//! Extraction orchestrator (§4.14): owns the multi-attempt loop, flag
//! progression, snapshot/restore, and final result assembly.

use crate::article_cleaner;
use crate::candidate;
use crate::cleaner;
use crate::constants::ParseFlags;
use crate::dom::{self, Node};
use crate::div_to_p;
use crate::error::{Error, Result};
use crate::metadata;
use crate::node_store::NodeStore;
use crate::options::ReadabilityOptions;
use crate::preparer;
use crate::scoring;
use crate::serialize;
use crate::sibling_merge;
use crate::title;
use crate::urls;

pub struct ExtractionOutput {
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

struct Attempt {
    article: Node,
    text_length: usize,
}

/// Run the full multi-attempt extraction over `document` (the parsed tree,
/// including `<head>`). Mirrors §4.14 step by step: snapshot via re-parse
/// from the original source string, since that is the strategy this adapter
/// chose (§9 design notes) over a true subtree deep-clone.
pub fn extract(
    original_html: &str,
    document: &Node,
    options: &ReadabilityOptions,
    base_url: Option<&url::Url>,
) -> Result<ExtractionOutput> {
    let mut flags = ParseFlags::default();
    let mut attempts: Vec<Attempt> = Vec::new();
    let mut current_document = document.clone();

    loop {
        let body = dom::body_of(&current_document);

        if options.max_elems_to_parse > 0 && dom::count_elements(&body) > options.max_elems_to_parse {
            return Err(Error::ParsingFailed { cause: "element count exceeds maxElemsToParse".to_string() });
        }

        preparer::prepare_document(&body);
        let metadata = metadata::extract_metadata(&body, &current_document, options.disable_json_ld);
        let clean_result = cleaner::clean(&body, flags);
        let byline = metadata.byline.clone().or(clean_result.byline);

        let mut store = NodeStore::new();
        let leaf_selector = crate::constants::DEFAULT_TAGS_TO_SCORE.join(", ").to_lowercase();
        for leaf in dom::select(&body, &leaf_selector) {
            scoring::score_element(&leaf, &mut store, flags, options.link_density_modifier);
        }

        let top = candidate::build_top_candidates(&body, &store, options.nb_top_candidates);
        let top_candidate = candidate::select_top_candidate(&body, &top, &mut store);

        let article_wrapper = sibling_merge::merge_siblings(&top_candidate, &store);
        let page = dom::first_element_child(&article_wrapper).unwrap_or_else(|| article_wrapper.clone());

        div_to_p::convert_divs(&page);

        let resolved_title = title::resolve_title(&current_document, metadata.title.as_deref());
        article_cleaner::prep_article(&page, &resolved_title, flags, options.video_regex());

        let text = dom::inner_text(&article_wrapper, true);
        let text_length = text.chars().count();

        if text_length >= options.char_threshold {
            if let Some(base) = base_url {
                urls::fix_relative_uris(&article_wrapper, base);
            }
            let (content, text_content) = serialize::finalize(&article_wrapper, options.keep_classes, &options.classes_to_preserve);
            return Ok(ExtractionOutput {
                title: resolved_title,
                byline,
                dir: metadata.dir,
                lang: metadata.lang,
                content,
                length: text_content.chars().count(),
                text_content,
                excerpt: metadata.excerpt,
                site_name: metadata.site_name,
                published_time: metadata.published_time,
            });
        }

        attempts.push(Attempt { article: article_wrapper, text_length });

        if flags.contains(ParseFlags::STRIP_UNLIKELYS) {
            flags.remove(ParseFlags::STRIP_UNLIKELYS);
        } else if flags.contains(ParseFlags::WEIGHT_CLASSES) {
            flags.remove(ParseFlags::WEIGHT_CLASSES);
        } else if flags.contains(ParseFlags::CLEAN_CONDITIONALLY) {
            flags.remove(ParseFlags::CLEAN_CONDITIONALLY);
        } else {
            return finish_with_best_attempt(attempts, original_html, options, base_url);
        }

        current_document = dom::parse_document(original_html);
    }
}

/// All flag levels exhausted: accept the longest recorded attempt (tolerant
/// acceptance per the Open Question decision in §9), or fail with
/// `noContent` if every attempt produced zero characters.
fn finish_with_best_attempt(
    attempts: Vec<Attempt>,
    original_html: &str,
    options: &ReadabilityOptions,
    base_url: Option<&url::Url>,
) -> Result<ExtractionOutput> {
    let best = attempts.into_iter().max_by_key(|a| a.text_length);

    let Some(best) = best else {
        return Err(Error::NoContent);
    };
    if best.text_length == 0 {
        return Err(Error::NoContent);
    }

    let fallback_document = dom::parse_document(original_html);
    let metadata = metadata::extract_metadata(&fallback_document, &fallback_document, options.disable_json_ld);
    let resolved_title = title::resolve_title(&fallback_document, metadata.title.as_deref());

    if let Some(base) = base_url {
        urls::fix_relative_uris(&best.article, base);
    }
    let (content, text_content) = serialize::finalize(&best.article, options.keep_classes, &options.classes_to_preserve);

    tracing::debug!(text_length = best.text_length, threshold = options.char_threshold, "accepted sub-threshold attempt");

    Ok(ExtractionOutput {
        title: resolved_title,
        byline: metadata.byline,
        dir: metadata.dir,
        lang: metadata.lang,
        length: text_content.chars().count(),
        content,
        text_content,
        excerpt: metadata.excerpt,
        site_name: metadata.site_name,
        published_time: metadata.published_time,
    })
}
