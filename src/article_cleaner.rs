//! Article cleaner / `prepArticle` (§4.11): the post-merge cleaning pipeline
//! run once over the assembled article content, in order.

use crate::constants::{
    ParseFlags, PRESENTATIONAL_ATTRIBUTES, REGEXPS, WIDTH_HEIGHT_STRIP_TAGS,
};
use crate::data_table;
use crate::dom::{self, Node};
use crate::scoring;
use crate::utils::jaccard_similarity;

const CONDITIONAL_CLEAN_TAGS: &[&str] = &["FORM", "FIELDSET", "OBJECT", "EMBED", "H1", "FOOTER", "LINK", "ASIDE", "TABLE", "UL", "DIV"];

pub fn prep_article(article_root: &Node, resolved_title: &str, flags: ParseFlags, allowed_video_regex: &regex::Regex) {
    strip_presentational_attributes(article_root);
    remove_share_blocks(article_root);
    data_table::mark_data_tables(article_root);
    if flags.contains(ParseFlags::CLEAN_CONDITIONALLY) {
        clean_conditionally(article_root, allowed_video_regex, flags);
    }
    flatten_single_cell_tables(article_root);
    clean_headers(article_root, resolved_title, flags);
    remove_empty_paragraphs(article_root);
    unwrap_br_only_paragraphs(article_root);
    fix_lazy_images(article_root);
}

fn strip_presentational_attributes(root: &Node) {
    for node in dom::select(root, "*") {
        dom::remove_attr(&node, "style");
        for attr in PRESENTATIONAL_ATTRIBUTES {
            dom::remove_attr(&node, attr);
        }
        if dom::has_any_tag(&node, WIDTH_HEIGHT_STRIP_TAGS) {
            dom::remove_attr(&node, "width");
            dom::remove_attr(&node, "height");
        }
    }
}

fn remove_share_blocks(root: &Node) {
    for node in dom::select(root, "*") {
        if node.parent().is_none() {
            continue;
        }
        let match_string = dom::match_string(&node).to_lowercase();
        if !match_string.contains("share") && !match_string.contains("sharedaddy") {
            continue;
        }
        if !dom::select(&node, "img, picture, video, figure").is_empty() {
            continue;
        }
        let text_len = dom::inner_text(&node, true).len();
        let paragraphs = dom::select(&node, "p").len();
        if text_len <= 1500 && paragraphs <= 3 {
            dom::remove_node(&node);
        }
    }
}

fn clean_conditionally(root: &Node, allowed_video_regex: &regex::Regex, flags: ParseFlags) {
    for tag in CONDITIONAL_CLEAN_TAGS {
        let selector = tag.to_lowercase();
        for node in dom::select(root, &selector) {
            if node.parent().is_none() {
                continue;
            }
            if crate::traversal::has_ancestor_tag(&node, "CODE", None)
                || data_table::is_marked_data_table(&node)
                || data_table::has_data_table_ancestor(&node)
                || data_table::contains_data_table(&node)
            {
                continue;
            }
            if should_remove_conditionally(&node, allowed_video_regex, flags) {
                dom::remove_node(&node);
            }
        }
    }
}

fn should_remove_conditionally(node: &Node, allowed_video_regex: &regex::Regex, flags: ParseFlags) -> bool {
    let weight = scoring::class_weight(node, flags);
    let text = dom::inner_text(node, true);
    let comma_count = REGEXPS.commas.find_iter(&text).count();
    let paragraphs = dom::select(node, "p").len();
    let images = dom::select(node, "img").len();
    let list_items = dom::select(node, "li").len().saturating_sub(100);
    let inputs = dom::select(node, "input").len();
    let density = scoring::link_density(node);
    let content_len = text.len();
    let in_figure = crate::traversal::has_ancestor_tag(node, "FIGURE", None);
    let embeds = dom::select(node, "object, embed, iframe");

    if comma_count <= 10 && weight < 0.0 {
        let p_count = paragraphs as f64;
        let img_count = images as f64;
        let image_paragraph_ratio_too_high = img_count > 1.0 && p_count / img_count < 0.5;
        if image_paragraph_ratio_too_high || density > 0.25 {
            return true;
        }
    }

    if images > 1 && (images as f64) > (paragraphs as f64 / 3.0) && !in_figure {
        return true;
    }

    if !dom::has_any_tag(node, &["UL", "OL"]) && list_items > paragraphs {
        return true;
    }

    if inputs > paragraphs / 3 {
        return true;
    }

    if content_len < 14 && images <= 1 {
        return true;
    }

    if (weight < 25.0 && density > 0.2) || (weight >= 25.0 && density > 0.5) {
        return true;
    }

    if embeds.len() == 1 {
        let video_allowed = embeds
            .iter()
            .any(|e| dom::get_attr(e, "src").map(|s| allowed_video_regex.is_match(&s)).unwrap_or(false));
        if !video_allowed && content_len < 75 {
            return true;
        }
    }

    false
}

fn flatten_single_cell_tables(root: &Node) {
    for table in dom::select(root, "table") {
        if table.parent().is_none() {
            continue;
        }
        let cells = dom::select(&table, "td, th");
        if cells.len() != 1 {
            continue;
        }
        let cell = &cells[0];
        let only_phrasing = dom::children_elements(cell)
            .iter()
            .all(|c| crate::constants::PHRASING_ELEMS.contains(&dom::tag_name(c).unwrap_or_default().as_str()));

        if only_phrasing {
            let inner = dom::inner_html(cell);
            let p = dom::create_element("p", &[], &inner);
            dom::replace_node(&table, &p);
        } else {
            let clone = dom::clone_node(cell);
            let renamed = dom::rename_element(&clone, "div");
            dom::replace_node(&table, &renamed);
        }
    }
}

fn clean_headers(root: &Node, resolved_title: &str, flags: ParseFlags) {
    for header in dom::select(root, "h1, h2") {
        if header.parent().is_none() {
            continue;
        }
        let weight = scoring::class_weight(&header, flags);
        let text = dom::inner_text(&header, true);
        if weight < 0.0 || jaccard_similarity(&text, resolved_title) >= 0.75 {
            dom::remove_node(&header);
        }
    }
}

fn remove_empty_paragraphs(root: &Node) {
    for p in dom::select(root, "p") {
        if p.parent().is_none() {
            continue;
        }
        let has_media = !dom::select(&p, "img, video, picture, iframe").is_empty();
        if dom::inner_text(&p, true).is_empty() && !has_media {
            dom::remove_node(&p);
        }
    }
}

fn unwrap_br_only_paragraphs(root: &Node) {
    for p in dom::select(root, "p") {
        if p.parent().is_none() {
            continue;
        }
        let children = dom::children_elements(&p);
        if children.len() == 1 && dom::has_tag(&children[0], "BR") && dom::inner_text(&p, true).is_empty() {
            dom::remove_node(&p);
        }
    }
}

const PLACEHOLDER_SIZE_THRESHOLD: usize = 200;

fn fix_lazy_images(root: &Node) {
    for img in dom::select(root, "img") {
        let has_usable_src = dom::get_attr(&img, "src")
            .map(|src| !is_placeholder_src(&src))
            .unwrap_or(false);
        if has_usable_src {
            continue;
        }

        for attr in ["data-src", "data-original", "data-url"] {
            if let Some(candidate) = dom::get_attr(&img, attr) {
                if !is_placeholder_src(&candidate) {
                    dom::set_attr(&img, "src", &candidate);
                    break;
                }
            }
        }

        if let Some(srcset) = dom::get_attr(&img, "data-srcset") {
            dom::set_attr(&img, "srcset", &srcset);
        }
    }
}

fn is_placeholder_src(src: &str) -> bool {
    if src.trim().is_empty() {
        return true;
    }
    if REGEXPS.base64_placeholder.is_match(src) && src.len() < PLACEHOLDER_SIZE_THRESHOLD {
        return true;
    }
    false
}
