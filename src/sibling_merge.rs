//! Sibling merger (§4.9): builds the article wrapper and merges qualifying
//! siblings of the top candidate's parent into it.

use crate::constants::{REGEXPS, SIBLING_MERGE_EXCEPTIONS};
use crate::dom::{self, Node};
use crate::node_store::NodeStore;
use crate::scoring;

pub const READABILITY_CONTENT_ID: &str = "readability-content";
pub const READABILITY_PAGE_ID: &str = "readability-page-1";

/// Build `DIV#readability-content > DIV#readability-page-1.page` and merge
/// qualifying siblings of `top_candidate`'s parent into the page div, in
/// document order. Returns the outer `readability-content` wrapper.
pub fn merge_siblings(top_candidate: &Node, store: &NodeStore) -> Node {
    let article_content = dom::create_element("div", &[("id", READABILITY_CONTENT_ID)], "");
    let page = dom::create_element("div", &[("id", READABILITY_PAGE_ID), ("class", "page")], "");
    dom::append_child(&article_content, page.clone());

    let top_score = store.content_score(top_candidate);
    let threshold = (10.0_f64).max(0.2 * top_score);
    let top_class = dom::class_of(top_candidate);

    let Some(parent) = dom::parent_element(top_candidate) else {
        dom::append_child(&page, top_candidate.clone());
        return article_content;
    };

    let siblings: Vec<Node> = parent.children().filter(|n| dom::is_element(n)).collect();

    for sibling in siblings {
        if crate::traversal::same_node(&sibling, top_candidate) {
            dom::append_child(&page, sibling);
            continue;
        }

        if should_append_sibling(&sibling, top_score, threshold, &top_class, store) {
            let to_append = if dom::has_any_tag(&sibling, SIBLING_MERGE_EXCEPTIONS) {
                sibling
            } else {
                dom::rename_element(&sibling, "div")
            };
            dom::append_child(&page, to_append);
        }
    }

    article_content
}

fn should_append_sibling(sibling: &Node, top_score: f64, threshold: f64, top_class: &str, store: &NodeStore) -> bool {
    let sibling_score = store.content_score(sibling);
    let class_bonus = if !top_class.is_empty() && dom::class_of(sibling) == top_class { 0.2 * top_score } else { 0.0 };
    if sibling_score + class_bonus >= threshold {
        return true;
    }

    if dom::has_tag(sibling, "P") {
        let text = dom::inner_text(sibling, true);
        let len = text.chars().count();
        let density = scoring::link_density(sibling);
        if len > 80 && density < 0.25 {
            return true;
        }
        if len > 0 && len <= 80 && density == 0.0 && REGEXPS.sentence_end.is_match(&text) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{body_of, parse_document, select_one};
    use crate::node_store::NodeScore;

    #[test]
    fn wraps_in_stable_ids() {
        let doc = parse_document("<html><body><div><p>hi</p></div></body></html>");
        let body = body_of(&doc);
        let div = select_one(&body, "div").unwrap();
        let store = NodeStore::new();
        let wrapper = merge_siblings(&div, &store);
        assert_eq!(dom::get_attr(&wrapper, "id").as_deref(), Some(READABILITY_CONTENT_ID));
        let page = dom::first_element_child(&wrapper).unwrap();
        assert_eq!(dom::get_attr(&page, "id").as_deref(), Some(READABILITY_PAGE_ID));
        assert!(dom::class_of(&page).contains("page"));
    }

    #[test]
    fn qualifying_sibling_is_merged_and_renamed() {
        let doc = parse_document(
            r#"<html><body><section class="x">sidebar</section><article class="x">main content here that is long enough to score well across passes.</article></body></html>"#,
        );
        let body = body_of(&doc);
        let article = select_one(&body, "article").unwrap();
        let section = select_one(&body, "section").unwrap();
        let mut store = NodeStore::new();
        store.set(&article, NodeScore { content_score: 50.0, initialized: true });
        store.set(&section, NodeScore { content_score: 40.0, initialized: true });
        let wrapper = merge_siblings(&article, &store);
        let page = dom::first_element_child(&wrapper).unwrap();
        // section isn't in the exception set, so it should have become a DIV.
        assert!(dom::select(&page, "div").iter().any(|d| d.text_contents().contains("sidebar")));
    }
}
