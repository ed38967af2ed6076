//! Node cleaner (§4.7): the pre-scoring depth-first pass that strips
//! "unlikely candidate" subtrees and records the first inline byline found.

use crate::constants::{ParseFlags, REGEXPS, UNLIKELY_ROLES};
use crate::dom::{self, Node};
use crate::traversal;

#[derive(Default)]
pub struct CleanResult {
    pub byline: Option<String>,
}

fn is_unlikely_candidate(node: &Node) -> bool {
    let match_string = dom::match_string(node).to_lowercase();
    if !REGEXPS.unlikely_candidates.is_match(&match_string) {
        return false;
    }
    if REGEXPS.ok_maybe_its_a_candidate.is_match(&match_string) {
        return false;
    }
    if traversal::has_ancestor_tag(node, "TABLE", None) || traversal::has_ancestor_tag(node, "CODE", None) {
        return false;
    }
    !dom::has_any_tag(node, &["BODY", "A"])
}

fn has_unlikely_role(node: &Node) -> bool {
    dom::get_attr(node, "role")
        .map(|role| UNLIKELY_ROLES.iter().any(|r| r.eq_ignore_ascii_case(role.trim())))
        .unwrap_or(false)
}

fn byline_candidate_text(node: &Node) -> Option<String> {
    let is_byline_marked = dom::get_attr(node, "rel").as_deref() == Some("author")
        || dom::get_attr(node, "itemprop").as_deref() == Some("author")
        || REGEXPS.byline.is_match(&dom::match_string(node));
    if !is_byline_marked {
        return None;
    }

    let text = if dom::get_attr(node, "itemprop").as_deref() == Some("author") {
        dom::select_one(node, "[itemprop=\"name\"]")
            .map(|n| dom::inner_text(&n, true))
            .unwrap_or_else(|| dom::inner_text(node, true))
    } else {
        dom::inner_text(node, true)
    };

    if text.is_empty() || text.len() > 100 {
        None
    } else {
        Some(text)
    }
}

/// Walk `root` depth-first, removing unlikely-candidate subtrees (while
/// `STRIP_UNLIKELYS` is set) and empty containers, recording the first
/// inline byline encountered.
pub fn clean(root: &Node, flags: ParseFlags) -> CleanResult {
    let mut result = CleanResult::default();
    let mut current = root.children().find(|c| dom::is_element(c) || dom::is_text(c));

    while let Some(node) = current {
        if !dom::is_element(&node) {
            current = traversal::next_node(&node, root);
            continue;
        }

        if flags.contains(ParseFlags::STRIP_UNLIKELYS) && (is_unlikely_candidate(&node) || has_unlikely_role(&node)) {
            current = traversal::next_node_after_removal(&node, root);
            dom::remove_node(&node);
            continue;
        }

        if result.byline.is_none() {
            if let Some(text) = byline_candidate_text(&node) {
                result.byline = Some(text);
                current = traversal::next_node_after_removal(&node, root);
                dom::remove_node(&node);
                continue;
            }
        }

        if is_removable_empty_container(&node) {
            current = traversal::next_node_after_removal(&node, root);
            dom::remove_node(&node);
            continue;
        }

        current = traversal::next_node(&node, root);
    }

    result
}

fn is_removable_empty_container(node: &Node) -> bool {
    if dom::has_any_tag(node, &["SECTION", "HEADER", "FOOTER", "ASIDE", "DIV"]) {
        return traversal::is_element_without_content(node);
    }
    if dom::has_tag(node, "P") {
        let has_media = !dom::select(node, "img, video, picture").is_empty();
        return dom::inner_text(node, true).is_empty() && !has_media;
    }
    false
}
