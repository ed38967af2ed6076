//! Tree-walking helpers built on top of [`crate::dom`]: depth-first "next
//! node" stepping, removal-aware stepping, ancestor walks, and the handful of
//! per-node predicates the cleaning passes share (§4.2).

use crate::dom::{self, Node};

/// Depth-first pre-order successor of `node` within `root`'s subtree,
/// skipping into children first, then siblings, then ancestors' siblings.
/// Returns `None` once traversal would leave `root`.
pub fn next_node(node: &Node, root: &Node) -> Option<Node> {
    if let Some(child) = node.children().find(|c| dom::is_element(c) || dom::is_text(c)) {
        return Some(child);
    }
    step_to_next_sibling_or_ancestor_sibling(node, root)
}

/// Like [`next_node`], but assumes `node` has just been (or is about to be)
/// detached from the tree: it does not look at `node`'s children at all,
/// since those are being discarded along with it.
pub fn next_node_after_removal(node: &Node, root: &Node) -> Option<Node> {
    step_to_next_sibling_or_ancestor_sibling(node, root)
}

fn step_to_next_sibling_or_ancestor_sibling(node: &Node, root: &Node) -> Option<Node> {
    let mut current = node.clone();
    loop {
        if let Some(sibling) = first_sibling_after(&current) {
            return Some(sibling);
        }
        match current.parent() {
            Some(parent) if !same_node(&parent, root) => current = parent,
            _ => return None,
        }
    }
}

fn first_sibling_after(node: &Node) -> Option<Node> {
    let mut cur = node.next_sibling();
    while let Some(n) = cur {
        if dom::is_element(&n) || dom::is_text(&n) {
            return Some(n);
        }
        cur = n.next_sibling();
    }
    None
}

pub fn same_node(a: &Node, b: &Node) -> bool {
    dom::node_key(a) == dom::node_key(b)
}

/// True if walking up from `node` actually reaches `root`. A one-hop
/// `parent().is_none()` check only catches a node detached directly; if one of
/// its ancestors was instead retagged/replaced (a reparse-and-splice, per
/// `dom::rename_element`/`dom::replace_node`), `node` is left rooted in an
/// orphaned subtree with a perfectly valid-looking (but dead) parent chain.
/// Walking all the way up is the only way to catch that.
pub fn is_attached(node: &Node, root: &Node) -> bool {
    if same_node(node, root) {
        return true;
    }
    let mut current = node.clone();
    while let Some(parent) = dom::parent_element(&current) {
        if same_node(&parent, root) {
            return true;
        }
        current = parent;
    }
    false
}

/// True if any ancestor of `node` (not including `node` itself) has `tag`.
pub fn has_ancestor_tag(node: &Node, tag: &str, max_depth: Option<usize>) -> bool {
    let mut depth = 0;
    let mut current = node.clone();
    while let Some(parent) = dom::parent_element(&current) {
        if let Some(limit) = max_depth {
            if depth >= limit {
                return false;
            }
        }
        if dom::has_tag(&parent, tag) {
            return true;
        }
        current = parent;
        depth += 1;
    }
    false
}

/// Ancestors of `node`, nearest first, up to `max_depth` levels (or all, if `None`).
pub fn ancestors(node: &Node, max_depth: Option<usize>) -> Vec<Node> {
    let mut result = Vec::new();
    let mut current = node.clone();
    while let Some(parent) = dom::parent_element(&current) {
        if let Some(limit) = max_depth {
            if result.len() >= limit {
                break;
            }
        }
        result.push(parent.clone());
        current = parent;
    }
    result
}

/// Whether `node` counts as phrasing (inline) content per the glossary's
/// phrasing element set, or is a text node. Shared by the `<br>`-run
/// absorption in `preparer.rs` and the phrasing-run wrapping in `div_to_p.rs`.
pub fn is_phrasing_node(node: &Node) -> bool {
    if dom::is_text(node) {
        return true;
    }
    match dom::tag_name(node) {
        Some(tag) => crate::constants::PHRASING_ELEMS.contains(&tag.as_str()),
        None => false,
    }
}

/// An element counts as "without content" if its text is empty/whitespace and
/// it has no `<br>`/embedded-media/img descendants.
pub fn is_element_without_content(node: &Node) -> bool {
    if !dom::is_element(node) {
        return false;
    }
    let text_len = dom::inner_text(node, true).len();
    if text_len != 0 {
        return false;
    }
    let meaningful_children = dom::select(node, "br, img, embed, object, iframe, video, audio, svg, canvas").len();
    meaningful_children == 0
}

/// Number of `<p>` and `<br>` descendants - used by the DIV→P heuristics (§4.10).
pub fn count_p_and_br(node: &Node) -> usize {
    dom::select(node, "p, br").len()
}

/// Number of (direct or nested) `<a>` descendants and their combined text length,
/// used throughout for link density.
pub fn link_stats(node: &Node) -> (usize, usize) {
    let links = dom::select(node, "a");
    let count = links.len();
    let chars: usize = links.iter().map(|a| dom::inner_text(a, true).len()).sum();
    (count, chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{body_of, parse_document, select_one};

    #[test]
    fn next_node_walks_depth_first() {
        let doc = parse_document("<html><body><div><p>a</p><p>b</p></div></body></html>");
        let body = body_of(&doc);
        let div = select_one(&body, "div").unwrap();
        let first_p = select_one(&div, "p").unwrap();
        let next = next_node(&first_p, &body).unwrap();
        assert_eq!(dom::inner_text(&next, true), "a");
        let after_text = next_node(&next, &body).unwrap();
        assert_eq!(dom::tag_name(&after_text), Some("P".to_string()));
    }

    #[test]
    fn ancestor_tag_detection() {
        let doc = parse_document("<html><body><article><section><p>x</p></section></article></body></html>");
        let body = body_of(&doc);
        let p = select_one(&body, "p").unwrap();
        assert!(has_ancestor_tag(&p, "ARTICLE", None));
        assert!(!has_ancestor_tag(&p, "NAV", None));
    }

    #[test]
    fn element_without_content_detects_empty_div() {
        let doc = parse_document("<html><body><div>   </div></body></html>");
        let body = body_of(&doc);
        let div = select_one(&body, "div").unwrap();
        assert!(is_element_without_content(&div));
    }

    #[test]
    fn element_without_content_keeps_image_only_div() {
        let doc = parse_document(r#"<html><body><div><img src="a.png"></div></body></html>"#);
        let body = body_of(&doc);
        let div = select_one(&body, "div").unwrap();
        assert!(!is_element_without_content(&div));
    }

    #[test]
    fn is_attached_true_for_live_descendant() {
        let doc = parse_document("<html><body><div><p>x</p></div></body></html>");
        let body = body_of(&doc);
        let p = select_one(&body, "p").unwrap();
        assert!(is_attached(&p, &body));
    }

    #[test]
    fn is_attached_false_once_ancestor_chain_is_detached() {
        let doc = parse_document("<html><body><div><p>x</p></div></body></html>");
        let body = body_of(&doc);
        let div = select_one(&body, "div").unwrap();
        let p = select_one(&div, "p").unwrap();
        dom::remove_node(&div);
        assert!(!is_attached(&p, &body));
    }
}
