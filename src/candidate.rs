//! Candidate selector (§4.8): TopN maintenance, empty-TopN body promotion,
//! alternative common-ancestor analysis, and the parent-walk step.

use crate::constants::{MINIMUM_TOPCANDIDATES, MIN_SCORE_RATIO_FOR_ALTERNATIVE};
use crate::dom::{self, Node};
use crate::node_store::{Candidate, NodeStore, TopN};
use crate::scoring;
use crate::traversal;

/// Build a `TopN` from every node the store has an initialized score for.
pub fn build_top_candidates(root: &Node, store: &NodeStore, capacity: usize) -> TopN {
    let mut top = TopN::new(capacity);
    for node in dom::select(root, "*") {
        if !store.is_initialized(&node) {
            continue;
        }
        top.insert(Candidate { node: node.clone(), scaled_score: scoring::scaled_score(&node, store) });
    }
    top
}

/// Select (and possibly promote) the final top candidate, applying
/// alternative-ancestor analysis and the parent-walk step.
pub fn select_top_candidate(root: &Node, top: &TopN, store: &mut NodeStore) -> Node {
    let Some(best) = top.best() else {
        return promote_body_as_candidate(root, store);
    };

    let promoted = alternative_ancestor(top, store).unwrap_or_else(|| best.node.clone());
    walk_to_better_parent(root, &promoted, store)
}

/// §4.8: when `TopN` is empty, promote the body (or a synthetic wrapper) as
/// the article root, wrapping non-whitespace child runs into a single `<div>`.
fn promote_body_as_candidate(root: &Node, store: &mut NodeStore) -> Node {
    let wrapper = dom::create_element("div", &[], "");
    let children: Vec<Node> = root.children().collect();
    dom::append_child(root, wrapper.clone());
    for child in children {
        if dom::is_text(&child) && child.text_contents().trim().is_empty() {
            dom::remove_node(&child);
            continue;
        }
        dom::append_child(&wrapper, child);
    }
    store.set(&wrapper, crate::node_store::NodeScore { content_score: 0.0, initialized: true });
    wrapper
}

/// If ≥ `MINIMUM_TOPCANDIDATES` entries share a common non-`BODY` ancestor
/// with the best candidate, promote that ancestor, accumulating its score
/// from previously-scored descendants plus its own initialized score.
fn alternative_ancestor(top: &TopN, store: &mut NodeStore) -> Option<Node> {
    if top.len() < MINIMUM_TOPCANDIDATES {
        return None;
    }
    let best = &top.entries()[0].node;
    let best_ancestors = traversal::ancestors(best, None);

    for ancestor in &best_ancestors {
        if dom::has_tag(ancestor, "BODY") {
            break;
        }
        let sharing = top
            .entries()
            .iter()
            .filter(|c| traversal::ancestors(&c.node, None).iter().any(|a| traversal::same_node(a, ancestor)))
            .count();
        if sharing >= MINIMUM_TOPCANDIDATES {
            let descendants_sum: f64 = top
                .entries()
                .iter()
                .filter(|c| !traversal::same_node(&c.node, ancestor))
                .filter(|c| traversal::ancestors(&c.node, None).iter().any(|a| traversal::same_node(a, ancestor)))
                .map(|c| store.content_score(&c.node))
                .sum();
            let own_score = store.content_score(ancestor);
            store.set(
                ancestor,
                crate::node_store::NodeScore { content_score: descendants_sum + own_score, initialized: true },
            );
            return Some(ancestor.clone());
        }
    }
    None
}

/// Walk parents of `candidate`, switching to a parent once its score reaches
/// `MIN_SCORE_RATIO_FOR_ALTERNATIVE` of the candidate's score. Stops at `BODY`.
fn walk_to_better_parent(root: &Node, candidate: &Node, store: &NodeStore) -> Node {
    let mut current = candidate.clone();
    let mut current_score = store.content_score(&current);

    while let Some(parent) = dom::parent_element(&current) {
        if dom::has_tag(&parent, "BODY") || traversal::same_node(&parent, root) {
            break;
        }
        if !store.is_initialized(&parent) {
            break;
        }
        let parent_score = store.content_score(&parent);
        if parent_score >= MIN_SCORE_RATIO_FOR_ALTERNATIVE * current_score {
            current = parent;
            current_score = store.content_score(&current);
        } else {
            break;
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ParseFlags;
    use crate::dom::{body_of, parse_document, select_one};

    #[test]
    fn empty_topn_promotes_body_children() {
        let doc = parse_document("<html><body>hello <b>world</b></body></html>");
        let body = body_of(&doc);
        let mut store = NodeStore::new();
        let top = TopN::new(5);
        let candidate = select_top_candidate(&body, &top, &mut store);
        assert!(dom::has_tag(&candidate, "DIV"));
    }

    #[test]
    fn scores_best_leaf_as_top_candidate_without_siblings() {
        let text = "word ".repeat(30);
        let html = format!("<html><body><div><p>{text}</p></div></body></html>");
        let doc = parse_document(&html);
        let body = body_of(&doc);
        let p = select_one(&body, "p").unwrap();
        let mut store = NodeStore::new();
        scoring::score_element(&p, &mut store, ParseFlags::default(), 0.0);
        let top = build_top_candidates(&body, &store, 5);
        assert!(!top.is_empty());
        let candidate = select_top_candidate(&body, &top, &mut store);
        assert!(dom::is_element(&candidate));
    }
}
