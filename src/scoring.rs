//! Node scoring (§4.6): tag base weights, class/id weighting, link density,
//! leaf scoring for scoring-eligible tags, and ancestor score propagation.

use crate::constants::{ParseFlags, REGEXPS, SCORE_ANCESTOR_MAX_DEPTH};
use crate::dom::{self, Node};
use crate::node_store::{NodeScore, NodeStore};
use crate::traversal;
use crate::visibility;

fn base_tag_score(tag: &str) -> f64 {
    match tag {
        "DIV" => 5.0,
        "PRE" | "TD" | "BLOCKQUOTE" => 3.0,
        "ADDRESS" | "OL" | "UL" | "DL" | "DD" | "DT" | "LI" | "FORM" => -3.0,
        "H1" | "H2" | "H3" | "H4" | "H5" | "H6" | "TH" => -5.0,
        _ => 0.0,
    }
}

/// Class/id based weighting, active only under `WEIGHT_CLASSES` (§4.6).
pub fn class_weight(node: &Node, flags: ParseFlags) -> f64 {
    if !flags.contains(ParseFlags::WEIGHT_CLASSES) {
        return 0.0;
    }
    let mut weight = 0.0;
    let class = dom::class_of(node);
    if !class.is_empty() {
        if REGEXPS.negative.is_match(&class) {
            weight -= 25.0;
        }
        if REGEXPS.positive.is_match(&class) {
            weight += 25.0;
        }
    }
    let id = dom::id_of(node);
    if !id.is_empty() {
        if REGEXPS.negative.is_match(&id) {
            weight -= 25.0;
        }
        if REGEXPS.positive.is_match(&id) {
            weight += 25.0;
        }
    }
    weight
}

/// Ensure `node` has an initialized score entry, seeding it from the tag base
/// score plus class weight the first time it's encountered.
pub fn initialize_node(node: &Node, store: &mut NodeStore, flags: ParseFlags) {
    if store.is_initialized(node) {
        return;
    }
    let tag = dom::tag_name(node).unwrap_or_default();
    let score = base_tag_score(&tag) + class_weight(node, flags);
    store.set(node, NodeScore { content_score: score, initialized: true });
}

/// `linkDensity(e)` (§4.6): combined weighted length of anchor text over the
/// element's own text length. Hash-only links (`href="#..."`) count for less.
pub fn link_density(node: &Node) -> f64 {
    let text_len = dom::inner_text(node, true).chars().count();
    if text_len == 0 {
        return 0.0;
    }
    let links = dom::select(node, "a");
    let weighted: f64 = links
        .iter()
        .map(|a| {
            let len = dom::inner_text(a, true).chars().count() as f64;
            let coefficient = match dom::get_attr(a, "href") {
                Some(href) if REGEXPS.hash_url.is_match(&href) => 0.3,
                _ => 1.0,
            };
            coefficient * len
        })
        .sum();
    weighted / (text_len.max(1) as f64)
}

/// Score a paragraph-like leaf candidate and propagate the result up the
/// ancestor chain (§4.6). No-op (returns 0 without touching the store) for
/// nodes with too little text or that are invisible for scoring purposes.
pub fn score_element(node: &Node, store: &mut NodeStore, flags: ParseFlags, link_density_modifier: f64) -> f64 {
    let text = dom::inner_text(node, true);
    if text.chars().count() < 25 {
        return 0.0;
    }
    if !visibility::is_probably_visible(node) {
        return 0.0;
    }

    initialize_node(node, store, flags);

    let comma_count = REGEXPS.commas.find_iter(&text).count() as f64;
    let length_bonus = ((text.chars().count() / 100) as f64).min(3.0);
    let mut leaf_score = store.content_score(node) + comma_count + length_bonus;

    let density = link_density(node);
    leaf_score *= 1.0 - density + link_density_modifier;

    store.set(node, NodeScore { content_score: leaf_score, initialized: true });
    propagate_to_ancestors(node, leaf_score, store, flags);
    leaf_score
}

fn ancestor_divider(level: usize) -> f64 {
    match level {
        0 => 1.0,
        1 => 2.0,
        l => (l as f64) * 3.0,
    }
}

fn propagate_to_ancestors(node: &Node, leaf_score: f64, store: &mut NodeStore, flags: ParseFlags) {
    for (level, ancestor) in traversal::ancestors(node, Some(SCORE_ANCESTOR_MAX_DEPTH)).into_iter().enumerate() {
        if !dom::is_element(&ancestor) {
            continue;
        }
        initialize_node(&ancestor, store, flags);
        let delta = leaf_score / ancestor_divider(level);
        store.add_score(&ancestor, delta);
    }
}

/// Final candidate score as fed into `TopN`: `contentScore × (1 − linkDensity)` (§3, §8 invariant 5).
pub fn scaled_score(node: &Node, store: &NodeStore) -> f64 {
    store.content_score(node) * (1.0 - link_density(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{body_of, parse_document, select_one};

    #[test]
    fn base_tag_scores_match_table() {
        assert_eq!(base_tag_score("DIV"), 5.0);
        assert_eq!(base_tag_score("PRE"), 3.0);
        assert_eq!(base_tag_score("ADDRESS"), -3.0);
        assert_eq!(base_tag_score("H1"), -5.0);
        assert_eq!(base_tag_score("P"), 0.0);
    }

    #[test]
    fn short_leaf_scores_zero_without_initializing() {
        let doc = parse_document("<html><body><p>short</p></body></html>");
        let p = select_one(&body_of(&doc), "p").unwrap();
        let mut store = NodeStore::new();
        let score = score_element(&p, &mut store, ParseFlags::default(), 0.0);
        assert_eq!(score, 0.0);
        assert!(!store.is_initialized(&p));
    }

    #[test]
    fn long_leaf_propagates_to_parent() {
        let text = "word ".repeat(30);
        let html = format!("<html><body><div><p>{text}</p></div></body></html>");
        let doc = parse_document(&html);
        let body = body_of(&doc);
        let p = select_one(&body, "p").unwrap();
        let div = select_one(&body, "div").unwrap();
        let mut store = NodeStore::new();
        let leaf = score_element(&p, &mut store, ParseFlags::default(), 0.0);
        assert!(leaf > 0.0);
        assert!(store.is_initialized(&div));
        assert!(store.content_score(&div) > 0.0);
    }

    #[test]
    fn link_density_weighs_hash_links_less() {
        let doc = parse_document(
            r#"<html><body><p>real text content here <a href="#x">short</a></p></body></html>"#,
        );
        let p = select_one(&body_of(&doc), "p").unwrap();
        let density = link_density(&p);
        assert!(density > 0.0 && density < 0.3);
    }
}
