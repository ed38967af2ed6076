//! Document preparer (§4.5): the preprocessing pass that runs once per
//! attempt, before metadata extraction and scoring.

use crate::dom::{self, Node};
use crate::traversal;
use crate::visibility;

const UNWANTED_SELECTOR: &str = "script, noscript, style, template, iframe, object, embed";

/// Run all four preprocessing steps, in order, over `root` (the `<body>` subtree).
pub fn prepare_document(root: &Node) {
    remove_unwanted_tags(root);
    strict_remove_hidden(root);
    convert_br_runs_to_paragraphs(root);
    convert_font_to_span(root);
}

fn remove_unwanted_tags(root: &Node) {
    for node in dom::select(root, UNWANTED_SELECTOR) {
        dom::remove_node(&node);
    }
}

fn strict_remove_hidden(root: &Node) {
    // Collect first: removing an ancestor drops its descendants, so walking
    // live while mutating would skip or double-visit nodes.
    let candidates = dom::select(root, "*");
    for node in candidates {
        if node.parent().is_none() {
            // Already detached by an ancestor's removal earlier in this pass.
            continue;
        }
        if visibility::should_strictly_remove(&node) {
            dom::remove_node(&node);
        }
    }
}

/// Replace runs of two-or-more `<br>` separated only by whitespace text with
/// a `<p>` that absorbs the following inline run up to the next block
/// element or the end of the parent.
fn convert_br_runs_to_paragraphs(root: &Node) {
    let brs = dom::select(root, "br");
    let mut seen = std::collections::HashSet::new();

    for br in brs {
        let key = dom::node_key(&br);
        if seen.contains(&key) || br.parent().is_none() {
            continue;
        }

        // Walk forward absorbing every further <br> separated only by whitespace
        // text into `run`, so a run of two or more collapses as one boundary
        // instead of pairing up only the first two.
        let mut run = vec![br.clone()];
        let mut pending_whitespace: Vec<Node> = Vec::new();
        let mut probe = br.next_sibling();
        while let Some(n) = probe {
            if dom::is_text(&n) && n.text_contents().trim().is_empty() {
                let next = n.next_sibling();
                pending_whitespace.push(n);
                probe = next;
                continue;
            }
            if dom::has_tag(&n, "BR") {
                let next = n.next_sibling();
                run.append(&mut pending_whitespace);
                seen.insert(dom::node_key(&n));
                run.push(n);
                probe = next;
                continue;
            }
            break;
        }

        if run.len() < 2 {
            continue;
        }

        let p = dom::create_element("p", &[], "");
        dom::insert_before(&br, p.clone());

        let last_br = run.last().unwrap().clone();
        let mut cursor = last_br.next_sibling();
        for node in &run {
            dom::remove_node(node);
        }

        while let Some(n) = cursor {
            let next = n.next_sibling();
            if dom::has_tag(&n, "BR") {
                // A further <br> starts the next run; leave it for the outer loop.
                break;
            }
            if dom::is_element(&n) && !traversal::is_phrasing_node(&n) {
                break;
            }
            dom::remove_node(&n);
            dom::append_child(&p, n);
            cursor = next;
        }
    }
}

/// Replace every `<font>` with a `<span>` holding the same children; styling
/// attributes are intentionally dropped.
fn convert_font_to_span(root: &Node) {
    for font in dom::select(root, "font") {
        let inner = dom::inner_html(&font);
        let span = dom::create_element("span", &[], &inner);
        dom::replace_node(&font, &span);
    }
}
