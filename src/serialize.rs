//! Attribute & class scrubbing, final serialization (§4.13).

use std::collections::HashSet;

use crate::constants::ALLOWED_ATTRIBUTES;
use crate::dom::{self, Node};

/// Strip every attribute not in the allowed set, honoring `keepClasses` /
/// `classesToPreserve`, and serialize the article wrapper to HTML.
pub fn finalize(article_root: &Node, keep_classes: bool, classes_to_preserve: &HashSet<String>) -> (String, String) {
    for node in dom::select(article_root, "*") {
        scrub_attributes(&node, keep_classes, classes_to_preserve);
    }
    scrub_attributes(article_root, keep_classes, classes_to_preserve);

    let content = dom::outer_html(article_root);
    let text_content = dom::inner_text(article_root, true);
    (content, text_content)
}

fn scrub_attributes(node: &Node, keep_classes: bool, classes_to_preserve: &HashSet<String>) {
    let Some(element) = node.as_element() else {
        return;
    };
    let existing: Vec<String> = element.attributes.borrow().map.keys().map(|n| n.local.to_string()).collect();

    for name in existing {
        if name == "class" {
            continue;
        }
        if name == "id" {
            let keep = dom::get_attr(node, "id").map(|v| v.starts_with("readability-")).unwrap_or(false);
            if !keep {
                dom::remove_attr(node, "id");
            }
            continue;
        }
        if !ALLOWED_ATTRIBUTES.contains(&name.as_str()) {
            dom::remove_attr(node, &name);
        }
    }

    scrub_class(node, keep_classes, classes_to_preserve);
}

fn scrub_class(node: &Node, keep_classes: bool, classes_to_preserve: &HashSet<String>) {
    if keep_classes {
        return;
    }
    let Some(class_value) = dom::get_attr(node, "class") else {
        return;
    };
    let kept: Vec<&str> = class_value
        .split_whitespace()
        .filter(|tok| *tok == "page" || classes_to_preserve.contains(*tok))
        .collect();
    if kept.is_empty() {
        dom::remove_attr(node, "class");
    } else {
        dom::set_attr(node, "class", &kept.join(" "));
    }
}
