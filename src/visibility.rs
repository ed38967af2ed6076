//! Visibility filter (§4.3): two different notions of "hidden" are needed —
//! one for scoring (skip invisible subtrees when computing scores) and one
//! for strict removal during preprocessing/cleaning, which carries narrower
//! carve-outs for media and math fallbacks.

use crate::dom::{self, Node};

fn style_hides(style: &str) -> bool {
    crate::constants::REGEXPS.display_none.is_match(style) || crate::constants::REGEXPS.visibility_hidden.is_match(style)
}

fn is_self_hidden(node: &Node) -> bool {
    if dom::has_attr(node, "hidden") {
        return true;
    }
    if let Some(style) = dom::get_attr(node, "style") {
        if style_hides(&style) {
            return true;
        }
    }
    if dom::get_attr(node, "aria-hidden").as_deref() == Some("true") {
        if dom::class_of(node).split_whitespace().any(|c| c == "fallback-image") {
            return false;
        }
        return true;
    }
    false
}

/// Whether `node` should be treated as visible when scoring (§4.6 leaf scoring
/// bails out on invisible nodes). Checks the node and every ancestor.
pub fn is_probably_visible(node: &Node) -> bool {
    if is_self_hidden(node) {
        return false;
    }
    for ancestor in crate::traversal::ancestors(node, None) {
        if is_self_hidden(&ancestor) {
            return false;
        }
    }
    true
}

/// Whether `node` is a media carve-out exempt from strict removal.
fn is_media_or_math_exception(node: &Node) -> bool {
    if dom::has_any_tag(node, &["IMG", "PICTURE", "SOURCE", "VIDEO", "AUDIO"]) {
        return true;
    }
    dom::class_of(node).contains("mwe-math")
}

/// Whether `node` should be dropped outright under the preprocessing strict
/// removal rule. Only looks at the node itself; callers walk the tree and
/// apply this per node since an ancestor being removed already takes its
/// descendants with it.
pub fn should_strictly_remove(node: &Node) -> bool {
    if is_media_or_math_exception(node) {
        return false;
    }
    if dom::has_attr(node, "hidden") {
        return true;
    }
    if let Some(style) = dom::get_attr(node, "style") {
        if style_hides(&style) {
            return true;
        }
    }
    dom::get_attr(node, "aria-hidden").as_deref() == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{body_of, parse_document, select_one};

    #[test]
    fn hidden_attribute_marks_invisible() {
        let doc = parse_document("<html><body><div hidden><p>x</p></div></body></html>");
        let body = body_of(&doc);
        let p = select_one(&body, "p").unwrap();
        assert!(!is_probably_visible(&p));
    }

    #[test]
    fn fallback_image_overrides_aria_hidden() {
        let doc = parse_document(r#"<html><body><img aria-hidden="true" class="fallback-image"></body></html>"#);
        let body = body_of(&doc);
        let img = select_one(&body, "img").unwrap();
        assert!(is_probably_visible(&img));
    }

    #[test]
    fn strict_removal_keeps_media_even_if_hidden() {
        let doc = parse_document(r#"<html><body><img hidden src="a.png"></body></html>"#);
        let body = body_of(&doc);
        let img = select_one(&body, "img").unwrap();
        assert!(!should_strictly_remove(&img));
    }

    #[test]
    fn strict_removal_drops_aria_hidden_div() {
        let doc = parse_document(r#"<html><body><div aria-hidden="true">x</div></body></html>"#);
        let body = body_of(&doc);
        let div = select_one(&body, "div").unwrap();
        assert!(should_strictly_remove(&div));
    }
}
