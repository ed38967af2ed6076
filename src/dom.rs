//! Thin adapter over the `kuchikikiki` mutable HTML tree.
//!
//! The rest of the pipeline never touches `kuchikikiki` types directly except
//! through [`NodeRef`] (re-exported here) and the functions below. This keeps
//! the one place that has to know exact DOM-crate plumbing small, mirroring
//! the "DOM adapter" external contract the extraction core is specified
//! against (§4.1): parse, read/write attributes, mutate the tree, iterate
//! children, clone, and serialize.

use kuchikikiki::{traits::*, NodeData, NodeRef};

pub use kuchikikiki::NodeRef as Node;

/// Parse a full HTML document and return its root node.
pub fn parse_document(html: &str) -> NodeRef {
    kuchikikiki::parse_html().one(html)
}

/// Locate `<body>` under a parsed document, falling back to the document
/// root itself for fragment-ish input that never got a body inserted.
pub fn body_of(document: &NodeRef) -> NodeRef {
    document
        .select("body")
        .ok()
        .and_then(|mut it| it.next())
        .map(|m| m.as_node().clone())
        .unwrap_or_else(|| document.clone())
}

/// Stable identity for a node, valid as long as some `NodeRef` clone (e.g. one
/// held inside a score store) keeps the underlying allocation alive. Detaching
/// a node from the tree does not invalidate this key by itself; the caller is
/// responsible for dropping the corresponding store entry (§3 invariants).
pub fn node_key(node: &NodeRef) -> usize {
    node.data() as *const NodeData as usize
}

/// Uppercased tag name, or `None` for non-element nodes.
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|e| e.name.local.to_uppercase())
}

pub fn is_element(node: &NodeRef) -> bool {
    node.as_element().is_some()
}

pub fn is_text(node: &NodeRef) -> bool {
    node.as_text().is_some()
}

pub fn has_tag(node: &NodeRef, tag: &str) -> bool {
    tag_name(node).map(|t| t.eq_ignore_ascii_case(tag)).unwrap_or(false)
}

pub fn has_any_tag(node: &NodeRef, tags: &[&str]) -> bool {
    match tag_name(node) {
        Some(t) => tags.iter().any(|tag| tag.eq_ignore_ascii_case(&t)),
        None => false,
    }
}

pub fn get_attr(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element().and_then(|e| e.attributes.borrow().get(name).map(|v| v.to_string()))
}

pub fn has_attr(node: &NodeRef, name: &str) -> bool {
    node.as_element().map(|e| e.attributes.borrow().get(name).is_some()).unwrap_or(false)
}

pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(e) = node.as_element() {
        e.attributes.borrow_mut().insert(name, value.to_string());
    }
}

pub fn remove_attr(node: &NodeRef, name: &str) {
    if let Some(e) = node.as_element() {
        e.attributes.borrow_mut().remove(name);
    }
}

/// `class` attribute, or the empty string.
pub fn class_of(node: &NodeRef) -> String {
    get_attr(node, "class").unwrap_or_default()
}

/// `id` attribute, or the empty string.
pub fn id_of(node: &NodeRef) -> String {
    get_attr(node, "id").unwrap_or_default()
}

/// `"{class} {id}"`, the string the class/id regexes are matched against throughout.
pub fn match_string(node: &NodeRef) -> String {
    format!("{} {}", class_of(node), id_of(node))
}

/// Collapsed, trimmed text content of a subtree (`innerText`, §4.1).
pub fn inner_text(node: &NodeRef, normalize_spaces: bool) -> String {
    let text = node.text_contents();
    let trimmed = text.trim();
    if normalize_spaces {
        crate::utils::normalize_whitespace(trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Serialize a node and its descendants to HTML (outerHTML).
pub fn outer_html(node: &NodeRef) -> String {
    let mut buf = Vec::new();
    if node.serialize(&mut buf).is_ok() {
        String::from_utf8(buf).unwrap_or_default()
    } else {
        node.text_contents()
    }
}

/// Serialize only a node's children (innerHTML).
pub fn inner_html(node: &NodeRef) -> String {
    let mut buf = Vec::new();
    for child in node.children() {
        let _ = child.serialize(&mut buf);
    }
    String::from_utf8(buf).unwrap_or_default()
}

/// CSS-selector query scoped to a subtree, materialized eagerly so callers
/// can freely mutate the tree while iterating results.
pub fn select(node: &NodeRef, selector: &str) -> Vec<NodeRef> {
    match node.select(selector) {
        Ok(matches) => matches.map(|m| m.as_node().clone()).collect(),
        Err(()) => {
            tracing::warn!(selector, "invalid CSS selector");
            Vec::new()
        }
    }
}

pub fn select_one(node: &NodeRef, selector: &str) -> Option<NodeRef> {
    select(node, selector).into_iter().next()
}

pub fn children_elements(node: &NodeRef) -> Vec<NodeRef> {
    node.children().filter(|c| is_element(c)).collect()
}

pub fn first_element_child(node: &NodeRef) -> Option<NodeRef> {
    node.children().find(|c| is_element(c))
}

pub fn next_element_sibling(node: &NodeRef) -> Option<NodeRef> {
    let mut cur = node.next_sibling();
    while let Some(n) = cur {
        if is_element(&n) {
            return Some(n);
        }
        cur = n.next_sibling();
    }
    None
}

pub fn previous_element_sibling(node: &NodeRef) -> Option<NodeRef> {
    let mut cur = node.previous_sibling();
    while let Some(n) = cur {
        if is_element(&n) {
            return Some(n);
        }
        cur = n.previous_sibling();
    }
    None
}

pub fn parent_element(node: &NodeRef) -> Option<NodeRef> {
    node.parent()
}

/// Detach `node` from its parent.
pub fn remove_node(node: &NodeRef) {
    node.detach();
}

/// Insert `new_node` immediately before `reference`, then detach `reference`.
pub fn replace_node(reference: &NodeRef, new_node: &NodeRef) {
    reference.insert_before(new_node.clone());
    reference.detach();
}

pub fn append_child(parent: &NodeRef, child: NodeRef) {
    parent.append(child);
}

pub fn insert_before(reference: &NodeRef, new_node: NodeRef) {
    reference.insert_before(new_node);
}

/// Build a brand-new element via a parse round-trip: write `<tag attrs>inner</tag>`,
/// parse it in an `<html><body>` context, then lift the produced element back
/// out. This sidesteps needing the DOM crate's lower-level `html5ever` QualName
/// plumbing and mirrors the wrap-and-reparse technique already used elsewhere
/// in this codebase for fragment-local computations.
pub fn create_element(tag: &str, attrs: &[(&str, &str)], inner_html: &str) -> NodeRef {
    let attr_str: String =
        attrs.iter().map(|(k, v)| format!(" {}=\"{}\"", k, v_htmlescape::escape(v))).collect();
    let tag_lower = tag.to_lowercase();
    let wrapped = format!("<html><body><{tag_lower}{attr_str}>{inner_html}</{tag_lower}></body></html>");
    let doc = parse_document(&wrapped);
    let body = body_of(&doc);
    first_element_child(&body).unwrap_or(body)
}

/// Rename an element in place (preserving attributes and children) by
/// rewriting its outer tag markers and reparsing. Returns the replacement
/// node, already spliced into the tree in place of `node`.
pub fn rename_element(node: &NodeRef, new_tag: &str) -> NodeRef {
    let Some(old_tag) = tag_name(node) else {
        return node.clone();
    };
    let html = outer_html(node);
    let retagged = retag_outer(&html, &old_tag, new_tag);
    let wrapped = format!("<html><body>{retagged}</body></html>");
    let doc = parse_document(&wrapped);
    let body = body_of(&doc);
    let replacement = first_element_child(&body).unwrap_or(body);
    replace_node(node, &replacement);
    replacement
}

/// Replace the outermost `<old_tag ...>` / `</old_tag>` markers of a
/// self-contained outerHTML string with `new_tag`, leaving everything in
/// between (including nested elements of the same tag) untouched.
fn retag_outer(html: &str, old_tag: &str, new_tag: &str) -> String {
    let trimmed = html.trim();
    let Some(open_end) = find_unquoted_close_angle(trimmed) else {
        return trimmed.to_string();
    };
    let open_tag_inner = &trimmed[1..open_end];
    let rest = if open_tag_inner.len() >= old_tag.len() {
        &open_tag_inner[old_tag.len()..]
    } else {
        ""
    };
    let close_marker = format!("</{old_tag}>");
    let Some(close_start) = trimmed.rfind(&close_marker) else {
        return trimmed.to_string();
    };

    let mut out = String::with_capacity(trimmed.len());
    out.push('<');
    out.push_str(new_tag);
    out.push_str(rest);
    out.push_str(&trimmed[open_end + 1..close_start]);
    out.push_str("</");
    out.push_str(new_tag);
    out.push('>');
    out
}

/// Index of the `>` that closes the opening tag, skipping over any `>`
/// that appears inside a quoted attribute value (e.g. `title="5 > 3"`).
fn find_unquoted_close_angle(html: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, ch) in html.char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '>' => return Some(i),
                _ => {}
            },
        }
    }
    None
}

/// Deep-clone a subtree by serializing and reparsing it. Produces a node
/// disconnected from any tree, independent of the original's identity keys.
pub fn clone_node(node: &NodeRef) -> NodeRef {
    let html = outer_html(node);
    let wrapped = format!("<html><body>{html}</body></html>");
    let doc = parse_document(&wrapped);
    let body = body_of(&doc);
    first_element_child(&body).unwrap_or(body)
}

/// Count every element node in a subtree (used for `maxElemsToParse`).
pub fn count_elements(node: &NodeRef) -> usize {
    select(node, "*").len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_finds_body() {
        let doc = parse_document("<html><body><p>hi</p></body></html>");
        let body = body_of(&doc);
        assert!(has_tag(&first_element_child(&body).unwrap(), "p"));
    }

    #[test]
    fn attribute_round_trip() {
        let doc = parse_document(r#"<html><body><div class="x" id="y"></div></body></html>"#);
        let div = select_one(&body_of(&doc), "div").unwrap();
        assert_eq!(class_of(&div), "x");
        assert_eq!(id_of(&div), "y");
        set_attr(&div, "data-foo", "bar");
        assert_eq!(get_attr(&div, "data-foo").as_deref(), Some("bar"));
        remove_attr(&div, "data-foo");
        assert!(get_attr(&div, "data-foo").is_none());
    }

    #[test]
    fn retag_outer_skips_gt_inside_quoted_attribute() {
        let html = r#"<div title="5 > 3"><span>hi</span></div>"#;
        let retagged = retag_outer(html, "div", "p");
        assert_eq!(retagged, r#"<p title="5 > 3"><span>hi</span></p>"#);
    }

    #[test]
    fn rename_preserves_children_and_attributes() {
        let doc = parse_document(r#"<html><body><div class="x"><span>hi</span></div></body></html>"#);
        let div = select_one(&body_of(&doc), "div").unwrap();
        let renamed = rename_element(&div, "p");
        assert!(has_tag(&renamed, "p"));
        assert_eq!(class_of(&renamed), "x");
        assert!(outer_html(&renamed).contains("<span>hi</span>"));
    }

    #[test]
    fn create_element_builds_fresh_node() {
        let p = create_element("p", &[("class", "page")], "hello");
        assert!(has_tag(&p, "p"));
        assert_eq!(class_of(&p), "page");
        assert!(inner_text(&p, true).contains("hello"));
    }

    #[test]
    fn node_key_is_stable_across_lookups() {
        let doc = parse_document("<html><body><p>hi</p></body></html>");
        let body = body_of(&doc);
        let p1 = select_one(&body, "p").unwrap();
        let p2 = select_one(&body, "p").unwrap();
        assert_eq!(node_key(&p1), node_key(&p2));
    }
}
