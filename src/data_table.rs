//! Data-table detection (§4.12): a `<table>` is marked as a data table, and
//! therefore protected from conditional cleaning, when it looks structured
//! rather than used for layout.

use crate::dom::{self, Node};

const DATA_TABLE_ATTR: &str = "data-readability-table-is-data-table";

pub fn mark_data_tables(root: &Node) {
    for table in dom::select(root, "table") {
        let is_data = is_data_table(&table);
        dom::set_attr(&table, DATA_TABLE_ATTR, if is_data { "true" } else { "false" });
    }
}

pub fn is_marked_data_table(table: &Node) -> bool {
    dom::get_attr(table, DATA_TABLE_ATTR).as_deref() == Some("true")
}

/// True if any ancestor `<table>` of `node` is a marked data table. Used by
/// `cleanConditionally` to protect everything nested inside one (§4.11 step 3).
pub fn has_data_table_ancestor(node: &Node) -> bool {
    let mut current = node.clone();
    while let Some(parent) = dom::parent_element(&current) {
        if dom::has_tag(&parent, "TABLE") && is_marked_data_table(&parent) {
            return true;
        }
        current = parent;
    }
    false
}

/// True if `node` itself contains a marked data table among its descendants.
pub fn contains_data_table(node: &Node) -> bool {
    dom::select(node, "table").iter().any(is_marked_data_table)
}

fn is_data_table(table: &Node) -> bool {
    if let Some(role) = dom::get_attr(table, "role") {
        if ["grid", "list", "treegrid"].contains(&role.to_lowercase().as_str()) {
            return true;
        }
    }
    if dom::has_attr(table, "summary") {
        return true;
    }
    if !dom::select(table, "caption").is_empty() || !dom::select(table, "thead").is_empty() {
        return true;
    }
    if !dom::select(table, "th").is_empty() {
        return true;
    }
    if dom::select(table, "tr").iter().any(|tr| dom::get_attr(tr, "role").as_deref() == Some("row")) {
        return true;
    }

    let rows = dom::select(table, "tr").len();
    let cells = dom::select(table, "td, th").len();
    let columns = dom::select(table, "tr")
        .first()
        .map(|tr| dom::children_elements(tr).len())
        .unwrap_or(0);

    if cells > 10 || rows > 2 || columns > 2 {
        let has_content = dom::inner_text(table, true).len() > 10;
        return has_content;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{body_of, parse_document, select_one};

    #[test]
    fn table_with_thead_is_data_table() {
        let doc = parse_document("<html><body><table><thead><tr><th>a</th></tr></thead></table></body></html>");
        let body = body_of(&doc);
        mark_data_tables(&body);
        let table = select_one(&body, "table").unwrap();
        assert!(is_marked_data_table(&table));
    }

    #[test]
    fn small_layout_table_is_not_data_table() {
        let doc = parse_document("<html><body><table><tr><td>x</td></tr></table></body></html>");
        let body = body_of(&doc);
        mark_data_tables(&body);
        let table = select_one(&body, "table").unwrap();
        assert!(!is_marked_data_table(&table));
    }
}
