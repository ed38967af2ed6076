//! Metadata extractor (§4.4): JSON-LD blocks and `<meta>` tags, resolved into
//! a prioritized view of title/byline/excerpt/site name/published time, plus
//! `<html lang>`/`dir`.

use std::collections::HashMap;

use serde_json::Value;

use crate::constants::{JSON_LD_ARTICLE_TYPES, REGEXPS};
use crate::dom::{self, Node};
use crate::utils::decode_html_entities;

#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub title: Option<String>,
    pub byline: Option<String>,
    pub excerpt: Option<String>,
    pub site_name: Option<String>,
    pub published_time: Option<String>,
    pub lang: Option<String>,
    pub dir: Option<String>,
}

#[derive(Default)]
struct JsonLdFields {
    title: Option<String>,
    byline: Option<String>,
    excerpt: Option<String>,
    site_name: Option<String>,
    published_time: Option<String>,
}

pub fn extract_metadata(root: &Node, document: &Node, disable_json_ld: bool) -> Metadata {
    let meta = collect_meta_tags(document);
    let json_ld = if disable_json_ld { JsonLdFields::default() } else { extract_json_ld(document) };

    let title = json_ld
        .title
        .clone()
        .or_else(|| first_meta(&meta, &["dc.title", "dcterms.title", "dc:title", "dcterms:title"]))
        .or_else(|| first_meta(&meta, &["og:title"]))
        .or_else(|| first_meta(&meta, &["twitter:title"]))
        .or_else(|| first_meta(&meta, &["parsely-title"]))
        .or_else(|| dom::select_one(document, "title").map(|n| dom::inner_text(&n, true)));

    let byline = json_ld
        .byline
        .clone()
        .or_else(|| first_meta(&meta, &["dc.creator", "dcterms.creator", "dc:creator", "dcterms:creator"]))
        .or_else(|| first_meta(&meta, &["author"]))
        .or_else(|| first_meta(&meta, &["parsely-author"]))
        .or_else(|| first_meta(&meta, &["weibo:article:author", "weibo:webpage:author"]))
        .or_else(|| first_meta(&meta, &["twitter:creator"]))
        .or_else(|| first_meta(&meta, &["og:author"]));

    let excerpt = json_ld
        .excerpt
        .clone()
        .or_else(|| first_meta(&meta, &["dc.description", "dcterms.description", "dc:description", "dcterms:description"]))
        .or_else(|| first_meta(&meta, &["og:description"]))
        .or_else(|| first_meta(&meta, &["weibo:article:description", "weibo:webpage:description"]))
        .or_else(|| first_meta(&meta, &["description"]))
        .or_else(|| first_meta(&meta, &["twitter:description"]));

    let site_name = json_ld
        .site_name
        .clone()
        .or_else(|| first_meta(&meta, &["og:site_name"]))
        .or_else(|| first_meta(&meta, &["twitter:site"]))
        .or_else(|| first_meta(&meta, &["dc.publisher", "dcterms.publisher", "dc:publisher", "dcterms:publisher"]));

    let published_time = json_ld.published_time.clone();

    let lang = dom::select_one(document, "html").and_then(|html| dom::get_attr(&html, "lang"));
    let dir = dom::select_one(document, "html").and_then(|html| dom::get_attr(&html, "dir"));

    let _ = root;
    Metadata {
        title: title.map(|t| decode_html_entities(&t)),
        byline: byline.map(|t| decode_html_entities(&t)),
        excerpt: excerpt.map(|t| decode_html_entities(&t)),
        site_name: site_name.map(|t| decode_html_entities(&t)),
        published_time: published_time.map(|t| decode_html_entities(&t)),
        lang,
        dir,
    }
}

/// `name`/`property` (case-insensitive, space-separated tokens on one tag) → `content`.
fn collect_meta_tags(document: &Node) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for meta in dom::select(document, "meta") {
        let Some(content) = dom::get_attr(&meta, "content") else {
            continue;
        };
        let keys = dom::get_attr(&meta, "name")
            .into_iter()
            .chain(dom::get_attr(&meta, "property").into_iter())
            .flat_map(|attr| attr.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>());
        for key in keys {
            map.entry(key).or_insert_with(|| content.clone());
        }
    }
    map
}

fn first_meta(meta: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| meta.get(*k)).cloned().filter(|v| !v.is_empty())
}

fn extract_json_ld(document: &Node) -> JsonLdFields {
    for script in dom::select(document, r#"script[type="application/ld+json"]"#) {
        let raw = dom::inner_text(&script, false);
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };
        if let Some(fields) = fields_from_json_ld_value(&value) {
            return fields;
        }
    }
    JsonLdFields::default()
}

fn fields_from_json_ld_value(value: &Value) -> Option<JsonLdFields> {
    match value {
        Value::Array(items) => items.iter().find_map(fields_from_json_ld_value),
        Value::Object(obj) => {
            if let Some(graph) = obj.get("@graph") {
                if let Some(found) = fields_from_json_ld_value(graph) {
                    return Some(found);
                }
            }
            if !is_article_type(obj.get("@type")) {
                return None;
            }
            Some(JsonLdFields {
                title: obj.get("headline").and_then(Value::as_str).map(str::to_string),
                byline: obj.get("author").and_then(author_to_string),
                excerpt: obj.get("description").and_then(Value::as_str).map(str::to_string),
                site_name: obj.get("publisher").and_then(publisher_name),
                published_time: obj.get("datePublished").and_then(Value::as_str).map(str::to_string),
            })
        }
        _ => None,
    }
}

fn is_article_type(type_value: Option<&Value>) -> bool {
    match type_value {
        Some(Value::String(s)) => JSON_LD_ARTICLE_TYPES.iter().any(|t| t == s) || REGEXPS.json_ld_article_types.is_match(s),
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).any(|s| JSON_LD_ARTICLE_TYPES.contains(&s)),
        _ => false,
    }
}

fn author_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
        Value::Array(items) => {
            let names: Vec<String> = items.iter().filter_map(author_to_string).collect();
            if names.is_empty() { None } else { Some(names.join(", ")) }
        }
        _ => None,
    }
}

fn publisher_name(value: &Value) -> Option<String> {
    match value {
        Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
