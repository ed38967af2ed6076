//! Relative URL resolution: when a base URL is supplied, `href`/`src`/`srcset`
//! values on the article content are rewritten to absolute URLs before
//! serialization, so the extracted fragment is usable outside the page it
//! came from.

use crate::dom::{self, Node};

const URL_ATTRS: &[&str] = &["href", "src"];

/// Walk every element under `root` and resolve its `href`/`src`/`srcset`
/// against `base`. Left as-is on parse failure; hash, data:, and
/// already-absolute URLs are untouched by [`resolve`] itself.
pub fn fix_relative_uris(root: &Node, base: &url::Url) {
    for node in dom::select(root, "*") {
        for attr in URL_ATTRS {
            if let Some(value) = dom::get_attr(&node, attr) {
                let resolved = resolve(&value, base);
                if resolved != value {
                    dom::set_attr(&node, attr, &resolved);
                }
            }
        }
        if let Some(srcset) = dom::get_attr(&node, "srcset") {
            let resolved = resolve_srcset(&srcset, base);
            if resolved != srcset {
                dom::set_attr(&node, "srcset", &resolved);
            }
        }
    }
}

/// Resolve a single `href`/`src` value against `base`. Hash fragments, data
/// URIs, and already-absolute URLs pass through unchanged; anything the `url`
/// crate can't join against `base` is left as-is rather than dropped.
pub fn resolve(value: &str, base: &url::Url) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("data:") {
        return value.to_string();
    }
    if url::Url::parse(trimmed).is_ok() {
        return value.to_string();
    }
    match base.join(trimmed) {
        Ok(absolute) => absolute.to_string(),
        Err(_) => value.to_string(),
    }
}

/// Resolve every URL token in a `srcset` list (`"url width-or-density, url ..."`),
/// leaving the descriptor portion of each candidate untouched.
fn resolve_srcset(value: &str, base: &url::Url) -> String {
    value
        .split(',')
        .map(|candidate| {
            let candidate = candidate.trim();
            if candidate.is_empty() {
                return String::new();
            }
            match candidate.split_once(char::is_whitespace) {
                Some((url_part, descriptor)) => format!("{} {}", resolve(url_part, base), descriptor.trim()),
                None => resolve(candidate, base),
            }
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    fn base() -> url::Url {
        url::Url::parse("https://example.com/articles/page.html").unwrap()
    }

    #[test]
    fn resolves_relative_path_against_base() {
        assert_eq!(resolve("../img/a.png", &base()), "https://example.com/img/a.png");
    }

    #[test]
    fn leaves_absolute_url_untouched() {
        assert_eq!(resolve("https://other.com/x.png", &base()), "https://other.com/x.png");
    }

    #[test]
    fn leaves_hash_and_data_uri_untouched() {
        assert_eq!(resolve("#section", &base()), "#section");
        assert_eq!(resolve("data:image/png;base64,abc", &base()), "data:image/png;base64,abc");
    }

    #[test]
    fn resolves_srcset_candidates_independently() {
        let resolved = resolve_srcset("small.jpg 480w, ../big.jpg 800w", &base());
        assert_eq!(resolved, "https://example.com/articles/small.jpg 480w, https://example.com/big.jpg 800w");
    }

    #[test]
    fn fix_relative_uris_rewrites_href_src_and_srcset() {
        let doc = parse_document(
            r#"<html><body><a href="next.html">n</a><img src="pic.png" srcset="pic.png 1x, pic2x.png 2x"></body></html>"#,
        );
        fix_relative_uris(&doc, &base());
        let a = dom::select_one(&doc, "a").unwrap();
        assert_eq!(dom::get_attr(&a, "href").as_deref(), Some("https://example.com/articles/next.html"));
        let img = dom::select_one(&doc, "img").unwrap();
        assert_eq!(dom::get_attr(&img, "src").as_deref(), Some("https://example.com/articles/pic.png"));
        assert_eq!(
            dom::get_attr(&img, "srcset").as_deref(),
            Some("https://example.com/articles/pic.png 1x, https://example.com/articles/pic2x.png 2x")
        );
    }
}
