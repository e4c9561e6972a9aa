//! Base URL and symbol reference resolution
//!
//! A container boundary (`q:container`) scopes a base URL (`q:base`). A node
//! resolves references against the nearest boundary at or above it. That
//! boundary's base is relative to the base of its directly enclosing
//! boundary, which in turn is relative to the document base. Boundaries
//! further out are not consulted. Nodes outside every boundary use the
//! document base.

use crate::config::AttributeNames;
use crate::dom::{Dom, NodeId};
use crate::error::{LoaderError, LoaderResult};
use crate::symbol::SymbolRef;
use url::Url;

/// Base URL in effect for `node`
///
/// Walks `node` and its ancestors; nothing is cached, so the result follows
/// the tree as it is now.
pub fn resolve_base<D: Dom>(dom: &D, node: NodeId, attrs: &AttributeNames) -> LoaderResult<Url> {
    let mut boundaries = dom
        .ancestors(node)
        .filter(|&n| dom.attribute(n, &attrs.container).is_some());
    let nearest = boundaries.next();
    let enclosing = boundaries.next();

    let mut base = dom.base_uri().clone();
    for boundary in [enclosing, nearest].into_iter().flatten() {
        base = join_base(dom, boundary, attrs, base)?;
    }

    tracing::trace!(%node, ?nearest, ?enclosing, %base, "resolved base");
    Ok(base)
}

fn join_base<D: Dom>(
    dom: &D,
    boundary: NodeId,
    attrs: &AttributeNames,
    base: Url,
) -> LoaderResult<Url> {
    match dom.attribute(boundary, &attrs.base) {
        Some(raw) => base.join(raw).map_err(|source| LoaderError::InvalidBase {
            base: raw.to_string(),
            source,
        }),
        None => Ok(base),
    }
}

/// Resolve `raw` (absolute or relative) against the base of `node`
///
/// An absolute reference keeps its scheme, host, path and query; the
/// fragment carries through in both cases.
pub fn resolve_reference<D: Dom>(
    dom: &D,
    node: NodeId,
    raw: &str,
    attrs: &AttributeNames,
) -> LoaderResult<SymbolRef> {
    let base = resolve_base(dom, node, attrs)?;
    let url = base
        .join(raw)
        .map_err(|source| LoaderError::InvalidReference {
            reference: raw.to_string(),
            source,
        })?;
    Ok(SymbolRef::new(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn doc() -> Document {
        Document::new(Url::parse("http://document.qwik.dev/").unwrap())
    }

    fn attrs() -> AttributeNames {
        AttributeNames::default()
    }

    #[test]
    fn test_full_url_unchanged() {
        let mut doc = doc();
        let div = doc.create_element("div");
        let resolved = resolve_reference(&doc, div, "http://foo.bar/baz", &attrs()).unwrap();
        assert_eq!(resolved.to_string(), "http://foo.bar/baz");
    }

    #[test]
    fn test_full_url_keeps_fragment() {
        let mut doc = doc();
        let div = doc.create_element("div");
        doc.set_attribute(div, "q:container", "");
        doc.set_attribute(div, "q:base", "/ignored/");
        let resolved =
            resolve_reference(&doc, div, "https://cdn.dev/a.js?v=1#onClick", &attrs()).unwrap();
        assert_eq!(resolved.to_string(), "https://cdn.dev/a.js?v=1#onClick");
    }

    #[test]
    fn test_relative_against_document_base() {
        let mut doc = doc();
        let div = doc.create_element("div");
        let resolved = resolve_reference(&doc, div, "./bar", &attrs()).unwrap();
        assert_eq!(resolved.as_url().as_str(), "http://document.qwik.dev/bar");
        assert_eq!(
            resolve_base(&doc, div, &attrs()).unwrap(),
            *doc.base_uri()
        );
    }

    #[test]
    fn test_relative_against_own_container() {
        let mut doc = doc();
        let div = doc.create_element("div");
        doc.set_attribute(div, "q:container", "");
        doc.set_attribute(div, "q:base", "/baz/");
        let resolved = resolve_reference(&doc, div, "./bar", &attrs()).unwrap();
        assert_eq!(resolved.as_url().as_str(), "http://document.qwik.dev/baz/bar");
    }

    #[test]
    fn test_relative_against_parent_container() {
        let mut doc = doc();
        let div = doc.create_element("div");
        let parent = doc.create_element("parent");
        doc.append_child(doc.body(), parent);
        doc.append_child(parent, div);
        doc.set_attribute(parent, "q:container", "");
        doc.set_attribute(parent, "q:base", "./parent/");

        let resolved = resolve_reference(&doc, div, "./bar", &attrs()).unwrap();
        assert_eq!(
            resolved.as_url().as_str(),
            "http://document.qwik.dev/parent/bar"
        );
    }

    #[test]
    fn test_nested_containers() {
        let mut doc = doc();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        let button = doc.create_element("button");
        doc.append_child(doc.body(), outer);
        doc.append_child(outer, inner);
        doc.append_child(inner, button);
        doc.set_attribute(outer, "q:container", "");
        doc.set_attribute(outer, "q:base", "/p/");
        doc.set_attribute(inner, "q:container", "");
        doc.set_attribute(inner, "q:base", "./c/");

        let resolved = resolve_reference(&doc, button, "./x.js#h", &attrs()).unwrap();
        assert_eq!(resolved.as_url().as_str(), "http://document.qwik.dev/p/c/x.js#h");

        // Nodes between the two boundaries only see the outer one
        let outer_only = resolve_reference(&doc, outer, "./x.js", &attrs()).unwrap();
        assert_eq!(outer_only.as_url().as_str(), "http://document.qwik.dev/p/x.js");
    }

    #[test]
    fn test_grandparent_container_not_consulted() {
        let mut doc = doc();
        let grand = doc.create_element("div");
        let parent = doc.create_element("div");
        let child = doc.create_element("div");
        let button = doc.create_element("button");
        doc.append_child(doc.body(), grand);
        doc.append_child(grand, parent);
        doc.append_child(parent, child);
        doc.append_child(child, button);
        doc.set_attribute(grand, "q:container", "");
        doc.set_attribute(grand, "q:base", "/g/");
        doc.set_attribute(parent, "q:container", "");
        doc.set_attribute(parent, "q:base", "./p/");
        doc.set_attribute(child, "q:container", "");
        doc.set_attribute(child, "q:base", "./c/");

        let resolved = resolve_reference(&doc, button, "./x.js", &attrs()).unwrap();
        assert_eq!(resolved.as_url().as_str(), "http://document.qwik.dev/p/c/x.js");

        // One level up the grandparent becomes the enclosing boundary
        let in_parent = resolve_base(&doc, parent, &attrs()).unwrap();
        assert_eq!(in_parent.as_str(), "http://document.qwik.dev/g/p/");
    }

    #[test]
    fn test_enclosing_container_without_base() {
        let mut doc = doc();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner);
        doc.set_attribute(outer, "q:container", "");
        doc.set_attribute(inner, "q:container", "");
        doc.set_attribute(inner, "q:base", "./c/");

        let base = resolve_base(&doc, inner, &attrs()).unwrap();
        assert_eq!(base.as_str(), "http://document.qwik.dev/c/");
    }

    #[test]
    fn test_absolute_nested_base_wins() {
        let mut doc = doc();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner);
        doc.set_attribute(outer, "q:container", "");
        doc.set_attribute(outer, "q:base", "/p/");
        doc.set_attribute(inner, "q:container", "");
        doc.set_attribute(inner, "q:base", "https://cdn.qwik.dev/build/");

        let base = resolve_base(&doc, inner, &attrs()).unwrap();
        assert_eq!(base.as_str(), "https://cdn.qwik.dev/build/");
    }

    #[test]
    fn test_container_without_base() {
        let mut doc = doc();
        let div = doc.create_element("div");
        doc.set_attribute(div, "q:container", "");
        let base = resolve_base(&doc, div, &attrs()).unwrap();
        assert_eq!(base, *doc.base_uri());
    }

    #[test]
    fn test_base_attribute_without_container_is_ignored() {
        let mut doc = doc();
        let div = doc.create_element("div");
        doc.set_attribute(div, "q:base", "/baz/");
        let resolved = resolve_reference(&doc, div, "./bar", &attrs()).unwrap();
        assert_eq!(resolved.as_url().as_str(), "http://document.qwik.dev/bar");
    }

    #[test]
    fn test_invalid_base() {
        let mut doc = doc();
        let div = doc.create_element("div");
        doc.set_attribute(div, "q:container", "");
        doc.set_attribute(div, "q:base", "http://[::1");
        let result = resolve_base(&doc, div, &attrs());
        assert!(matches!(result, Err(LoaderError::InvalidBase { .. })));
    }

    #[test]
    fn test_follows_tree_changes() {
        let mut doc = doc();
        let container = doc.create_element("div");
        let div = doc.create_element("div");
        doc.set_attribute(container, "q:container", "");
        doc.set_attribute(container, "q:base", "/moved/");

        let before = resolve_base(&doc, div, &attrs()).unwrap();
        doc.append_child(container, div);
        let after = resolve_base(&doc, div, &attrs()).unwrap();

        assert_eq!(before.as_str(), "http://document.qwik.dev/");
        assert_eq!(after.as_str(), "http://document.qwik.dev/moved/");
    }
}
