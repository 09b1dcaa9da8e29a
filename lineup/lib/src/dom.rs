//! Small helpers over the `kuchikiki` DOM.
//!
//! The enhancement pass needs a mutable tree (blocks are replaced in place),
//! so documents are parsed with `kuchikiki` rather than a read-only scraper.
//! These helpers keep attribute and class handling in one place.

use kuchikiki::NodeRef;
use kuchikiki::traits::*;

use crate::error::{LineupError, LineupResult};

/// Parses a complete HTML document.
///
/// Fragments are accepted too; the parser wraps them in `html`/`body`.
pub fn parse_document(html: &str) -> NodeRef {
    kuchikiki::parse_html().one(html)
}

/// Parses an HTML fragment and returns its top-level nodes, detached-ready.
pub fn parse_fragment_nodes(html: &str) -> Vec<NodeRef> {
    let document = parse_document(html);
    match document.select_first("body") {
        Ok(body) => body.as_node().children().collect(),
        Err(()) => Vec::new(),
    }
}

/// Serializes a node (including the node itself) back to HTML.
pub fn outer_html(node: &NodeRef) -> String {
    node.to_string()
}

/// Serializes only the children of a node.
pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}

/// Local tag name of an element node.
pub fn tag_name(node: &NodeRef) -> Option<String> {
    node.as_element().map(|element| element.name.local.to_string())
}

pub fn is_tag(node: &NodeRef, tag: &str) -> bool {
    node.as_element()
        .is_some_and(|element| element.name.local.as_ref().eq_ignore_ascii_case(tag))
}

pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()
        .and_then(|element| element.attributes.borrow().get(name).map(str::to_string))
}

pub fn set_attr(node: &NodeRef, name: &str, value: impl Into<String>) {
    if let Some(element) = node.as_element() {
        element.attributes.borrow_mut().insert(name, value.into());
    }
}

/// All attributes of an element as `(name, value)` pairs.
pub fn attributes(node: &NodeRef) -> Vec<(String, String)> {
    node.as_element()
        .map(|element| {
            element
                .attributes
                .borrow()
                .map
                .iter()
                .map(|(name, attribute)| (name.local.to_string(), attribute.value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

pub fn classes(node: &NodeRef) -> Vec<String> {
    attr(node, "class")
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn has_class(node: &NodeRef, class: &str) -> bool {
    attr(node, "class").is_some_and(|value| value.split_whitespace().any(|c| c == class))
}

pub fn add_class(node: &NodeRef, class: &str) {
    if has_class(node, class) {
        return;
    }
    let value = match attr(node, "class") {
        Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
        _ => class.to_string(),
    };
    set_attr(node, "class", value);
}

/// Swaps one class for another, adding `to` even when `from` is absent.
pub fn replace_class(node: &NodeRef, from: &str, to: &str) {
    let mut list: Vec<String> = classes(node).into_iter().filter(|c| c != from).collect();
    if !list.iter().any(|c| c == to) {
        list.push(to.to_string());
    }
    set_attr(node, "class", list.join(" "));
}

/// The `<id>` of the first `language-<id>` class on an element.
pub fn language_class(node: &NodeRef) -> Option<String> {
    classes(node)
        .into_iter()
        .find_map(|class| class.strip_prefix("language-").map(str::to_string))
        .filter(|language| !language.is_empty())
}

pub fn first_element_child(node: &NodeRef) -> Option<NodeRef> {
    node.children().find(|child| child.as_element().is_some())
}

/// Finds the element carrying `id` anywhere below (or at) `root`.
pub fn find_by_id(root: &NodeRef, id: &str) -> Option<NodeRef> {
    root.inclusive_descendants()
        .find(|node| attr(node, "id").as_deref() == Some(id))
}

/// Every element matching a CSS selector, in document order.
pub fn select_all(root: &NodeRef, selector: &str) -> LineupResult<Vec<NodeRef>> {
    let matches = root
        .select(selector)
        .map_err(|_| LineupError::InvalidSelector(selector.to_string()))?;
    Ok(matches.map(|element| element.as_node().clone()).collect())
}

/// Whether `node` or any of its ancestors carries `class`.
pub fn within_class(node: &NodeRef, class: &str) -> bool {
    node.inclusive_ancestors().any(|ancestor| has_class(&ancestor, class))
}

/// Replaces `target` with `replacements`, keeping its position among siblings.
pub fn replace_with(target: &NodeRef, replacements: Vec<NodeRef>) {
    for node in replacements {
        target.insert_before(node);
    }
    target.detach();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(root: &NodeRef, selector: &str) -> NodeRef {
        select_all(root, selector).unwrap().remove(0)
    }

    #[test]
    fn class_helpers_round_trip() {
        let doc = parse_document(r#"<pre class="highlight  language-rust">x</pre>"#);
        let pre = first(&doc, "pre");

        assert!(has_class(&pre, "highlight"));
        assert!(!has_class(&pre, "high"));
        assert_eq!(language_class(&pre), Some("rust".to_string()));

        add_class(&pre, "done");
        add_class(&pre, "done");
        assert_eq!(attr(&pre, "class").unwrap(), "highlight  language-rust done");

        replace_class(&pre, "highlight", "plain");
        assert_eq!(classes(&pre), vec!["language-rust", "done", "plain"]);
    }

    #[test]
    fn empty_language_class_is_ignored() {
        let doc = parse_document(r#"<code class="language-">x</code>"#);
        assert_eq!(language_class(&first(&doc, "code")), None);
    }

    #[test]
    fn invalid_selector_is_reported() {
        let doc = parse_document("<p>x</p>");
        let result = select_all(&doc, "p[");
        assert!(matches!(result, Err(LineupError::InvalidSelector(s)) if s == "p["));
    }

    #[test]
    fn replace_with_keeps_sibling_position() {
        let doc = parse_document("<div><p>a</p><pre>b</pre><p>c</p></div>");
        let pre = first(&doc, "pre");
        replace_with(&pre, parse_fragment_nodes("<section>B</section>"));

        let div = first(&doc, "div");
        assert_eq!(inner_html(&div), "<p>a</p><section>B</section><p>c</p>");
    }

    #[test]
    fn find_by_id_and_ancestry() {
        let doc = parse_document(r#"<div class="outer"><span id="target">t</span></div>"#);
        let span = find_by_id(&doc, "target").unwrap();
        assert!(within_class(&span, "outer"));
        assert!(!within_class(&span, "inner"));
        assert_eq!(tag_name(&span).as_deref(), Some("span"));
        assert!(find_by_id(&doc, "missing").is_none());
    }
}
