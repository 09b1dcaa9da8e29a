//! Title slugs and heading anchors.
//!
//! Both are page-level concerns the host site usually owns, so they are
//! traits. The defaults here are enough for standalone use.

use kuchikiki::NodeRef;

use crate::classes;
use crate::dom;
use crate::error::LineupResult;

/// Turns a block title into the stem of its header id.
pub trait Slugger {
    fn slug(&self, title: &str) -> String;
}

/// Lowercase ASCII slugs; whitespace, `-` and `_` runs collapse to one `-`.
///
/// ```
/// use lineup_lib::anchors::{DefaultSlugger, Slugger};
///
/// assert_eq!(DefaultSlugger.slug("  Install the CLI_tool! "), "install-the-cli-tool");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSlugger;

impl Slugger for DefaultSlugger {
    fn slug(&self, title: &str) -> String {
        let mut slug = String::with_capacity(title.len());

        for c in title.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.ends_with('-') {
                slug.push('-');
            }
        }

        slug.trim_matches('-').to_string()
    }
}

impl<F> Slugger for F
where
    F: Fn(&str) -> String,
{
    fn slug(&self, title: &str) -> String {
        self(title)
    }
}

/// Adds permalink anchors to the elements matching a selector.
pub trait AnchorGenerator {
    /// Called once per pass with the selector for titled block headers.
    fn generate(&self, root: &NodeRef, selector: &str) -> LineupResult<()>;
}

/// Appends `<a class="code-block-anchor" href="#{id}">#</a>` to each match.
///
/// Elements that already hold an anchor are left alone, so repeated passes
/// do not stack them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermalinkAnchors;

impl AnchorGenerator for PermalinkAnchors {
    fn generate(&self, root: &NodeRef, selector: &str) -> LineupResult<()> {
        for target in dom::select_all(root, selector)? {
            let Some(id) = dom::attr(&target, "id") else {
                continue;
            };
            let anchored = target
                .children()
                .any(|child| dom::has_class(&child, classes::ANCHOR));
            if anchored {
                continue;
            }

            let html = format!(
                r##"<a class="{}" href="#{}" aria-label="Permalink">#</a>"##,
                classes::ANCHOR,
                html_escape::encode_double_quoted_attribute(&id),
            );
            for node in dom::parse_fragment_nodes(&html) {
                target.append(node);
            }
        }
        Ok(())
    }
}

/// An anchor generator that does nothing, for hosts that add their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnchors;

impl AnchorGenerator for NoAnchors {
    fn generate(&self, _root: &NodeRef, _selector: &str) -> LineupResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_separators_and_drops_symbols() {
        let slugger = DefaultSlugger;
        assert_eq!(slugger.slug("Hello, World"), "hello-world");
        assert_eq!(slugger.slug("a -- b__c"), "a-b-c");
        assert_eq!(slugger.slug("--x--"), "x");
        assert_eq!(slugger.slug("café au lait"), "caf-au-lait");
        assert_eq!(slugger.slug("!!!"), "");
    }

    #[test]
    fn closures_are_sluggers() {
        let upper = |title: &str| title.to_uppercase();
        assert_eq!(upper.slug("abc"), "ABC");
    }

    #[test]
    fn permalinks_are_appended_once() {
        let doc = dom::parse_document(
            r#"<span class="code-block-title" id="setup-0">Setup</span><span class="code-block-title">untitled</span>"#,
        );

        PermalinkAnchors.generate(&doc, ".code-block-title[id]").unwrap();
        PermalinkAnchors.generate(&doc, ".code-block-title[id]").unwrap();

        let anchors = dom::select_all(&doc, "a.code-block-anchor").unwrap();
        assert_eq!(anchors.len(), 1);
        assert_eq!(dom::attr(&anchors[0], "href").as_deref(), Some("#setup-0"));
    }
}
