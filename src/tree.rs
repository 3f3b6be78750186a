//! Read-only document tree access.
//!
//! The classifier never touches a concrete DOM. It walks any structure that
//! implements [`DocumentTree`], which keeps the tree-reduction rules
//! testable against synthetic trees. [`HtmlTree`] is the html5ever-backed
//! implementation used for real documents.

use std::fmt;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::error::{ReadablyError, Result};

/// Structural queries the classifier and geometry code need from a tree.
///
/// Node handles are cheap copies compared by value; two handles are the
/// same element exactly when they compare equal.
pub trait DocumentTree {
    type Node<'t>: Copy + Eq + fmt::Debug
    where
        Self: 't;

    /// Tag identity of an element (any case; callers compare case-insensitively).
    fn tag_name<'t>(&'t self, node: Self::Node<'t>) -> &'t str;

    /// Child elements in document order. Text and comment nodes are skipped.
    fn child_elements<'t>(&'t self, node: Self::Node<'t>) -> Vec<Self::Node<'t>>;

    /// Text nodes that are direct children of `node`, untrimmed.
    fn direct_text<'t>(&'t self, node: Self::Node<'t>) -> Vec<&'t str>;

    /// Concatenated text of every descendant text node.
    fn text_content<'t>(&'t self, node: Self::Node<'t>) -> String;

    fn parent<'t>(&'t self, node: Self::Node<'t>) -> Option<Self::Node<'t>>;

    /// Whether a direct child text node has non-whitespace content.
    fn has_direct_text<'t>(&'t self, node: Self::Node<'t>) -> bool {
        self.direct_text(node)
            .iter()
            .any(|text| !text.trim().is_empty())
    }

    /// DOM `contains` semantics: inclusive of `node == ancestor`.
    fn contains<'t>(&'t self, ancestor: Self::Node<'t>, node: Self::Node<'t>) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }
}

/// A parsed HTML document.
pub struct HtmlTree {
    html: Html,
}

impl HtmlTree {
    /// Parse a full document. html5ever always synthesizes `<html>` and `<body>`.
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// The `<body>` element, falling back to the root element for
    /// documents where the parser produced none.
    pub fn body(&self) -> ElementRef<'_> {
        let root = self.html.root_element();
        root.children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name().eq_ignore_ascii_case("body"))
            .unwrap_or(root)
    }

    /// Every element matching a CSS selector, in document order.
    pub fn select(&self, selector: &str) -> Result<Vec<ElementRef<'_>>> {
        let selector =
            Selector::parse(selector).map_err(|e| ReadablyError::Selector(format!("{selector}: {e:?}")))?;
        Ok(self.html.select(&selector).collect())
    }

    /// Owned summary of an element, for printing and serialization.
    pub fn describe(&self, node: ElementRef<'_>) -> ReadableBlock {
        let element = node.value();
        ReadableBlock {
            tag: element.name().to_string(),
            id: element.id().map(str::to_string),
            classes: element.classes().map(str::to_string).collect(),
            path: css_path(node),
            preview: preview(&self.text_content(node), PREVIEW_CHARS),
        }
    }
}

impl fmt::Debug for HtmlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlTree")
            .field("nodes", &self.html.tree.nodes().count())
            .finish()
    }
}

impl DocumentTree for HtmlTree {
    type Node<'t> = ElementRef<'t>;

    fn tag_name<'t>(&'t self, node: ElementRef<'t>) -> &'t str {
        node.value().name()
    }

    fn child_elements<'t>(&'t self, node: ElementRef<'t>) -> Vec<ElementRef<'t>> {
        node.children().filter_map(ElementRef::wrap).collect()
    }

    fn direct_text<'t>(&'t self, node: ElementRef<'t>) -> Vec<&'t str> {
        node.children()
            .filter_map(|child| child.value().as_text())
            .map(|text| &**text)
            .collect()
    }

    fn text_content<'t>(&'t self, node: ElementRef<'t>) -> String {
        node.text().collect()
    }

    fn parent<'t>(&'t self, node: ElementRef<'t>) -> Option<ElementRef<'t>> {
        node.parent().and_then(ElementRef::wrap)
    }
}

const PREVIEW_CHARS: usize = 80;

/// A readable element reduced to plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadableBlock {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Selector-like path from the root, e.g. `html > body > div#main > p`.
    pub path: String,
    /// Whitespace-collapsed text, truncated.
    pub preview: String,
}

fn css_path(node: ElementRef<'_>) -> String {
    let mut segments = Vec::new();
    let mut current = Some(node);
    while let Some(el) = current {
        let value = el.value();
        let mut segment = value.name().to_string();
        if let Some(id) = value.id() {
            segment.push('#');
            segment.push_str(id);
        }
        segments.push(segment);
        current = el.parent().and_then(ElementRef::wrap);
    }
    segments.reverse();
    segments.join(" > ")
}

fn preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let mut truncated: String = collapsed.chars().take(max_chars).collect();
    truncated.push('…');
    truncated
}
