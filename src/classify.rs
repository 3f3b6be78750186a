//! Readable-element classification.
//!
//! Reduces a document subtree to the minimal ordered set of elements that
//! each hold one distinct block of readable text:
//!
//! 1. An element with a non-empty direct text node is terminal. It is
//!    emitted unless its tag is excluded, and is never descended into.
//! 2. An element with exactly one child element is a pass-through wrapper;
//!    its result is exactly its child's result.
//! 3. Any other element contributes the concatenated results of its
//!    children, in document order.
//!
//! Excluded tags are never emitted. An excluded element without direct text
//! may still be a pass-through wrapper (`<span><address>..`); with zero or
//! several children its branch contributes nothing.
//! The result is an antichain: no returned element contains another.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::tree::DocumentTree;

/// Tags that are never readable elements by default.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "H1", "H2", "H3", "H4", "H5", "H6", "BUTTON", "LABEL", "SPAN", "IMG", "PRE", "SCRIPT",
];

/// Set of tag names that can never be classified as readable.
///
/// Names are stored upper-case; lookups are ASCII case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionList {
    tags: BTreeSet<String>,
}

impl ExclusionList {
    /// An empty list: every tag is eligible.
    pub fn empty() -> Self {
        Self {
            tags: BTreeSet::new(),
        }
    }

    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|tag| tag.as_ref().trim().to_ascii_uppercase())
                .filter(|tag| !tag.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(&tag.to_ascii_uppercase())
    }

    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        self.tags.insert(tag.to_ascii_uppercase())
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        self.tags.remove(&tag.trim().to_ascii_uppercase())
    }

    /// Tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for ExclusionList {
    fn default() -> Self {
        Self::from_tags(DEFAULT_EXCLUSIONS)
    }
}

/// Finds the top-level readable elements of a document.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    exclusions: ExclusionList,
}

impl Classifier {
    pub fn new(exclusions: ExclusionList) -> Self {
        Self { exclusions }
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.exclusions
    }

    /// Classify every direct child of `root` (normally `<body>`) and
    /// concatenate the results in document order.
    pub fn classify<'t, T>(&self, tree: &'t T, root: T::Node<'t>) -> Vec<T::Node<'t>>
    where
        T: DocumentTree + ?Sized,
    {
        let mut readable = Vec::new();
        self.collect(tree, tree.child_elements(root), &mut readable);
        debug!(count = readable.len(), "classified readable elements");
        readable
    }

    /// Apply the reduction rules to `node` itself rather than to its children.
    pub fn classify_element<'t, T>(&self, tree: &'t T, node: T::Node<'t>) -> Vec<T::Node<'t>>
    where
        T: DocumentTree + ?Sized,
    {
        let mut readable = Vec::new();
        self.collect(tree, vec![node], &mut readable);
        readable
    }

    /// Walk `roots` (in document order) with an explicit stack, so nesting
    /// depth is bounded by the heap rather than the call stack.
    fn collect<'t, T>(&self, tree: &'t T, roots: Vec<T::Node<'t>>, out: &mut Vec<T::Node<'t>>)
    where
        T: DocumentTree + ?Sized,
    {
        let mut pending: Vec<_> = roots.into_iter().rev().collect();
        while let Some(node) = pending.pop() {
            let tag = tree.tag_name(node);
            let excluded = self.exclusions.contains(tag);

            if tree.has_direct_text(node) {
                if excluded {
                    trace!(tag, "dropping excluded text element");
                } else {
                    out.push(node);
                }
                continue;
            }

            let children = tree.child_elements(node);
            if children.len() == 1 {
                pending.push(children[0]);
            } else if excluded {
                trace!(tag, children = children.len(), "dropping excluded container");
            } else {
                pending.extend(children.into_iter().rev());
            }
        }
    }
}
