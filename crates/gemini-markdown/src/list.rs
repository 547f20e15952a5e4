//! List markers and nested-list indentation.
//!
//! A nested item must be indented by exactly the width of every enclosing
//! item's marker for CommonMark renderers to see the nesting. Markers are
//! derived from the live tree on every call: an item's marker depends only on
//! its parent's kind and its position among the parent's element children.

use crate::node::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// Where a list item sits in its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListContext {
    pub kind: ListKind,
    /// 1-based position among the parent's element children
    pub position: usize,
}

impl ListContext {
    /// Derive the context of `item` from its parent.
    ///
    /// An item without a parent is treated as the first entry of an
    /// unordered list.
    pub fn of(doc: &Document, item: NodeId) -> Self {
        let kind = match doc.parent(item) {
            Some(parent) if doc.tag_name(parent) == "ol" => ListKind::Ordered,
            _ => ListKind::Unordered,
        };
        let position = doc.element_index(item).map_or(1, |i| i + 1);
        Self { kind, position }
    }

    /// `"{n}. "` for ordered lists, `"* "` otherwise
    pub fn marker(&self) -> String {
        match self.kind {
            ListKind::Ordered => format!("{}. ", self.position),
            ListKind::Unordered => "* ".to_string(),
        }
    }

    pub fn marker_width(&self) -> usize {
        self.marker().len()
    }
}

/// Marker text of a list item
pub fn marker(doc: &Document, item: NodeId) -> String {
    ListContext::of(doc, item).marker()
}

/// Indentation of a list item: one run of spaces per enclosing list item,
/// each as wide as that item's marker, outermost first.
pub fn indent(doc: &Document, item: NodeId) -> String {
    let width: usize = doc
        .ancestors(item)
        .filter(|&a| doc.tag_name(a) == "li")
        .map(|a| ListContext::of(doc, a).marker_width())
        .sum();
    " ".repeat(width)
}
