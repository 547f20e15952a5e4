//! DOM tree for conversation pages.
//!
//! [`Document`] wraps scraper's [`Html`], so nodes live in ego-tree's arena and
//! are addressed by [`NodeId`]. Every node knows its parent, which keeps the
//! ancestor queries (the list indentation walk, `closest`) cheap. Selector
//! queries run through scraper's [`Selector`]. Hosts that render a page
//! themselves can grow the tree with [`Document::append_element`] and
//! [`Document::append_text`]; see [`crate::html`] for parsing.

use ego_tree::NodeRef;
use html5ever::tendril::StrTendril as AttrValue;
use html5ever::{namespace_url, ns, Attribute, LocalName, QualName};
use scraper::node::{Element, Text};
use scraper::{CaseSensitivity, ElementRef, Html, Node, Selector, StrTendril};

use crate::utilities::is_block;

pub use ego_tree::NodeId;

/// Coarse node classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
    /// Comments, doctypes and the document node itself
    Other,
}

/// A DOM tree whose top element is the root returned by [`Document::root`].
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl From<Html> for Document {
    fn from(html: Html) -> Self {
        Self { html }
    }
}

impl Document {
    /// Create a document holding a single root element
    pub fn new(root_tag: &str) -> Self {
        let mut html = Html::new_document();
        html.tree.root_mut().append(element(root_tag, &[]));
        Self { html }
    }

    pub fn root(&self) -> NodeId {
        self.html.root_element().id()
    }

    fn node(&self, id: NodeId) -> NodeRef<'_, Node> {
        self.html
            .tree
            .get(id)
            .expect("node id issued by another document")
    }

    fn append(&mut self, parent: NodeId, value: Node) -> NodeId {
        self.html
            .tree
            .get_mut(parent)
            .expect("node id issued by another document")
            .append(value)
            .id()
    }

    /// Append a new element as the last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.append(parent, element(tag, &[]))
    }

    /// Append a new element with attributes as the last child of `parent`
    pub fn append_element_with_attrs(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> NodeId {
        self.append(parent, element(tag, attrs))
    }

    /// Append a text node as the last child of `parent`
    pub fn append_text(&mut self, parent: NodeId, content: &str) -> NodeId {
        self.append(
            parent,
            Node::Text(Text {
                text: StrTendril::from(content),
            }),
        )
    }

    pub fn value(&self, id: NodeId) -> &Node {
        self.node(id).value()
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        match self.value(id) {
            Node::Element(_) => NodeType::Element,
            Node::Text(_) => NodeType::Text,
            _ => NodeType::Other,
        }
    }

    /// Check if this is an element node
    pub fn is_element(&self, id: NodeId) -> bool {
        self.value(id).is_element()
    }

    /// Check if this is a text node
    pub fn is_text(&self, id: NodeId) -> bool {
        self.value(id).is_text()
    }

    /// Lowercase tag name for elements, the DOM `nodeName` otherwise
    pub fn tag_name(&self, id: NodeId) -> &str {
        match self.value(id) {
            Node::Element(element) => element.name(),
            Node::Text(_) => "#text",
            Node::Comment(_) => "#comment",
            Node::Document => "#document",
            Node::Fragment => "#document-fragment",
            Node::Doctype(doctype) => &*doctype.name,
            Node::ProcessingInstruction(instruction) => &*instruction.target,
        }
    }

    /// Content of a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.value(id).as_text().map(|text| &**text)
    }

    /// Get an attribute value by name
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.value(id)
            .as_element()?
            .attr(&name.to_ascii_lowercase())
    }

    /// Check the whitespace-separated `class` attribute for `class`
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.value(id)
            .as_element()
            .map(|element| element.has_class(class, CaseSensitivity::CaseSensitive))
            .unwrap_or(false)
    }

    /// Parent element; `None` for the root
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)
            .parent()
            .filter(|parent| parent.value().is_element())
            .map(|parent| parent.id())
    }

    /// Get all child nodes
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children().map(|child| child.id())
    }

    /// Get only element children
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id)
            .children()
            .filter(|child| child.value().is_element())
            .map(|child| child.id())
    }

    /// Ancestor elements from the parent up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id)
            .ancestors()
            .filter(|ancestor| ancestor.value().is_element())
            .map(|ancestor| ancestor.id())
    }

    /// Descendants in document order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).descendants().skip(1).map(|node| node.id())
    }

    /// The node itself or its nearest ancestor with the given tag
    pub fn closest(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&n| self.is_element(n) && self.tag_name(n) == tag)
    }

    /// Zero-based position of `id` among its parent's element children
    pub fn element_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.element_children(parent).position(|c| c == id)
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self, id: NodeId) -> String {
        self.node(id)
            .descendants()
            .filter_map(|node| node.value().as_text())
            .map(|text| &**text)
            .collect()
    }

    /// Text as a browser would lay it out: runs of HTML whitespace collapse
    /// to one space, `<br>` breaks the line and block elements sit on lines
    /// of their own. Non-breaking spaces are content and survive.
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.push_inner_text(id, &mut out);
        out
    }

    fn push_inner_text(&self, id: NodeId, out: &mut String) {
        match self.value(id) {
            Node::Text(text) => {
                for c in text.chars() {
                    if !c.is_ascii_whitespace() {
                        out.push(c);
                    } else if !(out.is_empty() || out.ends_with(' ') || out.ends_with('\n')) {
                        out.push(' ');
                    }
                }
            }
            Node::Element(element) if element.name() == "br" => {
                trim_trailing_spaces(out);
                out.push('\n');
            }
            Node::Element(element) => {
                let block = is_block(element.name());
                if block {
                    end_line(out);
                }
                for child in self.children(id) {
                    self.push_inner_text(child, out);
                }
                if block {
                    end_line(out);
                }
            }
            _ => {}
        }
    }

    /// All descendant elements of `scope` matching `selector`, in document order
    pub fn select(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        ElementRef::wrap(self.node(scope))
            .map(|scope| scope.select(selector).map(|found| found.id()).collect())
            .unwrap_or_default()
    }

    /// First descendant element of `scope` matching `selector`
    pub fn select_first(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        ElementRef::wrap(self.node(scope))?
            .select(selector)
            .next()
            .map(|found| found.id())
    }
}

/// An HTML element node with lowercase tag and attribute names
fn element(tag: &str, attrs: &[(&str, &str)]) -> Node {
    let attributes = attrs
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name.to_ascii_lowercase())),
            value: AttrValue::from(*value),
        })
        .collect();
    Node::Element(Element::new(
        QualName::new(None, ns!(html), LocalName::from(tag.to_ascii_lowercase())),
        attributes,
    ))
}

fn trim_trailing_spaces(out: &mut String) {
    let len = out.trim_end_matches(' ').len();
    out.truncate(len);
}

/// Start a new line unless already at the start of one
fn end_line(out: &mut String) {
    trim_trailing_spaces(out);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}
