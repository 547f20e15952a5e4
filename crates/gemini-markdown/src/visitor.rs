//! Node visitor: maps one node of a Gemini response to a Markdown fragment.
//!
//! The visit is a pure recursive function over the tree. Element handling
//! dispatches on the lowercase tag name; anything not listed below passes
//! through transparently by concatenating its children.
//!
//! Plain text is emitted exactly as found. Markdown control characters in
//! prose are not escaped, so a literal `*` may be read as emphasis by a
//! renderer.

use once_cell::sync::Lazy;
use scraper::{Node, Selector};

use crate::list;
use crate::node::{Document, NodeId};
use crate::utilities::flatten_line_breaks;

static CODE_LANGUAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".code-block-decoration span").unwrap());
static CODE_CONTAINER: Lazy<Selector> = Lazy::new(|| Selector::parse(".code-container").unwrap());

/// Convert `node` and its subtree to Markdown
pub fn visit(doc: &Document, node: NodeId) -> String {
    let tag = match doc.value(node) {
        Node::Text(text) => return text.to_string(),
        Node::Element(element) => element.name(),
        _ => return String::new(),
    };

    match tag {
        "code-block" => code_block(doc, node),
        "b" | "strong" => format!("**{}**", visit_children(doc, node)),
        "i" | "em" => format!("*{}*", visit_children(doc, node)),
        // Raw text, so nothing inside the span is converted twice
        "code" => format!("`{}`", doc.text_content(node)),
        "a" => link(doc, node),
        "p" => paragraph(doc, node),
        "br" => "\n".to_string(),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => heading(doc, node, tag),
        "hr" => "\n---\n\n".to_string(),
        "li" => list_item(doc, node),
        "ul" | "ol" => format!("{}\n", visit_children(doc, node)),
        "table" => table(doc, node),
        "table-block" => format!("{}\n\n", visit_children(doc, node).trim_end()),
        _ => visit_children(doc, node),
    }
}

/// Concatenate the fragments of all children
fn visit_children(doc: &Document, node: NodeId) -> String {
    doc.children(node).map(|child| visit(doc, child)).collect()
}

fn code_block(doc: &Document, node: NodeId) -> String {
    let language = doc
        .select_first(node, &CODE_LANGUAGE)
        .map(|n| doc.text_content(n))
        .unwrap_or_default();
    let code = doc
        .select_first(node, &CODE_CONTAINER)
        .map(|n| doc.text_content(n))
        .unwrap_or_default();

    format!("\n```{}\n{}\n```\n\n", language, code)
}

fn link(doc: &Document, node: NodeId) -> String {
    let href = doc
        .attr(node, "href")
        .filter(|href| !href.is_empty())
        .unwrap_or("#");
    format!("[{}]({})", doc.text_content(node), href)
}

fn paragraph(doc: &Document, node: NodeId) -> String {
    // Inside a list item a blank line would end the item
    let suffix = if doc.closest(node, "li").is_some() {
        "\n"
    } else {
        "\n\n"
    };
    format!("{}{}", visit_children(doc, node), suffix)
}

fn heading(doc: &Document, node: NodeId, tag: &str) -> String {
    let level: usize = tag[1..].parse().unwrap_or(1);
    format!("{} {}\n\n", "#".repeat(level), visit_children(doc, node))
}

fn list_item(doc: &Document, node: NodeId) -> String {
    format!(
        "{}{}{}\n",
        list::indent(doc, node),
        list::marker(doc, node),
        visit_children(doc, node).trim()
    )
}

fn table(doc: &Document, node: NodeId) -> String {
    let rows: Vec<Vec<String>> = table_rows(doc, node)
        .into_iter()
        .map(|row| {
            doc.element_children(row)
                .filter(|&cell| matches!(doc.tag_name(cell), "th" | "td"))
                .map(|cell| table_cell(doc, cell))
                .collect()
        })
        .collect();

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return String::new();
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (i, row) in rows.iter().enumerate() {
        lines.push(table_row(row, width));
        if i == 0 {
            lines.push(format!("|{}", " --- |".repeat(width)));
        }
    }

    format!("\n{}\n\n", lines.join("\n"))
}

/// `tr` elements directly under the table or under its row groups
fn table_rows(doc: &Document, table: NodeId) -> Vec<NodeId> {
    let mut rows = Vec::new();
    for child in doc.element_children(table) {
        match doc.tag_name(child) {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                doc.element_children(child)
                    .filter(|&row| doc.tag_name(row) == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

fn table_cell(doc: &Document, cell: NodeId) -> String {
    flatten_line_breaks(visit_children(doc, cell).trim())
        .trim()
        .replace('|', "\\|")
}

fn table_row(cells: &[String], width: usize) -> String {
    let padded: Vec<&str> = cells
        .iter()
        .map(String::as_str)
        .chain(std::iter::repeat(""))
        .take(width)
        .collect();
    format!("| {} |", padded.join(" | "))
}
