//! HTML parsing support.
//!
//! Pages are parsed with scraper (html5ever). The parsed tree is used as is:
//! comments and doctypes stay in it, and the converter skips them.

use scraper::Html;

use crate::node::Document;

impl Document {
    /// Parse a complete HTML page.
    ///
    /// The root of the returned document is the `<html>` element; html5ever
    /// always synthesizes `<head>` and `<body>`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gemini_markdown::Document;
    ///
    /// let doc = Document::parse_html("<p>Hello <b>World</b></p>");
    /// assert_eq!(doc.text_content(doc.root()), "Hello World");
    /// ```
    pub fn parse_html(html: &str) -> Document {
        Html::parse_document(html).into()
    }

    /// Parse an HTML fragment. The root is html5ever's synthetic `<html>`
    /// context element.
    pub fn parse_fragment(html: &str) -> Document {
        Html::parse_fragment(html).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;
    use scraper::Selector;

    #[test]
    fn test_parse_simple_html() {
        let doc = Document::parse_html("<p>Hello World</p>");
        assert_eq!(doc.tag_name(doc.root()), "html");
        assert_eq!(doc.parent(doc.root()), None);

        let body = Selector::parse("body").unwrap();
        assert!(doc.select_first(doc.root(), &body).is_some());
    }

    #[test]
    fn test_parse_keeps_custom_elements_and_attributes() {
        let doc = Document::parse_fragment(
            r#"<model-response><div class="markdown" data-x="1">Hi</div></model-response>"#,
        );
        let selector = Selector::parse("model-response .markdown").unwrap();
        let markdown = doc.select_first(doc.root(), &selector).unwrap();
        assert_eq!(doc.attr(markdown, "data-x"), Some("1"));
        assert_eq!(doc.text_content(markdown), "Hi");
    }

    #[test]
    fn test_comments_are_not_text() {
        let doc = Document::parse_fragment("<span>a<!-- note -->b</span>");
        assert_eq!(doc.text_content(doc.root()), "ab");

        let span = doc.element_children(doc.root()).next().unwrap();
        let comment = doc.children(span).nth(1).unwrap();
        assert_eq!(doc.node_type(comment), NodeType::Other);
        assert_eq!(doc.tag_name(comment), "#comment");
        assert_eq!(doc.inner_text(span), "ab");
    }

    #[test]
    fn test_parsed_tree_accepts_appended_nodes() {
        let mut doc = Document::parse_html("<model-thoughts><button>Show</button></model-thoughts>");
        let panel = Selector::parse("model-thoughts").unwrap();
        let container = doc.select_first(doc.root(), &panel).unwrap();
        let body = doc.append_element_with_attrs(container, "div", &[("class", "markdown")]);
        doc.append_text(body, "Reasoning");

        let expanded = Selector::parse("model-thoughts .markdown").unwrap();
        assert_eq!(doc.select_first(doc.root(), &expanded), Some(body));
        assert_eq!(doc.text_content(container), "ShowReasoning");
    }
}
