//! Utility functions and constants for HTML processing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "center", "dd", "details",
    "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "li",
    "main", "menu", "nav", "ol", "p", "pre", "section", "summary", "table", "tbody",
    "td", "tfoot", "th", "thead", "tr", "ul",
];

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Check if a tag is a block-level element
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Replace every line break (`\r\n`, `\r` or `\n`) with a single space
pub fn flatten_line_breaks(text: &str) -> String {
    LINE_BREAK.replace_all(text, " ").into_owned()
}

/// Prefix every line after the first with `prefix`
pub fn prefix_continuation_lines(text: &str, prefix: &str) -> String {
    text.replace('\n', &format!("\n{}", prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_block() {
        assert!(is_block("div"));
        assert!(is_block("p"));
        assert!(is_block("DIV"));
        assert!(!is_block("span"));
        assert!(!is_block("a"));
    }

    #[test]
    fn test_flatten_line_breaks() {
        assert_eq!(flatten_line_breaks("a\r\nb\rc\nd"), "a b c d");
        assert_eq!(flatten_line_breaks("a\n\nb"), "a  b");
        assert_eq!(flatten_line_breaks("plain"), "plain");
    }

    #[test]
    fn test_prefix_continuation_lines() {
        assert_eq!(prefix_continuation_lines("a\nb", "> "), "a\n> b");
        assert_eq!(prefix_continuation_lines("a\n\nb", "> "), "a\n> \n> b");
    }
}
